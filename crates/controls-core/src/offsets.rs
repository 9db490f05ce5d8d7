//! Authoritative browser controls dimensions and offsets.
//!
//! [`OffsetManager`] owns the heights of the top and bottom controls and the
//! last offsets reported for them. Every offset update funnels through
//! [`OffsetManager::apply_offsets`], which clamps racy renderer feedback
//! against the current heights, drops redundant updates, and notifies
//! [`BrowserControlsObserver`]s.
//!
//! Heights are validated at the setter: a negative height or a min-height
//! above its height is a caller bug and panics.

use controls_types::{ControlsConstraint, ControlsPosition};

use crate::observer::{ObserverId, ObserverList};
use crate::sinks::TabControlsFeedback;
use crate::visibility::VisibilityScheduler;

/// Heights of the top and bottom controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlsDimensions {
    pub top_height: i32,
    pub top_min_height: i32,
    pub bottom_height: i32,
    pub bottom_min_height: i32,
}

impl ControlsDimensions {
    pub fn new(
        top_height: i32,
        top_min_height: i32,
        bottom_height: i32,
        bottom_min_height: i32,
    ) -> Self {
        assert_heights("top", top_height, top_min_height);
        assert_heights("bottom", bottom_height, bottom_min_height);
        Self {
            top_height,
            top_min_height,
            bottom_height,
            bottom_min_height,
        }
    }
}

fn assert_heights(which: &str, height: i32, min_height: i32) {
    assert!(
        height >= 0 && min_height >= 0,
        "{which} controls heights must be non-negative (height {height}, min {min_height})"
    );
    assert!(
        min_height <= height,
        "{which} controls min-height {min_height} exceeds height {height}"
    );
}

/// The five offsets that together position the controls and content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlsOffsets {
    /// Top controls Y offset; negative means scrolled up out of view.
    pub top_controls_offset: i32,
    /// Bottom controls Y offset; positive means scrolled down out of view.
    pub bottom_controls_offset: i32,
    /// Top inset applied to web content.
    pub content_offset: i32,
    pub top_min_height_offset: i32,
    pub bottom_min_height_offset: i32,
}

impl ControlsOffsets {
    pub const fn new(
        top_controls_offset: i32,
        bottom_controls_offset: i32,
        content_offset: i32,
        top_min_height_offset: i32,
        bottom_min_height_offset: i32,
    ) -> Self {
        Self {
            top_controls_offset,
            bottom_controls_offset,
            content_offset,
            top_min_height_offset,
            bottom_min_height_offset,
        }
    }
}

/// Observer of controls offsets and heights.
pub trait BrowserControlsObserver {
    /// The controls moved. `needs_animate` is true when the real controls
    /// view is on screen and the compositor must redraw to track it.
    fn on_controls_offset_changed(&mut self, _offsets: &ControlsOffsets, _needs_animate: bool) {}

    fn on_content_offset_changed(&mut self, _offset: i32) {}

    fn on_top_controls_height_changed(&mut self, _height: i32, _min_height: i32) {}

    fn on_bottom_controls_height_changed(&mut self, _height: i32, _min_height: i32) {}
}

/// Outcome of an [`OffsetManager::apply_offsets`] call that changed state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetsApplied {
    pub offsets: ControlsOffsets,
    pub hidden_ratio: f32,
    pub at_min_height: bool,
    pub content_offset_changed: bool,
    pub needs_animate: bool,
}

pub struct OffsetManager {
    position: ControlsPosition,
    dims: ControlsDimensions,
    initialized: bool,
    offsets: ControlsOffsets,
    hidden_ratio: f32,
    notified_content_offset: i32,
    controls_resize_view: bool,
    animate_height_changes: bool,
    observers: ObserverList<dyn BrowserControlsObserver>,
}

impl OffsetManager {
    /// An uninitialized manager with zero heights and offsets.
    pub fn new(position: ControlsPosition) -> Self {
        Self {
            position,
            dims: ControlsDimensions::default(),
            initialized: false,
            offsets: ControlsOffsets::default(),
            hidden_ratio: 1.0,
            notified_content_offset: 0,
            controls_resize_view: false,
            animate_height_changes: false,
            observers: ObserverList::new(),
        }
    }

    /// Seed the dimensions and place the content below fully shown controls.
    pub fn initialize(&mut self, dims: ControlsDimensions) {
        assert_heights("top", dims.top_height, dims.top_min_height);
        assert_heights("bottom", dims.bottom_height, dims.bottom_min_height);
        self.dims = dims;
        self.initialized = true;
        self.offsets.content_offset = dims.top_height;
        self.update_hidden_ratio();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn position(&self) -> ControlsPosition {
        self.position
    }

    pub fn add_observer(&mut self, observer: Box<dyn BrowserControlsObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> Option<Box<dyn BrowserControlsObserver>> {
        self.observers.remove(id)
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Update the top heights. Offsets stay put until the next update.
    pub fn set_top_controls_height(&mut self, height: i32, min_height: i32) {
        assert_heights("top", height, min_height);
        self.initialized = true;
        if self.dims.top_height == height && self.dims.top_min_height == min_height {
            return;
        }
        self.dims.top_height = height;
        self.dims.top_min_height = min_height;
        log::debug!("Top controls height -> {height} (min {min_height})");
        self.observers
            .for_each(|o| o.on_top_controls_height_changed(height, min_height));
    }

    /// Update the bottom heights. Offsets stay put until the next update.
    pub fn set_bottom_controls_height(&mut self, height: i32, min_height: i32) {
        assert_heights("bottom", height, min_height);
        self.initialized = true;
        if self.dims.bottom_height == height && self.dims.bottom_min_height == min_height {
            return;
        }
        self.dims.bottom_height = height;
        self.dims.bottom_min_height = min_height;
        log::debug!("Bottom controls height -> {height} (min {min_height})");
        self.observers
            .for_each(|o| o.on_bottom_controls_height_changed(height, min_height));
    }

    pub fn set_animate_height_changes(&mut self, animate: bool) {
        self.animate_height_changes = animate;
    }

    pub fn should_animate_height_changes(&self) -> bool {
        self.animate_height_changes
    }

    /// Clamp, store and broadcast a new set of offsets.
    ///
    /// Returns `None` when the clamped offsets equal the stored ones; nothing
    /// is notified in that case. `visibility` decides whether the real
    /// controls view is on screen after the update, which observers receive
    /// as `needs_animate`.
    pub fn apply_offsets(
        &mut self,
        requested: ControlsOffsets,
        visibility: &VisibilityScheduler,
    ) -> Option<OffsetsApplied> {
        assert!(
            self.initialized,
            "apply_offsets called before controls dimensions were initialized"
        );

        let clamped = self.clamp(requested);
        if clamped == self.offsets {
            return None;
        }
        self.offsets = clamped;
        self.update_hidden_ratio();
        log::trace!(
            "Offsets -> {clamped:?} (ratio {}, at min {})",
            self.hidden_ratio,
            self.at_min_height()
        );

        let needs_animate = visibility.should_show(self.draw_controls_as_texture());
        let notified = self.offsets_for_observers();
        self.observers
            .for_each(|o| o.on_controls_offset_changed(&notified, needs_animate));
        let content_offset_changed = self.notify_content_offset_if_changed();

        Some(OffsetsApplied {
            offsets: self.offsets,
            hidden_ratio: self.hidden_ratio,
            at_min_height: self.at_min_height(),
            content_offset_changed,
            needs_animate,
        })
    }

    /// Offsets that put the controls back where a tab without live renderer
    /// feedback expects them, based on its committed constraint.
    pub fn non_fullscreen_target(&self, constraint: Option<ControlsConstraint>) -> ControlsOffsets {
        let d = self.dims;
        if constraint == Some(ControlsConstraint::Hidden) {
            ControlsOffsets::new(
                d.top_min_height - d.top_height,
                d.bottom_height - d.bottom_min_height,
                d.top_min_height,
                d.top_min_height,
                d.bottom_min_height,
            )
        } else {
            ControlsOffsets::new(0, 0, d.top_height, d.top_min_height, d.bottom_min_height)
        }
    }

    /// Apply [`Self::non_fullscreen_target`] for `tab`.
    pub fn reset_to_non_fullscreen_for_tab(
        &mut self,
        tab: Option<&dyn TabControlsFeedback>,
        visibility: &VisibilityScheduler,
    ) -> Option<OffsetsApplied> {
        let target = self.non_fullscreen_target(tab.map(|t| t.committed_constraint()));
        self.apply_offsets(target, visibility)
    }

    /// Fully hidden controls, used while in VR.
    pub fn hidden_target(&self) -> ControlsOffsets {
        ControlsOffsets::new(-self.dims.top_height, self.dims.bottom_height, 0, 0, 0)
    }

    /// Notify content-offset observers if the content offset moved since the
    /// last notification.
    pub fn notify_content_offset_if_changed(&mut self) -> bool {
        let offset = self.offsets.content_offset;
        if offset == self.notified_content_offset {
            return false;
        }
        self.notified_content_offset = offset;
        self.observers.for_each(|o| o.on_content_offset_changed(offset));
        true
    }

    fn clamp(&self, requested: ControlsOffsets) -> ControlsOffsets {
        let top = requested.top_controls_offset.max(-self.dims.top_height);
        let bottom = requested.bottom_controls_offset.min(self.dims.bottom_height);
        let content = requested.content_offset.min(top.saturating_add(self.dims.top_height));
        ControlsOffsets::new(
            top,
            bottom,
            content,
            requested.top_min_height_offset,
            requested.bottom_min_height_offset,
        )
    }

    fn offsets_for_observers(&self) -> ControlsOffsets {
        ControlsOffsets {
            bottom_controls_offset: self.bottom_controls_offset(),
            ..self.offsets
        }
    }

    fn update_hidden_ratio(&mut self) {
        self.hidden_ratio = match self.position {
            ControlsPosition::None => 1.0,
            ControlsPosition::Top if self.dims.top_height == 0 => 1.0,
            ControlsPosition::Top => {
                (self.offsets.top_controls_offset as f32 / self.dims.top_height as f32).abs()
            },
        };
    }

    /// Recompute whether the viewport should be shrunk by the controls.
    pub fn update_controls_resize_view(&mut self) -> bool {
        self.controls_resize_view = self.content_offset() > self.dims.top_min_height
            || self.bottom_content_offset() > self.dims.bottom_min_height;
        self.controls_resize_view
    }

    pub fn controls_resize_view(&self) -> bool {
        self.controls_resize_view
    }

    pub fn dimensions(&self) -> ControlsDimensions {
        self.dims
    }

    pub fn top_controls_height(&self) -> i32 {
        self.dims.top_height
    }

    pub fn top_controls_min_height(&self) -> i32 {
        self.dims.top_min_height
    }

    pub fn bottom_controls_height(&self) -> i32 {
        self.dims.bottom_height
    }

    pub fn bottom_controls_min_height(&self) -> i32 {
        self.dims.bottom_min_height
    }

    /// The stored offsets, exactly as last applied.
    pub fn offsets(&self) -> ControlsOffsets {
        self.offsets
    }

    pub fn top_controls_offset(&self) -> i32 {
        self.offsets.top_controls_offset
    }

    /// Bottom controls offset, never beyond the current bottom height.
    pub fn bottom_controls_offset(&self) -> i32 {
        self.offsets.bottom_controls_offset.min(self.dims.bottom_height)
    }

    pub fn content_offset(&self) -> i32 {
        self.offsets.content_offset
    }

    pub fn top_min_height_offset(&self) -> i32 {
        self.offsets.top_min_height_offset
    }

    pub fn bottom_min_height_offset(&self) -> i32 {
        self.offsets.bottom_min_height_offset
    }

    /// Visible height of the bottom controls.
    pub fn bottom_content_offset(&self) -> i32 {
        self.dims.bottom_height.saturating_sub(self.bottom_controls_offset())
    }

    /// Where the bottom edge of the top controls currently sits.
    pub fn top_visible_content_offset(&self) -> i32 {
        self.dims.top_height.saturating_add(self.offsets.top_controls_offset)
    }

    pub fn hidden_ratio(&self) -> f32 {
        self.hidden_ratio
    }

    pub fn are_controls_fully_visible(&self) -> bool {
        self.hidden_ratio == 0.0
    }

    pub fn are_controls_off_screen(&self) -> bool {
        self.hidden_ratio == 1.0
    }

    pub fn draw_controls_as_texture(&self) -> bool {
        self.hidden_ratio > 0.0
    }

    /// Controls are showing exactly their min-heights.
    pub fn at_min_height(&self) -> bool {
        self.content_offset() == self.dims.top_min_height
            && self.bottom_content_offset() == self.dims.bottom_min_height
    }

    /// Both edges rest at either their full or their min height, i.e. the
    /// controls are neither scrolling nor animating. When a height equals its
    /// min-height that edge is always at rest.
    pub fn is_idle(&self) -> bool {
        let content = self.content_offset();
        let bottom = self.bottom_content_offset();
        (content == self.dims.top_min_height || content == self.dims.top_height)
            && (bottom == self.dims.bottom_min_height || bottom == self.dims.bottom_height)
    }
}
