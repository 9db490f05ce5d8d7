//! Collaborator interfaces the coordinator reads from and pushes into.
//!
//! The coordinator never touches a view hierarchy itself. Embedders implement
//! these traits on top of whatever toolkit owns the real views.

use controls_types::{ControlsConstraint, FullscreenOptions, TabId, Visibility};

use crate::offsets::ControlsOffsets;

/// Per-tab renderer feedback and state.
pub trait TabControlsFeedback {
    fn id(&self) -> TabId;

    fn is_user_interactable(&self) -> bool;

    fn is_hidden(&self) -> bool {
        false
    }

    /// The tab shows a crash page or a browser-native page, neither of which
    /// drives controls offsets from a renderer.
    fn is_showing_non_renderer_page(&self) -> bool {
        false
    }

    /// Whether the renderer has reported offsets for this tab yet.
    fn offset_initialized(&self) -> bool;
    fn top_controls_offset(&self) -> i32;
    fn bottom_controls_offset(&self) -> i32;
    fn content_offset(&self) -> i32;
    fn top_controls_min_height_offset(&self) -> i32;
    fn bottom_controls_min_height_offset(&self) -> i32;

    /// The constraint last committed to this tab's renderer.
    fn committed_constraint(&self) -> ControlsConstraint;

    /// Last renderer-reported offsets, if any were reported.
    fn cached_offsets(&self) -> Option<ControlsOffsets> {
        if !self.offset_initialized() {
            return None;
        }
        Some(ControlsOffsets::new(
            self.top_controls_offset(),
            self.bottom_controls_offset(),
            self.content_offset(),
            self.top_controls_min_height_offset(),
            self.bottom_controls_min_height_offset(),
        ))
    }
}

/// The web content view of the current tab.
pub trait ContentViewSink {
    /// Translate top-anchored children so they sit below the controls.
    fn apply_top_translation(&mut self, px: i32);
    /// Inset full-height children by the visible controls.
    fn apply_top_bottom_margins(&mut self, top_px: i32, bottom_px: i32);
    /// Whether the renderer viewport should shrink to make room for controls.
    fn set_viewport_needs_resize(&mut self, needs_resize: bool);
}

/// The Android view that hosts the browser controls.
pub trait AndroidControlsViewSink {
    fn set_visibility(&mut self, visibility: Visibility);
    fn set_translation_y(&mut self, px: i32);
}

/// Window and content-view side effects of the fullscreen state machine.
pub trait FullscreenUiSink {
    fn apply_fullscreen_flags(&mut self, _tab: TabId, _options: &FullscreenOptions) {}
    fn clear_fullscreen_flags(&mut self, _tab: TabId) {}
    fn clear_layout_fullscreen_flag(&mut self, _tab: TabId) {}
    fn set_multi_touch_zoom(&mut self, _tab: TabId, _enabled: bool) {}
    fn restore_controls_constraint(&mut self, _tab: TabId) {}
    fn show_notification_toast(&mut self) {}
    fn hide_notification_toast(&mut self) {}
}

/// A fullscreen UI sink that ignores every call.
#[derive(Debug, Default)]
pub struct NullFullscreenUi;

impl FullscreenUiSink for NullFullscreenUi {}
