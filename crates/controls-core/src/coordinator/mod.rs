//! The browser controls offset coordinator.
//!
//! [`ControlsCoordinator`] is the single owner of every piece of controls
//! state for one browser window. Embedders push lifecycle, renderer and
//! input events in, drive the frame clock with [`ControlsCoordinator::on_animation_frame`],
//! and receive view mutations through the sinks in [`crate::sinks`].
//!
//! Within one offset update the work runs in a fixed order: offset observers,
//! content-offset observers, the controls view translation, content view
//! children, the fullscreen min-height watcher, then the visibility schedule.

use std::rc::Rc;

use controls_types::{
    ActivityState, ControlsConfig, ControlsConstraint, ControlsPosition, FullscreenOptions, TabId,
    Visibility,
};

use crate::animation::ShowAnimation;
use crate::constraints::BrowserControlsVisibilityDelegate;
use crate::fullscreen::{
    FullscreenEffect, FullscreenListener, FullscreenModeController, FullscreenState,
};
use crate::observer::ObserverId;
use crate::offsets::{
    BrowserControlsObserver, ControlsDimensions, ControlsOffsets, OffsetManager,
};
use crate::scheduler::{TaskHandle, TaskQueue};
use crate::sinks::{
    AndroidControlsViewSink, ContentViewSink, FullscreenUiSink, NullFullscreenUi,
    TabControlsFeedback,
};
use crate::tokens::Token;
use crate::visibility::VisibilityScheduler;


/// Work posted to the frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Transient show after the activity comes back to the foreground.
    ReturnFromBackgroundShow,
    ReleaseTransientShow(Token),
    ReapplyFullscreenFlags,
    ClearLayoutFullscreenFlag,
}

impl Task {
    fn is_flag_work(&self) -> bool {
        matches!(self, Self::ReapplyFullscreenFlags | Self::ClearLayoutFullscreenFlag)
    }
}

pub struct ControlsCoordinator {
    config: ControlsConfig,
    offsets: OffsetManager,
    fullscreen: FullscreenModeController,
    visibility: VisibilityScheduler,
    constraints: BrowserControlsVisibilityDelegate,
    tasks: TaskQueue<Task>,
    return_show_task: Option<TaskHandle>,
    animation: Option<ShowAnimation>,
    tab: Option<Rc<dyn TabControlsFeedback>>,
    content_view: Option<Box<dyn ContentViewSink>>,
    controls_view: Option<Box<dyn AndroidControlsViewSink>>,
    fullscreen_ui: Box<dyn FullscreenUiSink>,
    in_vr: bool,
    in_gesture: bool,
    content_view_scrolling: bool,
}

impl ControlsCoordinator {
    pub fn new(config: ControlsConfig) -> Self {
        let mut offsets = OffsetManager::new(config.controls_position);
        offsets.initialize(ControlsDimensions::new(
            config.top_controls_height,
            config.top_controls_min_height,
            config.bottom_controls_height,
            config.bottom_controls_min_height,
        ));
        offsets.set_animate_height_changes(config.animate_height_changes);
        // No observers yet; this only records the starting content offset.
        offsets.notify_content_offset_if_changed();
        let has_controls_view = config.controls_position == ControlsPosition::Top;
        let mut coordinator = Self {
            config,
            offsets,
            fullscreen: FullscreenModeController::new(),
            visibility: VisibilityScheduler::new(has_controls_view),
            constraints: BrowserControlsVisibilityDelegate::new(),
            tasks: TaskQueue::new(),
            return_show_task: None,
            animation: None,
            tab: None,
            content_view: None,
            controls_view: None,
            fullscreen_ui: Box::new(NullFullscreenUi),
            in_vr: false,
            in_gesture: false,
            content_view_scrolling: false,
        };
        coordinator.schedule_visibility_update();
        coordinator
    }

    // -- collaborators ------------------------------------------------------

    pub fn set_content_view(&mut self, view: Box<dyn ContentViewSink>) {
        self.content_view = Some(view);
        self.update_content_view_children_state();
    }

    pub fn set_controls_view(&mut self, view: Box<dyn AndroidControlsViewSink>) {
        if self.config.controls_position == ControlsPosition::None {
            log::warn!("Ignoring controls view: controls position is none");
            return;
        }
        self.controls_view = Some(view);
    }

    pub fn set_fullscreen_ui(&mut self, ui: Box<dyn FullscreenUiSink>) {
        self.fullscreen_ui = ui;
    }

    pub fn add_observer(&mut self, observer: Box<dyn BrowserControlsObserver>) -> ObserverId {
        self.offsets.add_observer(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> Option<Box<dyn BrowserControlsObserver>> {
        self.offsets.remove_observer(id)
    }

    pub fn add_listener(&mut self, listener: Box<dyn FullscreenListener>) -> ObserverId {
        self.fullscreen.add_listener(listener)
    }

    pub fn remove_listener(&mut self, id: ObserverId) -> Option<Box<dyn FullscreenListener>> {
        self.fullscreen.remove_listener(id)
    }

    // -- tab lifecycle ------------------------------------------------------

    /// The window switched to `tab`, or to no tab at all.
    pub fn on_tab_switched(&mut self, tab: Option<Rc<dyn TabControlsFeedback>>) {
        let previous = self.current_tab();
        self.tab = tab;
        let current = self.current_tab();

        if previous != current {
            log::debug!("Current tab {previous:?} -> {current:?}");
            match self.tab.as_ref().map(Rc::clone) {
                Some(tab) => {
                    self.visibility.set_tab_interactable(tab.is_user_interactable());
                    self.show_controls_transient();
                    self.update_multi_touch_zoom(!self.fullscreen.is_persistent_fullscreen());
                    if tab.is_user_interactable() {
                        self.restore_controls_positions();
                    }
                },
                None => {
                    self.visibility.set_tab_interactable(false);
                    self.cancel_return_show();
                },
            }
        }

        if self.tab.is_none() && self.constraints.constraint() != ControlsConstraint::Hidden {
            self.set_positions_for_tab_to_non_fullscreen();
        }
    }

    pub fn on_tab_interactability_changed(&mut self, tab: TabId, interactable: bool) {
        if self.current_tab() != Some(tab) {
            return;
        }
        self.visibility.set_tab_interactable(interactable);
        self.schedule_visibility_update();
        if !interactable {
            return;
        }

        let effects = self
            .fullscreen
            .on_tab_interactable(tab, self.offsets.at_min_height());
        self.dispatch(effects);

        if let Some(cached) = self.tab.as_ref().and_then(|t| t.cached_offsets()) {
            self.on_offsets_changed(cached);
        }
    }

    /// Any tab was hidden; fullscreen state must not leak into other tabs.
    pub fn on_tab_hidden(&mut self, tab: TabId) {
        log::debug!("{tab} hidden");
        self.exit_persistent_fullscreen_mode();
    }

    pub fn on_navigation_finished(&mut self, tab: TabId, main_frame: bool, same_document: bool) {
        if main_frame && !same_document && self.current_tab() == Some(tab) {
            self.exit_persistent_fullscreen_mode();
        }
    }

    pub fn on_tab_crashed(&mut self, tab: TabId) {
        if self.current_tab() == Some(tab) {
            log::debug!("{tab} crashed, showing controls");
            self.show_android_controls(false);
        }
    }

    pub fn on_renderer_responsive_changed(&mut self, tab: TabId, responsive: bool) {
        if self.current_tab() == Some(tab) && !responsive {
            log::debug!("{tab} unresponsive, showing controls");
            self.show_android_controls(false);
        }
    }

    /// The renderer of `tab` reported new offsets. The tab's cached offsets
    /// are expected to already hold them.
    pub fn on_renderer_offsets(&mut self, tab: TabId, offsets: ControlsOffsets) {
        let Some(current) = self.tab.as_ref() else {
            return;
        };
        if current.id() == tab && current.is_user_interactable() {
            self.on_offsets_changed(offsets);
        }
    }

    // -- heights and offsets ------------------------------------------------

    pub fn set_top_controls_height(&mut self, height: i32, min_height: i32) {
        self.offsets.set_top_controls_height(height, min_height);
        self.on_heights_changed();
    }

    pub fn set_bottom_controls_height(&mut self, height: i32, min_height: i32) {
        self.offsets.set_bottom_controls_height(height, min_height);
        self.on_heights_changed();
    }

    /// Push offsets straight into the controls, bypassing renderer handling.
    pub fn apply_offsets(&mut self, offsets: ControlsOffsets) {
        self.set_positions_for_tab(offsets);
    }

    /// Put the controls where the current tab's committed constraint says.
    pub fn reset_to_non_fullscreen_for_tab(&mut self) {
        self.set_positions_for_tab_to_non_fullscreen();
    }

    /// Show the controls, either by a browser-driven slide-in or by snapping.
    pub fn show_android_controls(&mut self, animate: bool) {
        if animate {
            self.run_browser_driven_show_animation();
        } else {
            self.update_offsets(true, ControlsOffsets::default());
        }
    }

    // -- fullscreen ---------------------------------------------------------

    pub fn enter_fullscreen(&mut self, tab: &dyn TabControlsFeedback, options: FullscreenOptions) {
        let effects = self.fullscreen.enter_fullscreen(
            tab.id(),
            options,
            tab.is_user_interactable(),
            self.offsets.at_min_height(),
        );
        self.dispatch(effects);
    }

    pub fn exit_fullscreen(&mut self, tab: TabId) {
        let effects = self.fullscreen.exit_fullscreen(tab);
        self.dispatch(effects);
    }

    pub fn exit_persistent_fullscreen_mode(&mut self) {
        let effects = self.fullscreen.exit_persistent_mode();
        self.dispatch(effects);
    }

    /// The fullscreen content view was laid out again.
    pub fn on_layout_changed(&mut self, old_height: i32, new_height: i32) {
        let toast_allowed = self.config.show_notification_toast && !self.in_vr;
        let effects = self
            .fullscreen
            .on_layout_changed(old_height, new_height, toast_allowed);
        self.dispatch(effects);
    }

    pub fn on_system_ui_visibility_changed(&mut self) {
        let effects = self.fullscreen.on_system_ui_visibility_changed();
        self.dispatch(effects);
    }

    pub fn on_window_focus_changed(&mut self, has_focus: bool) {
        let effects = self.fullscreen.on_window_focus_changed(has_focus);
        self.dispatch(effects);
    }

    // -- VR -----------------------------------------------------------------

    pub fn on_enter_vr(&mut self) {
        log::debug!("Entering VR");
        self.in_vr = true;
        self.restore_controls_positions();
    }

    pub fn on_exit_vr(&mut self) {
        log::debug!("Exiting VR");
        self.in_vr = false;
        self.restore_controls_positions();
        // The renderer may not send new offsets, e.g. on a native page.
        self.show_android_controls(false);
    }

    // -- activity and input -------------------------------------------------

    pub fn on_activity_state_changed(&mut self, state: ActivityState) {
        log::debug!("Activity {state:?}");
        match state {
            ActivityState::Stopped => {
                if self.config.exit_fullscreen_on_stop {
                    self.exit_persistent_fullscreen_mode();
                }
            },
            ActivityState::Started => {
                self.cancel_return_show();
                let handle = self.tasks.post_delayed(
                    Task::ReturnFromBackgroundShow,
                    self.config.activity_return_show_delay_ms,
                );
                self.return_show_task = Some(handle);
            },
            ActivityState::Destroyed => self.cancel_return_show(),
        }
    }

    pub fn on_gesture_started(&mut self) {
        self.in_gesture = true;
        self.fullscreen_ui.hide_notification_toast();
    }

    pub fn on_gesture_ended(&mut self) {
        self.in_gesture = false;
        self.update_content_offset_and_notify();
    }

    pub fn on_content_view_scrolling_changed(&mut self, scrolling: bool) {
        self.content_view_scrolling = scrolling;
        if !scrolling {
            self.update_content_offset_and_notify();
        }
    }

    /// A child was added to or removed from the content view.
    pub fn on_content_children_changed(&mut self, has_top_anchored_child: bool) {
        self.visibility.set_top_anchored_child(has_top_anchored_child);
        self.update_content_view_children_state();
        self.schedule_visibility_update();
    }

    // -- hiding tokens ------------------------------------------------------

    /// Force the controls view hidden until the token is released.
    pub fn hide_android_controls(&mut self) -> Token {
        let token = self.visibility.acquire_hiding_token();
        self.schedule_visibility_update();
        token
    }

    /// Like [`Self::hide_android_controls`], releasing `old` only after the
    /// new token is held.
    pub fn hide_android_controls_and_clear_old_token(&mut self, old: Token) -> Token {
        let token = self.visibility.replace_hiding_token(old);
        self.schedule_visibility_update();
        token
    }

    pub fn release_android_controls_hiding_token(&mut self, token: Token) {
        self.visibility.release_hiding_token(token);
        self.schedule_visibility_update();
    }

    // -- frame clock --------------------------------------------------------

    /// Advance time by `dt_ms`: run due tasks, step the show animation, then
    /// flush the debounced visibility update.
    pub fn on_animation_frame(&mut self, dt_ms: u32) {
        for task in self.tasks.advance(dt_ms) {
            self.run_task(task);
        }
        self.step_animation(dt_ms);
        if let Some(visibility) = self.visibility.run_pending() {
            if let Some(view) = self.controls_view.as_mut() {
                view.set_visibility(visibility);
            }
        }
    }

    /// Tear down: forget the tab, cancel every task and drop all observers.
    pub fn destroy(&mut self) {
        log::debug!("Destroying controls coordinator");
        self.tab = None;
        self.tasks.clear();
        self.return_show_task = None;
        self.animation = None;
        self.offsets.clear_observers();
        self.fullscreen.reset();
        self.constraints.clear();
        self.visibility.reset();
        self.content_view = None;
    }

    // -- queries ------------------------------------------------------------

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn offsets(&self) -> &OffsetManager {
        &self.offsets
    }

    pub fn current_tab(&self) -> Option<TabId> {
        self.tab.as_ref().map(|t| t.id())
    }

    pub fn fullscreen_state(&self) -> FullscreenState {
        self.fullscreen.state()
    }

    pub fn is_persistent_fullscreen(&self) -> bool {
        self.fullscreen.is_persistent_fullscreen()
    }

    pub fn constraint(&self) -> ControlsConstraint {
        self.constraints.constraint()
    }

    pub fn hidden_ratio(&self) -> f32 {
        self.offsets.hidden_ratio()
    }

    pub fn are_controls_fully_visible(&self) -> bool {
        self.offsets.are_controls_fully_visible()
    }

    pub fn are_controls_off_screen(&self) -> bool {
        self.offsets.are_controls_off_screen()
    }

    pub fn controls_resize_view(&self) -> bool {
        self.offsets.controls_resize_view()
    }

    pub fn offset_overridden(&self) -> bool {
        self.visibility.offset_overridden()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn in_vr(&self) -> bool {
        self.in_vr
    }

    /// The visibility last pushed to the controls view.
    pub fn controls_visibility(&self) -> Visibility {
        self.visibility.applied_visibility()
    }

    pub fn has_pending_visibility_update(&self) -> bool {
        self.visibility.has_pending_update()
    }

    pub fn pending_task_count(&self) -> usize {
        self.tasks.len()
    }

    // -- internals ----------------------------------------------------------

    fn on_offsets_changed(&mut self, offsets: ControlsOffsets) {
        // The renderer is authoritative; drop any browser-driven animation.
        self.reset_controls_offset_overridden();
        let non_renderer = self
            .tab
            .as_ref()
            .is_some_and(|t| t.is_showing_non_renderer_page());
        if non_renderer {
            self.show_android_controls(false);
        } else {
            self.update_offsets(false, offsets);
        }
    }

    fn restore_controls_positions(&mut self) {
        self.reset_controls_offset_overridden();
        match self.tab.as_ref().and_then(|t| t.cached_offsets()) {
            Some(cached) => self.update_offsets(false, cached),
            None => self.show_android_controls(false),
        }
    }

    fn update_offsets(&mut self, to_non_fullscreen: bool, offsets: ControlsOffsets) {
        if self.in_vr {
            let hidden = self.offsets.hidden_target();
            self.set_positions_for_tab(hidden);
        } else if to_non_fullscreen {
            self.set_positions_for_tab_to_non_fullscreen();
        } else {
            self.set_positions_for_tab(offsets);
        }
    }

    fn set_positions_for_tab_to_non_fullscreen(&mut self) {
        let constraint = self.tab.as_ref().map(|t| t.committed_constraint());
        let target = self.offsets.non_fullscreen_target(constraint);
        self.set_positions_for_tab(target);
    }

    fn set_positions_for_tab(&mut self, requested: ControlsOffsets) {
        let Some(applied) = self.offsets.apply_offsets(requested, &self.visibility) else {
            return;
        };
        if applied.needs_animate {
            if let Some(view) = self.controls_view.as_mut() {
                view.set_translation_y(applied.offsets.top_controls_offset);
            }
        }
        self.update_content_view_children_state();

        let effects = self
            .fullscreen
            .on_controls_at_min_height(applied.at_min_height, self.current_tab());
        self.dispatch(effects);

        self.schedule_visibility_update();
    }

    /// A min-height change can put the controls at min-height without new offsets.
    fn on_heights_changed(&mut self) {
        let effects = self
            .fullscreen
            .on_controls_at_min_height(self.offsets.at_min_height(), self.current_tab());
        self.dispatch(effects);
    }

    fn update_content_offset_and_notify(&mut self) {
        self.update_content_view_children_state();
        self.offsets.notify_content_offset_if_changed();
    }

    fn update_content_view_children_state(&mut self) {
        let top = self.offsets.top_visible_content_offset();
        let bottom = self.offsets.bottom_content_offset();
        let Some(view) = self.content_view.as_mut() else {
            return;
        };
        view.apply_top_translation(top);
        view.apply_top_bottom_margins(top, bottom);
        self.update_viewport_size();
    }

    /// Resize the viewport only once the controls have come to rest.
    fn update_viewport_size(&mut self) {
        if self.in_gesture || self.content_view_scrolling || !self.offsets.is_idle() {
            return;
        }
        let resize = self.offsets.update_controls_resize_view();
        if let Some(view) = self.content_view.as_mut() {
            view.set_viewport_needs_resize(resize);
        }
    }

    fn schedule_visibility_update(&mut self) {
        let as_texture = self.offsets.draw_controls_as_texture();
        self.visibility.schedule_update(as_texture);
    }

    fn run_browser_driven_show_animation(&mut self) {
        if self.animation.is_some() {
            return;
        }
        self.visibility.set_offset_overridden(true);
        let animation = ShowAnimation::new(
            self.offsets.top_controls_offset(),
            self.offsets.hidden_ratio(),
            self.config.max_controls_animation_ms,
        );
        log::debug!("Show animation started ({} ms)", animation.duration_ms());
        self.animation = Some(animation);
        self.schedule_visibility_update();
    }

    fn step_animation(&mut self, dt_ms: u32) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        let top = animation.tick(dt_ms);
        let finished = animation.is_finished();
        if finished {
            self.animation = None;
            log::debug!("Show animation finished");
        }
        let dims = self.offsets.dimensions();
        self.update_offsets(
            false,
            ControlsOffsets::new(
                top,
                0,
                dims.top_height,
                dims.top_min_height,
                dims.bottom_min_height,
            ),
        );
    }

    fn reset_controls_offset_overridden(&mut self) {
        if !self.visibility.offset_overridden() {
            return;
        }
        if self.animation.take().is_some() {
            log::debug!("Show animation cancelled");
        }
        self.visibility.set_offset_overridden(false);
    }

    fn show_controls_transient(&mut self) {
        let Some((token, change)) = self.constraints.show_controls_transient() else {
            return;
        };
        self.tasks.post_delayed(
            Task::ReleaseTransientShow(token),
            self.config.transient_show_duration_ms,
        );
        if let Some(constraint) = change {
            self.on_constraint_changed(constraint);
        }
    }

    fn on_constraint_changed(&mut self, constraint: ControlsConstraint) {
        if constraint == ControlsConstraint::Shown {
            self.set_positions_for_tab_to_non_fullscreen();
        }
    }

    fn cancel_return_show(&mut self) {
        if let Some(handle) = self.return_show_task.take() {
            self.tasks.cancel(handle);
        }
    }

    fn run_task(&mut self, task: Task) {
        log::trace!("Running {task:?}");
        match task {
            Task::ReturnFromBackgroundShow => {
                self.return_show_task = None;
                self.show_controls_transient();
            },
            Task::ReleaseTransientShow(token) => {
                if let Some(constraint) = self.constraints.release_transient(token) {
                    self.on_constraint_changed(constraint);
                }
            },
            Task::ReapplyFullscreenFlags => {
                let effects = self.fullscreen.reapply_flags();
                self.dispatch(effects);
            },
            Task::ClearLayoutFullscreenFlag => {
                let effects = self.fullscreen.clear_layout_flag();
                self.dispatch(effects);
            },
        }
    }

    /// Multi-touch zoom only applies to the current, visible tab.
    fn update_multi_touch_zoom(&mut self, enabled: bool) {
        let Some(tab) = self.tab.as_ref() else {
            return;
        };
        if tab.is_hidden() {
            return;
        }
        let id = tab.id();
        self.fullscreen_ui.set_multi_touch_zoom(id, enabled);
    }

    fn dispatch(&mut self, effects: Vec<FullscreenEffect>) {
        for effect in effects {
            log::trace!("Fullscreen effect {effect:?}");
            match effect {
                FullscreenEffect::PersistentModeChanged(enabled) => {
                    if let Some(constraint) = self.constraints.set_persistent_fullscreen(enabled) {
                        self.on_constraint_changed(constraint);
                    }
                },
                FullscreenEffect::ApplyFullscreenFlags { tab, options } => {
                    self.fullscreen_ui.apply_fullscreen_flags(tab, &options);
                },
                FullscreenEffect::ClearFullscreenFlags { tab } => {
                    self.fullscreen_ui.clear_fullscreen_flags(tab);
                },
                FullscreenEffect::ClearLayoutFullscreenFlag { tab } => {
                    self.fullscreen_ui.clear_layout_fullscreen_flag(tab);
                },
                FullscreenEffect::SetMultiTouchZoom { tab, enabled } => {
                    if self.current_tab() == Some(tab) {
                        self.update_multi_touch_zoom(enabled);
                    }
                },
                FullscreenEffect::RestoreControlsConstraint { tab } => {
                    self.fullscreen_ui.restore_controls_constraint(tab);
                },
                FullscreenEffect::ShowNotificationToast => {
                    self.fullscreen_ui.show_notification_toast();
                },
                FullscreenEffect::HideNotificationToast => {
                    self.fullscreen_ui.hide_notification_toast();
                },
                FullscreenEffect::ScheduleFlagsReapply => {
                    self.tasks
                        .cancel_where(|t| *t == Task::ReapplyFullscreenFlags);
                    self.tasks.post_delayed(
                        Task::ReapplyFullscreenFlags,
                        self.config.fullscreen_flags_reapply_delay_ms,
                    );
                },
                FullscreenEffect::ScheduleLayoutFlagClear => {
                    self.tasks.post_delayed(
                        Task::ClearLayoutFullscreenFlag,
                        self.config.clear_layout_flag_delay_ms,
                    );
                },
                FullscreenEffect::CancelScheduledFlagWork => {
                    self.tasks.cancel_where(Task::is_flag_work);
                },
            }
        }
    }
}
