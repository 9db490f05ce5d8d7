//! Persistent (HTML API) fullscreen state machine.
//!
//! ```text
//! Normal --enter, not at min-height--> PendingHide --controls at min-height--> Active
//! Normal --enter, at min-height------> Active
//! Active --exit--> Exiting --content view height shrinks--> Normal
//! PendingHide --exit--> Normal
//! ```
//!
//! Fullscreen flags are only ever applied from `Active`, and `Active` is only
//! entered once the controls report they sit at their min-height, so full
//! bleed content never draws under half-hidden controls.
//!
//! The controller owns no views and no clock. Every operation returns the
//! [`FullscreenEffect`]s the caller has to carry out, in order.

use controls_types::{FullscreenOptions, TabId};

use crate::observer::{ObserverId, ObserverList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenState {
    Normal,
    /// Fullscreen requested; waiting for the controls to reach min-height.
    PendingHide {
        tab: TabId,
        options: FullscreenOptions,
    },
    /// Fullscreen flags applied.
    Active {
        tab: TabId,
        options: FullscreenOptions,
    },
    /// Flags cleared; waiting for layout to hand space back to the controls.
    Exiting { tab: TabId },
}

impl FullscreenState {
    /// The live request, if any.
    pub fn request(&self) -> Option<(TabId, FullscreenOptions)> {
        match *self {
            Self::PendingHide { tab, options } | Self::Active { tab, options } => {
                Some((tab, options))
            },
            Self::Normal | Self::Exiting { .. } => None,
        }
    }

    /// Whether the controls are pinned hidden by a fullscreen request.
    pub fn is_persistent(&self) -> bool {
        self.request().is_some()
    }
}

/// Side effects requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenEffect {
    /// Persistent fullscreen switched on or off.
    PersistentModeChanged(bool),
    ApplyFullscreenFlags {
        tab: TabId,
        options: FullscreenOptions,
    },
    ClearFullscreenFlags {
        tab: TabId,
    },
    ClearLayoutFullscreenFlag {
        tab: TabId,
    },
    SetMultiTouchZoom {
        tab: TabId,
        enabled: bool,
    },
    RestoreControlsConstraint {
        tab: TabId,
    },
    ShowNotificationToast,
    HideNotificationToast,
    /// Re-apply the flags after the configured delay.
    ScheduleFlagsReapply,
    /// Clear the layout-fullscreen flag after the configured delay.
    ScheduleLayoutFlagClear,
    /// Drop any scheduled flag re-application or layout flag clear.
    CancelScheduledFlagWork,
}

/// Notified when a page enters or exits fullscreen.
pub trait FullscreenListener {
    fn on_enter_fullscreen(&mut self, _tab: TabId, _options: &FullscreenOptions) {}

    fn on_exit_fullscreen(&mut self, _tab: TabId) {}
}

/// A request made while its tab could not take input yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeferredEnter {
    tab: TabId,
    options: FullscreenOptions,
}

pub struct FullscreenModeController {
    state: FullscreenState,
    deferred: Option<DeferredEnter>,
    awaiting_first_layout: bool,
    toast_shown: bool,
    listeners: ObserverList<dyn FullscreenListener>,
}

impl FullscreenModeController {
    pub fn new() -> Self {
        Self {
            state: FullscreenState::Normal,
            deferred: None,
            awaiting_first_layout: false,
            toast_shown: false,
            listeners: ObserverList::new(),
        }
    }

    pub fn state(&self) -> FullscreenState {
        self.state
    }

    pub fn is_persistent_fullscreen(&self) -> bool {
        self.state.is_persistent()
    }

    /// Whether a request for `tab` is waiting for the tab to become interactable.
    #[cfg(test)]
    pub fn has_deferred_request(&self, tab: TabId) -> bool {
        self.deferred.is_some_and(|d| d.tab == tab)
    }

    pub fn add_listener(&mut self, listener: Box<dyn FullscreenListener>) -> ObserverId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ObserverId) -> Option<Box<dyn FullscreenListener>> {
        self.listeners.remove(id)
    }

    /// A page in `tab` asked for fullscreen.
    ///
    /// `interactable` says whether the tab can take input right now; if not,
    /// the request is parked until [`Self::on_tab_interactable`]. A live
    /// request for another tab is exited first.
    pub fn enter_fullscreen(
        &mut self,
        tab: TabId,
        options: FullscreenOptions,
        interactable: bool,
        controls_at_min_height: bool,
    ) -> Vec<FullscreenEffect> {
        if self.state.request() == Some((tab, options)) {
            log::debug!("Fullscreen already requested for {tab} with the same options");
            return Vec::new();
        }

        let mut effects = Vec::new();
        self.exit_conflicting(tab, &mut effects);
        if interactable {
            self.clear_deferred_for(tab);
            self.enter_persistent(tab, options, controls_at_min_height, &mut effects);
        } else {
            if let Some(previous) = self.deferred {
                if previous.tab != tab {
                    log::debug!("Deferred fullscreen for {} replaced", previous.tab);
                }
            }
            log::debug!("Deferring fullscreen until {tab} is interactable");
            self.deferred = Some(DeferredEnter { tab, options });
        }
        self.listeners
            .for_each(|l| l.on_enter_fullscreen(tab, &options));
        effects
    }

    /// A page in `tab` left fullscreen. Ignored if nothing was requested for it.
    pub fn exit_fullscreen(&mut self, tab: TabId) -> Vec<FullscreenEffect> {
        let had_deferred = self.clear_deferred_for(tab);
        let bound = self.state.request().is_some_and(|(t, _)| t == tab);
        let mut effects = Vec::new();
        if bound {
            self.exit_persistent_into(&mut effects);
        }
        if bound || had_deferred {
            self.listeners.for_each(|l| l.on_exit_fullscreen(tab));
        } else {
            log::debug!("Exit fullscreen for {tab} ignored, no request outstanding");
        }
        effects
    }

    /// Leave persistent fullscreen regardless of which tab requested it.
    pub fn exit_persistent_mode(&mut self) -> Vec<FullscreenEffect> {
        let mut effects = Vec::new();
        self.exit_persistent_into(&mut effects);
        effects
    }

    /// The controls reached (or left) their min-height for `current_tab`.
    pub fn on_controls_at_min_height(
        &mut self,
        at_min_height: bool,
        current_tab: Option<TabId>,
    ) -> Vec<FullscreenEffect> {
        let mut effects = Vec::new();
        if !at_min_height {
            return effects;
        }
        if let FullscreenState::PendingHide { tab, options } = self.state {
            if current_tab == Some(tab) {
                self.activate(tab, options, &mut effects);
            }
        }
        effects
    }

    /// Run a parked request once its tab can take input.
    pub fn on_tab_interactable(
        &mut self,
        tab: TabId,
        controls_at_min_height: bool,
    ) -> Vec<FullscreenEffect> {
        let mut effects = Vec::new();
        let Some(deferred) = self.deferred else {
            return effects;
        };
        if deferred.tab != tab {
            return effects;
        }
        self.deferred = None;
        log::debug!("Running deferred fullscreen for {tab}");
        self.exit_conflicting(tab, &mut effects);
        self.enter_persistent(tab, deferred.options, controls_at_min_height, &mut effects);
        effects
    }

    /// The fullscreen content view finished a layout pass.
    pub fn on_layout_changed(
        &mut self,
        old_height: i32,
        new_height: i32,
        toast_allowed: bool,
    ) -> Vec<FullscreenEffect> {
        let mut effects = Vec::new();
        match self.state {
            FullscreenState::Active { .. } if self.awaiting_first_layout => {
                self.awaiting_first_layout = false;
                effects.push(FullscreenEffect::ScheduleLayoutFlagClear);
            },
            FullscreenState::Exiting { tab } if new_height < old_height => {
                log::debug!("Fullscreen exit settled for {tab}");
                self.state = FullscreenState::Normal;
                effects.push(FullscreenEffect::RestoreControlsConstraint { tab });
                if toast_allowed && !self.toast_shown {
                    self.toast_shown = true;
                    effects.push(FullscreenEffect::ShowNotificationToast);
                }
            },
            _ => {},
        }
        effects
    }

    /// The delayed flag re-application came due.
    pub fn reapply_flags(&self) -> Vec<FullscreenEffect> {
        match self.state {
            FullscreenState::Active { tab, options } => {
                vec![FullscreenEffect::ApplyFullscreenFlags { tab, options }]
            },
            _ => Vec::new(),
        }
    }

    /// The delayed layout flag clear came due.
    pub fn clear_layout_flag(&self) -> Vec<FullscreenEffect> {
        match self.state {
            FullscreenState::Active { tab, .. } => {
                vec![FullscreenEffect::ClearLayoutFullscreenFlag { tab }]
            },
            _ => Vec::new(),
        }
    }

    pub fn on_window_focus_changed(&self, has_focus: bool) -> Vec<FullscreenEffect> {
        let mut effects = Vec::new();
        if !has_focus {
            effects.push(FullscreenEffect::HideNotificationToast);
        }
        effects.push(FullscreenEffect::CancelScheduledFlagWork);
        if has_focus && matches!(self.state, FullscreenState::Active { .. }) {
            effects.push(FullscreenEffect::ScheduleFlagsReapply);
        }
        effects
    }

    pub fn on_system_ui_visibility_changed(&self) -> Vec<FullscreenEffect> {
        if matches!(self.state, FullscreenState::Active { .. }) {
            vec![FullscreenEffect::ScheduleFlagsReapply]
        } else {
            Vec::new()
        }
    }

    /// Drop all state and listeners.
    pub fn reset(&mut self) {
        self.state = FullscreenState::Normal;
        self.deferred = None;
        self.awaiting_first_layout = false;
        self.listeners.clear();
    }

    fn exit_conflicting(&mut self, tab: TabId, effects: &mut Vec<FullscreenEffect>) {
        let Some((current, _)) = self.state.request() else {
            return;
        };
        if current == tab {
            return;
        }
        log::debug!("Fullscreen for {tab} supersedes {current}");
        self.clear_deferred_for(current);
        self.exit_persistent_into(effects);
        self.listeners.for_each(|l| l.on_exit_fullscreen(current));
    }

    fn enter_persistent(
        &mut self,
        tab: TabId,
        options: FullscreenOptions,
        controls_at_min_height: bool,
        effects: &mut Vec<FullscreenEffect>,
    ) {
        match self.state {
            FullscreenState::Active { tab: current, .. } if current == tab => {
                self.state = FullscreenState::Active { tab, options };
                effects.push(FullscreenEffect::ApplyFullscreenFlags { tab, options });
            },
            FullscreenState::PendingHide { tab: current, .. } if current == tab => {
                self.state = FullscreenState::PendingHide { tab, options };
            },
            _ => {
                effects.push(FullscreenEffect::PersistentModeChanged(true));
                if controls_at_min_height {
                    self.activate(tab, options, effects);
                } else {
                    log::debug!("Fullscreen for {tab} waiting for controls to hide");
                    self.state = FullscreenState::PendingHide { tab, options };
                }
            },
        }
    }

    fn activate(
        &mut self,
        tab: TabId,
        options: FullscreenOptions,
        effects: &mut Vec<FullscreenEffect>,
    ) {
        log::debug!("Fullscreen active for {tab} ({options:?})");
        self.state = FullscreenState::Active { tab, options };
        self.awaiting_first_layout = true;
        effects.push(FullscreenEffect::ApplyFullscreenFlags { tab, options });
        effects.push(FullscreenEffect::SetMultiTouchZoom {
            tab,
            enabled: false,
        });
    }

    fn exit_persistent_into(&mut self, effects: &mut Vec<FullscreenEffect>) {
        match self.state {
            FullscreenState::Normal | FullscreenState::Exiting { .. } => {},
            FullscreenState::PendingHide { tab, .. } => {
                log::debug!("Pending fullscreen for {tab} dropped");
                self.state = FullscreenState::Normal;
                effects.push(FullscreenEffect::PersistentModeChanged(false));
                effects.push(FullscreenEffect::SetMultiTouchZoom { tab, enabled: true });
            },
            FullscreenState::Active { tab, .. } => {
                log::debug!("Exiting fullscreen for {tab}");
                self.state = FullscreenState::Exiting { tab };
                self.awaiting_first_layout = false;
                effects.push(FullscreenEffect::PersistentModeChanged(false));
                effects.push(FullscreenEffect::HideNotificationToast);
                effects.push(FullscreenEffect::CancelScheduledFlagWork);
                effects.push(FullscreenEffect::ClearFullscreenFlags { tab });
                effects.push(FullscreenEffect::SetMultiTouchZoom { tab, enabled: true });
            },
        }
    }

    fn clear_deferred_for(&mut self, tab: TabId) -> bool {
        if self.deferred.is_some_and(|d| d.tab == tab) {
            self.deferred = None;
            true
        } else {
            false
        }
    }
}

impl Default for FullscreenModeController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::test_utils::{ListenerCall, RecordingListener};

    const A: TabId = TabId(1);
    const B: TabId = TabId(2);

    fn controller() -> (FullscreenModeController, Rc<RefCell<Vec<ListenerCall>>>) {
        let mut c = FullscreenModeController::new();
        let (listener, calls) = RecordingListener::new();
        c.add_listener(Box::new(listener));
        (c, calls)
    }

    fn applies(effects: &[FullscreenEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, FullscreenEffect::ApplyFullscreenFlags { .. }))
            .count()
    }

    #[test]
    fn enter_at_min_height_activates_immediately() {
        let (mut c, _) = controller();
        let opts = FullscreenOptions::default();
        let effects = c.enter_fullscreen(A, opts, true, true);
        assert_eq!(
            effects,
            vec![
                FullscreenEffect::PersistentModeChanged(true),
                FullscreenEffect::ApplyFullscreenFlags { tab: A, options: opts },
                FullscreenEffect::SetMultiTouchZoom {
                    tab: A,
                    enabled: false
                },
            ]
        );
        assert_eq!(c.state(), FullscreenState::Active { tab: A, options: opts });
    }

    #[test]
    fn enter_waits_for_min_height() {
        let (mut c, _) = controller();
        let opts = FullscreenOptions::default();
        let effects = c.enter_fullscreen(A, opts, true, false);
        assert_eq!(applies(&effects), 0);
        assert_eq!(c.state(), FullscreenState::PendingHide { tab: A, options: opts });
        assert!(c.is_persistent_fullscreen());

        assert!(c.on_controls_at_min_height(false, Some(A)).is_empty());
        assert_eq!(applies(&c.on_controls_at_min_height(true, Some(A))), 1);
        assert!(c.on_controls_at_min_height(true, Some(A)).is_empty());
        assert_eq!(c.state(), FullscreenState::Active { tab: A, options: opts });
    }

    #[test]
    fn min_height_for_other_tab_does_not_activate() {
        let (mut c, _) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, false);
        assert!(c.on_controls_at_min_height(true, Some(B)).is_empty());
        assert!(c.on_controls_at_min_height(true, None).is_empty());
        assert!(matches!(c.state(), FullscreenState::PendingHide { .. }));
    }

    #[test]
    fn identical_enter_is_noop() {
        let (mut c, calls) = controller();
        let opts = FullscreenOptions::default();
        c.enter_fullscreen(A, opts, true, true);
        assert!(c.enter_fullscreen(A, opts, true, true).is_empty());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn new_options_reapply_flags_while_active() {
        let (mut c, _) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
        let nav = FullscreenOptions::with_navigation_bar();
        let effects = c.enter_fullscreen(A, nav, true, true);
        assert_eq!(
            effects,
            vec![FullscreenEffect::ApplyFullscreenFlags { tab: A, options: nav }]
        );
        assert_eq!(c.state(), FullscreenState::Active { tab: A, options: nav });
    }

    #[test]
    fn new_options_update_pending_request() {
        let (mut c, _) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, false);
        let nav = FullscreenOptions::with_navigation_bar();
        assert!(c.enter_fullscreen(A, nav, true, false).is_empty());
        let effects = c.on_controls_at_min_height(true, Some(A));
        assert!(effects.contains(&FullscreenEffect::ApplyFullscreenFlags { tab: A, options: nav }));
    }

    #[test]
    fn conflicting_tab_exits_previous_first() {
        let (mut c, calls) = controller();
        let o1 = FullscreenOptions::default();
        let o2 = FullscreenOptions::with_navigation_bar();
        c.enter_fullscreen(A, o1, true, false);
        let effects = c.enter_fullscreen(B, o2, true, false);
        assert_eq!(
            *calls.borrow(),
            vec![
                ListenerCall::Enter(A, o1),
                ListenerCall::Exit(A),
                ListenerCall::Enter(B, o2),
            ]
        );
        assert_eq!(applies(&effects), 0);
        assert_eq!(c.state(), FullscreenState::PendingHide { tab: B, options: o2 });
    }

    #[test]
    fn conflicting_tab_clears_active_flags() {
        let (mut c, _) = controller();
        let opts = FullscreenOptions::default();
        c.enter_fullscreen(A, opts, true, true);
        let effects = c.enter_fullscreen(B, opts, true, true);
        let clear = effects
            .iter()
            .position(|e| *e == FullscreenEffect::ClearFullscreenFlags { tab: A })
            .unwrap();
        let apply = effects
            .iter()
            .position(|e| *e == FullscreenEffect::ApplyFullscreenFlags { tab: B, options: opts })
            .unwrap();
        assert!(clear < apply);
        assert_eq!(c.state(), FullscreenState::Active { tab: B, options: opts });
    }

    #[test]
    fn exit_while_normal_is_noop() {
        let (mut c, calls) = controller();
        assert!(c.exit_fullscreen(A).is_empty());
        assert!(c.exit_persistent_mode().is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn exit_from_pending_returns_to_normal() {
        let (mut c, calls) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, false);
        let effects = c.exit_fullscreen(A);
        assert_eq!(c.state(), FullscreenState::Normal);
        assert!(effects.contains(&FullscreenEffect::PersistentModeChanged(false)));
        assert!(!effects.iter().any(|e| matches!(e, FullscreenEffect::ClearFullscreenFlags { .. })));
        assert_eq!(calls.borrow().last(), Some(&ListenerCall::Exit(A)));
    }

    #[test]
    fn exit_for_unrelated_tab_is_ignored() {
        let (mut c, calls) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
        assert!(c.exit_fullscreen(B).is_empty());
        assert!(matches!(c.state(), FullscreenState::Active { .. }));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn exit_settles_on_layout_shrink() {
        let (mut c, _) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
        let effects = c.exit_fullscreen(A);
        assert!(effects.contains(&FullscreenEffect::ClearFullscreenFlags { tab: A }));
        assert_eq!(c.state(), FullscreenState::Exiting { tab: A });
        assert!(!c.is_persistent_fullscreen());

        assert!(c.on_layout_changed(900, 1000, true).is_empty());
        assert_eq!(c.state(), FullscreenState::Exiting { tab: A });

        let effects = c.on_layout_changed(1000, 944, true);
        assert_eq!(
            effects,
            vec![
                FullscreenEffect::RestoreControlsConstraint { tab: A },
                FullscreenEffect::ShowNotificationToast,
            ]
        );
        assert_eq!(c.state(), FullscreenState::Normal);
    }

    #[test]
    fn toast_shown_once_per_session() {
        let (mut c, _) = controller();
        for round in 0..2 {
            c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
            c.exit_fullscreen(A);
            let effects = c.on_layout_changed(1000, 944, true);
            let toast = effects.contains(&FullscreenEffect::ShowNotificationToast);
            assert_eq!(toast, round == 0);
        }
    }

    #[test]
    fn toast_suppressed_when_not_allowed() {
        let (mut c, _) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
        c.exit_fullscreen(A);
        let effects = c.on_layout_changed(1000, 944, false);
        assert_eq!(effects, vec![FullscreenEffect::RestoreControlsConstraint { tab: A }]);
    }

    #[test]
    fn first_layout_while_active_schedules_flag_clear() {
        let (mut c, _) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
        assert_eq!(
            c.on_layout_changed(944, 1000, true),
            vec![FullscreenEffect::ScheduleLayoutFlagClear]
        );
        assert!(c.on_layout_changed(1000, 1000, true).is_empty());
        assert_eq!(
            c.clear_layout_flag(),
            vec![FullscreenEffect::ClearLayoutFullscreenFlag { tab: A }]
        );
    }

    #[test]
    fn deferred_enter_runs_when_interactable() {
        let (mut c, calls) = controller();
        let opts = FullscreenOptions::default();
        assert!(c.enter_fullscreen(A, opts, false, true).is_empty());
        assert_eq!(c.state(), FullscreenState::Normal);
        assert!(c.has_deferred_request(A));
        assert_eq!(*calls.borrow(), vec![ListenerCall::Enter(A, opts)]);

        assert!(c.on_tab_interactable(B, true).is_empty());
        let effects = c.on_tab_interactable(A, true);
        assert_eq!(applies(&effects), 1);
        assert!(!c.has_deferred_request(A));
        assert!(c.on_tab_interactable(A, true).is_empty());
    }

    #[test]
    fn exit_cancels_deferred_enter() {
        let (mut c, calls) = controller();
        c.enter_fullscreen(A, FullscreenOptions::default(), false, true);
        assert!(c.exit_fullscreen(A).is_empty());
        assert!(!c.has_deferred_request(A));
        assert_eq!(calls.borrow().last(), Some(&ListenerCall::Exit(A)));
        assert!(c.on_tab_interactable(A, true).is_empty());
    }

    #[test]
    fn focus_regained_while_active_reapplies() {
        let (mut c, _) = controller();
        assert_eq!(
            c.on_window_focus_changed(true),
            vec![FullscreenEffect::CancelScheduledFlagWork]
        );
        c.enter_fullscreen(A, FullscreenOptions::default(), true, true);
        assert_eq!(
            c.on_window_focus_changed(false),
            vec![
                FullscreenEffect::HideNotificationToast,
                FullscreenEffect::CancelScheduledFlagWork,
            ]
        );
        assert_eq!(
            c.on_window_focus_changed(true),
            vec![
                FullscreenEffect::CancelScheduledFlagWork,
                FullscreenEffect::ScheduleFlagsReapply,
            ]
        );
    }

    #[test]
    fn system_ui_change_only_matters_when_active() {
        let (mut c, _) = controller();
        assert!(c.on_system_ui_visibility_changed().is_empty());
        c.enter_fullscreen(A, FullscreenOptions::default(), true, false);
        assert!(c.on_system_ui_visibility_changed().is_empty());
        assert!(c.reapply_flags().is_empty());
        c.on_controls_at_min_height(true, Some(A));
        assert_eq!(
            c.on_system_ui_visibility_changed(),
            vec![FullscreenEffect::ScheduleFlagsReapply]
        );
        assert_eq!(applies(&c.reapply_flags()), 1);
    }
}
