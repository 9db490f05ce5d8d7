//! Drives a [`ControlsCoordinator`] through a scenario's event script.

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;

use controls_core::{
    ControlsCoordinator, ControlsOffsets, FullscreenState, TabControlsFeedback, Token,
};
use controls_types::{ControlsConstraint, ControlsError, ControlsEvent, Result, TabId, Visibility};

use crate::scenario::Scenario;
use crate::sinks::{
    LoggingContentView, LoggingControlsView, LoggingFullscreenUi, LoggingListener,
    LoggingObserver, Transcript, new_transcript,
};
use crate::tabs::{ReplayTab, TabRegistry};

/// Coordinator state after a replay, plus every collaborator call made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub scenario: String,
    pub events_replayed: usize,
    pub current_tab: Option<TabId>,
    pub fullscreen_state: &'static str,
    pub persistent_fullscreen: bool,
    pub constraint: ControlsConstraint,
    pub top_controls_offset: i32,
    pub bottom_controls_offset: i32,
    pub content_offset: i32,
    pub hidden_ratio: f32,
    pub controls_visibility: Visibility,
    pub controls_resize_view: bool,
    pub in_vr: bool,
    pub pending_tasks: usize,
    pub transcript: Vec<String>,
}

fn state_name(state: FullscreenState) -> &'static str {
    match state {
        FullscreenState::Normal => "normal",
        FullscreenState::PendingHide { .. } => "pending_hide",
        FullscreenState::Active { .. } => "active",
        FullscreenState::Exiting { .. } => "exiting",
    }
}

pub struct Replayer {
    name: String,
    coordinator: ControlsCoordinator,
    tabs: TabRegistry,
    /// Named force-hide holds taken by `acquire_hiding` events.
    hiding: HashMap<String, Token>,
    transcript: Transcript,
    events_replayed: usize,
}

impl Replayer {
    /// Build a coordinator for `scenario` with logging collaborators attached.
    pub fn new(scenario: &Scenario) -> Self {
        let transcript = new_transcript();
        let mut coordinator = ControlsCoordinator::new(scenario.config.clone());
        coordinator.add_observer(Box::new(LoggingObserver::new(&transcript)));
        coordinator.add_listener(Box::new(LoggingListener::new(&transcript)));
        coordinator.set_content_view(Box::new(LoggingContentView::new(&transcript)));
        coordinator.set_controls_view(Box::new(LoggingControlsView::new(&transcript)));
        coordinator.set_fullscreen_ui(Box::new(LoggingFullscreenUi::new(&transcript)));

        let tabs = TabRegistry::from_entries(&scenario.tabs);
        log::debug!("Replaying '{}' with {} tabs", scenario.name, tabs.len());
        Self {
            name: scenario.name.clone(),
            coordinator,
            tabs,
            hiding: HashMap::new(),
            transcript,
            events_replayed: 0,
        }
    }

    pub fn coordinator(&self) -> &ControlsCoordinator {
        &self.coordinator
    }

    /// Replay every event in order, stopping at the first one that fails.
    pub fn run(&mut self, events: &[ControlsEvent]) -> Result<()> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, event: &ControlsEvent) -> Result<()> {
        log::debug!("Event {}: {event:?}", self.events_replayed);
        match event {
            ControlsEvent::TabSwitched { tab } => {
                let current = match tab {
                    Some(id) => {
                        let tab = Rc::clone(self.tab(*id)?) as Rc<dyn TabControlsFeedback>;
                        Some(tab)
                    },
                    None => None,
                };
                self.coordinator.on_tab_switched(current);
            },
            ControlsEvent::TabInteractabilityChanged { tab, interactable } => {
                self.tab(*tab)?.set_interactable(*interactable);
                self.coordinator
                    .on_tab_interactability_changed(*tab, *interactable);
            },
            ControlsEvent::TabHidden { tab } => {
                self.tab(*tab)?.set_hidden(true);
                self.coordinator.on_tab_hidden(*tab);
            },
            ControlsEvent::NavigationFinished {
                tab,
                main_frame,
                same_document,
            } => {
                if *main_frame && !*same_document {
                    self.tab(*tab)?.clear_crashed();
                }
                self.coordinator
                    .on_navigation_finished(*tab, *main_frame, *same_document);
            },
            ControlsEvent::TabCrashed { tab } => {
                self.tab(*tab)?.set_crashed();
                self.coordinator.on_tab_crashed(*tab);
            },
            ControlsEvent::RendererResponsiveChanged { tab, responsive } => {
                self.tab(*tab)?;
                self.coordinator
                    .on_renderer_responsive_changed(*tab, *responsive);
            },
            ControlsEvent::RendererOffsets {
                tab,
                top,
                bottom,
                content,
                top_min,
                bottom_min,
            } => {
                let offsets = ControlsOffsets::new(*top, *bottom, *content, *top_min, *bottom_min);
                self.tab(*tab)?.record_offsets(offsets);
                self.coordinator.on_renderer_offsets(*tab, offsets);
            },
            ControlsEvent::TopControlsHeight { height, min_height } => {
                self.coordinator.set_top_controls_height(*height, *min_height);
            },
            ControlsEvent::BottomControlsHeight { height, min_height } => {
                self.coordinator
                    .set_bottom_controls_height(*height, *min_height);
            },
            ControlsEvent::EnterFullscreen { tab, options } => {
                let tab = Rc::clone(self.tab(*tab)?);
                self.coordinator.enter_fullscreen(&*tab, *options);
            },
            ControlsEvent::ExitFullscreen { tab } => {
                self.coordinator.exit_fullscreen(*tab);
            },
            ControlsEvent::LayoutChanged {
                old_height,
                new_height,
            } => {
                self.coordinator.on_layout_changed(*old_height, *new_height);
            },
            ControlsEvent::SystemUiVisibilityChanged => {
                self.coordinator.on_system_ui_visibility_changed();
            },
            ControlsEvent::WindowFocusChanged { has_focus } => {
                self.coordinator.on_window_focus_changed(*has_focus);
            },
            ControlsEvent::ActivityStateChanged { state } => {
                self.coordinator.on_activity_state_changed(*state);
            },
            ControlsEvent::EnterVr => self.coordinator.on_enter_vr(),
            ControlsEvent::ExitVr => self.coordinator.on_exit_vr(),
            ControlsEvent::GestureStarted => self.coordinator.on_gesture_started(),
            ControlsEvent::GestureEnded => self.coordinator.on_gesture_ended(),
            ControlsEvent::ScrollingChanged { scrolling } => {
                self.coordinator
                    .on_content_view_scrolling_changed(*scrolling);
            },
            ControlsEvent::ContentChildrenChanged { top_anchored } => {
                self.coordinator.on_content_children_changed(*top_anchored);
            },
            ControlsEvent::AcquireHiding { label } => {
                let token = match self.hiding.remove(label) {
                    Some(old) => self
                        .coordinator
                        .hide_android_controls_and_clear_old_token(old),
                    None => self.coordinator.hide_android_controls(),
                };
                self.hiding.insert(label.clone(), token);
            },
            ControlsEvent::ReleaseHiding { label } => match self.hiding.remove(label) {
                Some(token) => self.coordinator.release_android_controls_hiding_token(token),
                None => log::warn!("No hiding hold named '{label}' to release"),
            },
            ControlsEvent::ShowControls { animate } => {
                self.coordinator.show_android_controls(*animate);
            },
            ControlsEvent::Frame { dt_ms } => self.coordinator.on_animation_frame(*dt_ms),
        }
        self.events_replayed += 1;
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        let c = self.coordinator();
        let offsets = c.offsets();
        Summary {
            scenario: self.name.clone(),
            events_replayed: self.events_replayed,
            current_tab: c.current_tab(),
            fullscreen_state: state_name(c.fullscreen_state()),
            persistent_fullscreen: c.is_persistent_fullscreen(),
            constraint: c.constraint(),
            top_controls_offset: offsets.top_controls_offset(),
            bottom_controls_offset: offsets.bottom_controls_offset(),
            content_offset: offsets.content_offset(),
            hidden_ratio: c.hidden_ratio(),
            controls_visibility: c.controls_visibility(),
            controls_resize_view: c.controls_resize_view(),
            in_vr: c.in_vr(),
            pending_tasks: c.pending_task_count(),
            transcript: self.transcript.borrow().clone(),
        }
    }

    /// Tear the coordinator down once the script is done.
    pub fn finish(mut self) -> Summary {
        let summary = self.summary();
        self.coordinator.destroy();
        summary
    }

    fn tab(&self, id: TabId) -> Result<&Rc<ReplayTab>> {
        self.tabs
            .get(id)
            .ok_or_else(|| ControlsError::Scenario(format!("unknown {id}")))
    }
}

/// Replay a parsed scenario start to finish and tear the coordinator down.
pub fn replay(scenario: &Scenario) -> Result<Summary> {
    let mut replayer = Replayer::new(scenario);
    replayer.run(&scenario.events)?;
    let summary = replayer.finish();
    log::info!(
        "Replayed {} events of '{}': fullscreen {}, top offset {}",
        summary.events_replayed,
        summary.scenario,
        summary.fullscreen_state,
        summary.top_controls_offset,
    );
    Ok(summary)
}
