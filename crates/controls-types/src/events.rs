//! Lifecycle and feedback events pushed into the coordinator.
//!
//! Embedders map their host callbacks (tab model, activity lifecycle, motion
//! events, renderer feedback) onto these variants. The replay tool reads them
//! straight out of a scenario file.

use serde::{Deserialize, Serialize};

use crate::state::{FullscreenOptions, TabId};

/// Host activity lifecycle states the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    Started,
    Stopped,
    Destroyed,
}

/// A single input to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlsEvent {
    /// The active tab changed (or went away).
    TabSwitched { tab: Option<TabId> },
    /// A tab became (or stopped being) user interactable.
    TabInteractabilityChanged { tab: TabId, interactable: bool },
    /// A tab was hidden.
    TabHidden { tab: TabId },
    /// A navigation finished in a tab.
    NavigationFinished {
        tab: TabId,
        main_frame: bool,
        same_document: bool,
    },
    /// The renderer for a tab crashed.
    TabCrashed { tab: TabId },
    /// The renderer for a tab became responsive or unresponsive.
    RendererResponsiveChanged { tab: TabId, responsive: bool },
    /// Renderer-reported browser controls offsets.
    RendererOffsets {
        tab: TabId,
        top: i32,
        bottom: i32,
        content: i32,
        #[serde(default)]
        top_min: i32,
        #[serde(default)]
        bottom_min: i32,
    },
    /// Layout changed the top controls height.
    TopControlsHeight { height: i32, min_height: i32 },
    /// Layout changed the bottom controls height.
    BottomControlsHeight { height: i32, min_height: i32 },
    /// Page requested fullscreen.
    EnterFullscreen {
        tab: TabId,
        #[serde(default)]
        options: FullscreenOptions,
    },
    /// Page exited fullscreen.
    ExitFullscreen { tab: TabId },
    /// The content view finished a layout pass.
    LayoutChanged { old_height: i32, new_height: i32 },
    /// System UI visibility changed under the fullscreen content view.
    SystemUiVisibilityChanged,
    /// The window gained or lost focus.
    WindowFocusChanged { has_focus: bool },
    /// The host activity changed lifecycle state.
    ActivityStateChanged { state: ActivityState },
    /// VR mode was entered.
    EnterVr,
    /// VR mode was exited.
    ExitVr,
    /// A touch gesture began (pointer down).
    GestureStarted,
    /// A touch gesture ended (pointer up or cancel).
    GestureEnded,
    /// The content view started or stopped scrolling.
    ScrollingChanged { scrolling: bool },
    /// The content view's child hierarchy changed.
    ContentChildrenChanged { top_anchored: bool },
    /// Force-hide the Android controls under a named hold.
    AcquireHiding { label: String },
    /// Drop a named force-hide hold.
    ReleaseHiding { label: String },
    /// Browser-driven request to show the controls.
    ShowControls {
        #[serde(default)]
        animate: bool,
    },
    /// Advance the frame clock.
    Frame { dt_ms: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Script {
        events: Vec<ControlsEvent>,
    }

    #[test]
    fn parses_tagged_events() {
        let src = r#"
            [[events]]
            kind = "top_controls_height"
            height = 56
            min_height = 0

            [[events]]
            kind = "renderer_offsets"
            tab = 1
            top = -56
            bottom = 0
            content = 0

            [[events]]
            kind = "enter_fullscreen"
            tab = 1
            options = { show_navigation_bar = true }

            [[events]]
            kind = "frame"
            dt_ms = 16
        "#;
        let script: Script = toml::from_str(src).unwrap();
        assert_eq!(script.events.len(), 4);
        assert_eq!(
            script.events[1],
            ControlsEvent::RendererOffsets {
                tab: TabId(1),
                top: -56,
                bottom: 0,
                content: 0,
                top_min: 0,
                bottom_min: 0,
            }
        );
        assert_eq!(
            script.events[2],
            ControlsEvent::EnterFullscreen {
                tab: TabId(1),
                options: FullscreenOptions::with_navigation_bar(),
            }
        );
    }

    #[test]
    fn unit_variants_parse() {
        let src = r#"
            [[events]]
            kind = "enter_vr"

            [[events]]
            kind = "activity_state_changed"
            state = "stopped"

            [[events]]
            kind = "tab_switched"
        "#;
        let script: Script = toml::from_str(src).unwrap();
        assert_eq!(script.events[0], ControlsEvent::EnterVr);
        assert_eq!(
            script.events[1],
            ControlsEvent::ActivityStateChanged {
                state: ActivityState::Stopped
            }
        );
        assert_eq!(script.events[2], ControlsEvent::TabSwitched { tab: None });
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let src = r#"
            [[events]]
            kind = "teleport"
        "#;
        assert!(toml::from_str::<Script>(src).is_err());
    }
}
