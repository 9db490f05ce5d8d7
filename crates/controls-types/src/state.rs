//! Value types exchanged between the coordinator and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// Display options attached to a fullscreen request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullscreenOptions {
    /// Keep the system navigation bar visible while fullscreen.
    #[serde(default)]
    pub show_navigation_bar: bool,
}

impl FullscreenOptions {
    /// Options that keep the navigation bar on screen.
    pub const fn with_navigation_bar() -> Self {
        Self {
            show_navigation_bar: true,
        }
    }
}

/// Constraint on where the browser controls may sit.
///
/// A tab caches the last constraint committed to its renderer; the
/// coordinator also derives its own browser-side constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlsConstraint {
    /// Controls may scroll freely.
    #[default]
    Both,
    /// Controls must be fully shown.
    Shown,
    /// Controls must be hidden down to their min-height.
    Hidden,
}

/// Visibility of the Android controls view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
}

impl Visibility {
    /// Map a "should show" decision onto a visibility value.
    pub fn from_shown(shown: bool) -> Self {
        if shown { Self::Visible } else { Self::Invisible }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}
