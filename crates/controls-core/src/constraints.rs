//! The browser's own say in where the controls may go.
//!
//! Persistent fullscreen pins the controls hidden. Outside fullscreen a
//! transient show (returning from background, for example) pins them shown for
//! as long as its token is held. Otherwise the renderer is free to scroll them.

use controls_types::ControlsConstraint;

use crate::tokens::{Token, TokenHolder};

#[derive(Debug, Default)]
pub struct BrowserControlsVisibilityDelegate {
    persistent_fullscreen: bool,
    transient_shows: TokenHolder,
    constraint: ControlsConstraint,
}

impl BrowserControlsVisibilityDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraint(&self) -> ControlsConstraint {
        self.constraint
    }

    pub fn is_persistent_fullscreen(&self) -> bool {
        self.persistent_fullscreen
    }

    /// Returns the new constraint if it changed.
    pub fn set_persistent_fullscreen(&mut self, enabled: bool) -> Option<ControlsConstraint> {
        self.persistent_fullscreen = enabled;
        self.update()
    }

    /// Pin the controls shown until the returned token is released.
    ///
    /// Refused while in persistent fullscreen.
    pub fn show_controls_transient(&mut self) -> Option<(Token, Option<ControlsConstraint>)> {
        if self.persistent_fullscreen {
            return None;
        }
        let token = self.transient_shows.acquire_token();
        Some((token, self.update()))
    }

    /// Returns the new constraint if it changed.
    pub fn release_transient(&mut self, token: Token) -> Option<ControlsConstraint> {
        self.transient_shows.release_token(token);
        self.update()
    }

    pub fn clear(&mut self) {
        self.persistent_fullscreen = false;
        self.transient_shows.clear();
        self.constraint = ControlsConstraint::Both;
    }

    fn update(&mut self) -> Option<ControlsConstraint> {
        let constraint = if self.persistent_fullscreen {
            ControlsConstraint::Hidden
        } else if self.transient_shows.has_tokens() {
            ControlsConstraint::Shown
        } else {
            ControlsConstraint::Both
        };
        if constraint == self.constraint {
            return None;
        }
        log::debug!("Browser controls constraint -> {constraint:?}");
        self.constraint = constraint;
        Some(constraint)
    }
}
