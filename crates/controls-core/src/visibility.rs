//! Visibility of the Android controls view.
//!
//! The view is shown while the composited controls are not drawn as a
//! texture, or while something needs the real view on screen (a browser-driven
//! animation, a top-anchored child of the content view). Any outstanding
//! hiding token overrides all of that.
//!
//! Mutations are debounced onto the next animation frame through a single
//! pending slot: the most recent desired value wins, and a value equal to the
//! one already applied clears the slot instead of scheduling work.

use controls_types::Visibility;

use crate::tokens::{Token, TokenHolder};

#[derive(Debug)]
pub struct VisibilityScheduler {
    has_controls_view: bool,
    hiding_tokens: TokenHolder,
    offset_overridden: bool,
    tab_interactable: bool,
    top_anchored_child: bool,
    applied: Visibility,
    pending: Option<Visibility>,
}

impl VisibilityScheduler {
    /// `has_controls_view` is false when the window has no controls at all.
    pub fn new(has_controls_view: bool) -> Self {
        Self {
            has_controls_view,
            hiding_tokens: TokenHolder::new(),
            offset_overridden: false,
            tab_interactable: false,
            top_anchored_child: false,
            applied: Visibility::Visible,
            pending: None,
        }
    }

    /// Force the controls view hidden until the token is released.
    pub fn acquire_hiding_token(&mut self) -> Token {
        self.hiding_tokens.acquire_token()
    }

    pub fn release_hiding_token(&mut self, token: Token) -> bool {
        self.hiding_tokens.release_token(token)
    }

    /// Acquire a new hiding token before dropping `old`, so the set never
    /// goes empty in between.
    pub fn replace_hiding_token(&mut self, old: Token) -> Token {
        let token = self.hiding_tokens.acquire_token();
        self.hiding_tokens.release_token(old);
        token
    }

    pub fn has_hiding_tokens(&self) -> bool {
        self.hiding_tokens.has_tokens()
    }

    pub fn set_offset_overridden(&mut self, overridden: bool) {
        self.offset_overridden = overridden;
    }

    pub fn offset_overridden(&self) -> bool {
        self.offset_overridden
    }

    pub fn set_tab_interactable(&mut self, interactable: bool) {
        self.tab_interactable = interactable;
    }

    pub fn set_top_anchored_child(&mut self, top_anchored: bool) {
        self.top_anchored_child = top_anchored;
    }

    /// Whether the real controls view should be on screen.
    pub fn should_show(&self, draw_controls_as_texture: bool) -> bool {
        if !self.has_controls_view || self.hiding_tokens.has_tokens() {
            return false;
        }
        if self.offset_overridden {
            return true;
        }
        !draw_controls_as_texture || (self.tab_interactable && self.top_anchored_child)
    }

    pub fn recompute_visibility(&self, draw_controls_as_texture: bool) -> Visibility {
        Visibility::from_shown(self.should_show(draw_controls_as_texture))
    }

    /// Recompute and, if it differs from what is applied, park the new value
    /// for the next frame. Returns whether a mutation is now pending.
    pub fn schedule_update(&mut self, draw_controls_as_texture: bool) -> bool {
        if !self.has_controls_view {
            return false;
        }
        let desired = self.recompute_visibility(draw_controls_as_texture);
        if desired == self.applied {
            self.pending = None;
        } else {
            self.pending = Some(desired);
        }
        self.pending.is_some()
    }

    pub fn has_pending_update(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the pending frame work. Returns the visibility to push to the
    /// view, if it changed.
    pub fn run_pending(&mut self) -> Option<Visibility> {
        let desired = self.pending.take()?;
        if desired == self.applied {
            return None;
        }
        self.applied = desired;
        log::debug!("Controls view visibility -> {desired:?}");
        Some(desired)
    }

    /// The visibility last pushed to the view.
    pub fn applied_visibility(&self) -> Visibility {
        self.applied
    }

    /// Drop pending work and every hiding token.
    pub fn reset(&mut self) {
        self.pending = None;
        self.hiding_tokens.clear();
        self.offset_overridden = false;
    }
}
