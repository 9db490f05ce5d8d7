//! Reference-counted opaque tokens.
//!
//! A [`TokenHolder`] answers one question: is anyone still holding a token?
//! Tokens come from a monotonic counter and may be released in any order.

use std::collections::BTreeSet;

/// An opaque token handed out by a [`TokenHolder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

/// A set of outstanding tokens.
#[derive(Debug, Default)]
pub struct TokenHolder {
    next: u64,
    held: BTreeSet<u64>,
}

impl TokenHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh token.
    pub fn acquire_token(&mut self) -> Token {
        let token = self.next;
        self.next += 1;
        self.held.insert(token);
        Token(token)
    }

    /// Release a token. Returns false if it was not held.
    pub fn release_token(&mut self, token: Token) -> bool {
        let released = self.held.remove(&token.0);
        if !released {
            log::warn!("Released a token that is not held: {token:?}");
        }
        released
    }

    pub fn has_tokens(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}
