//! controls-core: the browser controls offset coordinator.
//!
//! [`OffsetManager`] owns controls heights and offsets,
//! [`FullscreenModeController`] runs the persistent fullscreen state machine,
//! and [`VisibilityScheduler`] decides when the Android controls view is on
//! screen. [`ControlsCoordinator`] wires them to the embedder's views through
//! the traits in [`sinks`]. Everything is single-threaded; delayed work runs
//! off the frame clock the embedder drives.

pub mod animation;
pub mod constraints;
pub mod coordinator;
pub mod fullscreen;
pub mod observer;
pub mod offsets;
pub mod scheduler;
pub mod sinks;
pub mod tokens;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_utils;

pub use constraints::BrowserControlsVisibilityDelegate;
pub use coordinator::ControlsCoordinator;
pub use fullscreen::{
    FullscreenEffect, FullscreenListener, FullscreenModeController, FullscreenState,
};
pub use observer::{ObserverId, ObserverList};
pub use offsets::{BrowserControlsObserver, ControlsDimensions, ControlsOffsets, OffsetManager};
pub use sinks::{
    AndroidControlsViewSink, ContentViewSink, FullscreenUiSink, NullFullscreenUi,
    TabControlsFeedback,
};
pub use tokens::{Token, TokenHolder};
pub use visibility::VisibilityScheduler;
