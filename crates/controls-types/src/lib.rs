//! Foundation types for the browser-controls coordinator.
//!
//! This crate holds the platform-agnostic types shared by the coordinator and
//! its embedders: errors, configuration, tab and fullscreen value types, and
//! the serializable lifecycle event enum.

pub mod config;
pub mod error;
pub mod events;
pub mod state;

pub use config::{ControlsConfig, ControlsPosition};
pub use error::{ControlsError, Result};
pub use events::{ActivityState, ControlsEvent};
pub use state::{ControlsConstraint, FullscreenOptions, TabId, Visibility};
