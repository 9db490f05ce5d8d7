//! Error types for the browser-controls coordinator.
//!
//! Only the configuration and scenario boundaries produce recoverable errors.
//! Contract violations inside the coordinator (negative heights, offsets
//! applied before dimensions exist) are caller defects and panic instead.

use std::io;

/// Errors produced while loading configuration or replay scenarios.
#[derive(Debug, thiserror::Error)]
pub enum ControlsError {
    #[error("config error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ControlsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = ControlsError::Config("negative height".into());
        assert_eq!(format!("{e}"), "config error: negative height");
    }

    #[test]
    fn scenario_error_display() {
        let e = ControlsError::Scenario("unknown tab 7".into());
        assert_eq!(format!("{e}"), "scenario error: unknown tab 7");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: ControlsError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("top_controls_height = [[[").unwrap_err();
        let e: ControlsError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(ControlsError::Config("oops".into()));
        assert!(r.is_err());
    }
}
