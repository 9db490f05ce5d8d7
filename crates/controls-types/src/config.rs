//! Coordinator configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ControlsError, Result};

/// Where the browser controls live in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlsPosition {
    /// Controls are at the top, as in a normal tabbed browser window.
    #[default]
    Top,
    /// No controls view at all; treated as permanently off screen.
    None,
}

/// Tunables for the browser-controls coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub controls_position: ControlsPosition,
    pub top_controls_height: i32,
    pub top_controls_min_height: i32,
    pub bottom_controls_height: i32,
    pub bottom_controls_min_height: i32,
    /// Exit persistent fullscreen when the host activity stops.
    pub exit_fullscreen_on_stop: bool,
    /// Delay before the transient show after returning to a visible activity.
    pub activity_return_show_delay_ms: u32,
    /// Duration of a show animation starting from fully hidden controls.
    pub max_controls_animation_ms: u32,
    /// How long a transient show pins the controls to SHOWN.
    pub transient_show_duration_ms: u32,
    /// Delay before fullscreen flags are re-applied after focus or system UI changes.
    pub fullscreen_flags_reapply_delay_ms: u32,
    /// Delay between the first fullscreen layout and clearing the layout-fullscreen flag.
    pub clear_layout_flag_delay_ms: u32,
    /// Allow the one-time fullscreen notification toast.
    pub show_notification_toast: bool,
    /// Whether height changes should be animated by layout observers.
    pub animate_height_changes: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            controls_position: ControlsPosition::Top,
            top_controls_height: 56,
            top_controls_min_height: 0,
            bottom_controls_height: 0,
            bottom_controls_min_height: 0,
            exit_fullscreen_on_stop: true,
            activity_return_show_delay_ms: 100,
            max_controls_animation_ms: 200,
            transient_show_duration_ms: 3000,
            fullscreen_flags_reapply_delay_ms: 200,
            clear_layout_flag_delay_ms: 20,
            show_notification_toast: true,
            animate_height_changes: false,
        }
    }
}

impl ControlsConfig {
    /// Parse and validate a config from TOML source.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        log::info!(
            "Loaded controls config from {} (top {}/{}, bottom {}/{})",
            path.display(),
            config.top_controls_height,
            config.top_controls_min_height,
            config.bottom_controls_height,
            config.bottom_controls_min_height,
        );
        Ok(config)
    }

    /// Reject heights the coordinator would treat as contract violations.
    pub fn validate(&self) -> Result<()> {
        check_heights(
            "top",
            self.top_controls_height,
            self.top_controls_min_height,
        )?;
        check_heights(
            "bottom",
            self.bottom_controls_height,
            self.bottom_controls_min_height,
        )
    }
}

fn check_heights(which: &str, height: i32, min_height: i32) -> Result<()> {
    if height < 0 || min_height < 0 {
        return Err(ControlsError::Config(format!(
            "{which} controls heights must be non-negative (height {height}, min {min_height})"
        )));
    }
    if min_height > height {
        return Err(ControlsError::Config(format!(
            "{which} controls min-height {min_height} exceeds height {height}"
        )));
    }
    Ok(())
}
