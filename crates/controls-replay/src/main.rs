//! Scenario replay for the browser controls coordinator.
//!
//! Loads a TOML scenario (config, tabs, event script), drives a coordinator
//! through it with logging collaborators attached, and prints a JSON summary
//! of the final state plus every collaborator call.
//!
//! Usage: `controls-replay [scenario.toml]`. Set `RUST_LOG=debug` to trace
//! the coordinator's own decisions.

mod replay;
mod scenario;
mod sinks;
mod tabs;

use std::path::PathBuf;

use anyhow::{Context, Result};

use scenario::Scenario;

const DEFAULT_SCENARIO: &str = "crates/controls-replay/scenarios/fullscreen.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CONTROLS_SCENARIO").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO));

    let scenario = Scenario::load(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    let summary = replay::replay(&scenario)
        .with_context(|| format!("replay of '{}' failed", scenario.name))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
