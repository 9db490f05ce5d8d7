//! Scenario files: a coordinator config, the tabs that exist, and the event
//! script to replay against them.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use controls_types::{
    ControlsConfig, ControlsConstraint, ControlsError, ControlsEvent, Result, TabId,
};

fn default_true() -> bool {
    true
}

/// Initial state of one scripted tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabEntry {
    pub id: TabId,
    #[serde(default = "default_true")]
    pub interactable: bool,
    /// Constraint committed to the tab's renderer.
    #[serde(default)]
    pub constraint: ControlsConstraint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: ControlsConfig,
    #[serde(default)]
    pub tabs: Vec<TabEntry>,
    #[serde(default)]
    pub events: Vec<ControlsEvent>,
}

impl Scenario {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(src)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        let scenario = Self::from_toml_str(&src)?;
        log::info!(
            "Loaded scenario '{}' from {} ({} tabs, {} events)",
            scenario.name,
            path.display(),
            scenario.tabs.len(),
            scenario.events.len(),
        );
        Ok(scenario)
    }

    /// Catch scripts that would trip a coordinator contract mid-replay.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        let mut ids = BTreeSet::new();
        for tab in &self.tabs {
            if !ids.insert(tab.id) {
                return Err(ControlsError::Scenario(format!("duplicate {}", tab.id)));
            }
        }

        for (index, event) in self.events.iter().enumerate() {
            if let Some(tab) = event_tab(event) {
                if !ids.contains(&tab) {
                    return Err(ControlsError::Scenario(format!(
                        "event {index} refers to unknown {tab}"
                    )));
                }
            }
            match event {
                ControlsEvent::TopControlsHeight { height, min_height }
                | ControlsEvent::BottomControlsHeight { height, min_height } => {
                    if *height < 0 || *min_height < 0 || min_height > height {
                        return Err(ControlsError::Scenario(format!(
                            "event {index} has invalid heights {height}/{min_height}"
                        )));
                    }
                },
                _ => {},
            }
        }
        Ok(())
    }
}

/// The tab an event names, if any.
fn event_tab(event: &ControlsEvent) -> Option<TabId> {
    match *event {
        ControlsEvent::TabSwitched { tab } => tab,
        ControlsEvent::TabInteractabilityChanged { tab, .. }
        | ControlsEvent::TabHidden { tab }
        | ControlsEvent::NavigationFinished { tab, .. }
        | ControlsEvent::TabCrashed { tab }
        | ControlsEvent::RendererResponsiveChanged { tab, .. }
        | ControlsEvent::RendererOffsets { tab, .. }
        | ControlsEvent::EnterFullscreen { tab, .. }
        | ControlsEvent::ExitFullscreen { tab } => Some(tab),
        _ => None,
    }
}
