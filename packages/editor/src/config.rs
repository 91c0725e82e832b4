use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "funnel-editor.config.json";

/// Editor tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet period after the last edit before an automatic save
    #[serde(default = "default_quiet_period_ms")]
    pub autosave_quiet_period_ms: u64,

    /// Pointer travel (px) before a press becomes a drag
    #[serde(default = "default_activation_distance")]
    pub drag_activation_distance: f64,
}

fn default_quiet_period_ms() -> u64 {
    2000
}

fn default_activation_distance() -> f64 {
    5.0
}

impl EditorConfig {
    /// Load config from a directory, defaults if the file is absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_period_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_quiet_period_ms: default_quiet_period_ms(),
            drag_activation_distance: default_activation_distance(),
        }
    }
}
