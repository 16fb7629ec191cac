//! Presentation settings of the viewer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Viewer settings, loaded from an optional YAML file.
///
/// Command-line flags override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Output shown in the result column; the main output when unset.
    pub output: Option<String>,
    /// Discrete variable to group by; no grouping when unset.
    pub group_by: Option<String>,
    /// How long to wait for the model workers after a lifecycle change.
    pub refresh_timeout_ms: u64,
    pub show_progress: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            output: None,
            group_by: None,
            refresh_timeout_ms: 10_000,
            show_progress: true,
        }
    }
}

impl ViewerConfig {
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }
}

/// Load a viewer config from a YAML file.
pub fn load_config(path: &Path) -> AppResult<ViewerConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: ViewerConfig = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;

    if config.refresh_timeout_ms == 0 {
        return Err(AppError::Config(
            "refresh_timeout_ms must be positive".to_string(),
        ));
    }
    tracing::debug!(path = %path.display(), ?config, "loaded viewer config");
    Ok(config)
}
