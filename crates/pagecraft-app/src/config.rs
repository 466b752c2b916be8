//! Application configuration.

use pagecraft_core::{ComposerConfig, DEFAULT_SNAPSHOT_KEY};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Store key the canvas snapshot is saved under.
    pub snapshot_key: String,
    /// Directory for native file storage. `None` uses the platform data dir.
    pub storage_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Simple Website Builder".to_string(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            storage_dir: None,
        }
    }
}

impl AppConfig {
    pub fn composer_config(&self) -> ComposerConfig {
        ComposerConfig {
            snapshot_key: self.snapshot_key.clone(),
        }
    }
}
