//! Shared application state for the web server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cdk46kb_config::PathsConfig;

/// Shared state injected into every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub paths: PathsConfig,
}

impl AppState {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    /// State serving an existing data directory.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            paths: PathsConfig { data_dir: data_dir.into(), ..PathsConfig::default() },
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.paths.data_dir
    }
}

pub type SharedState = Arc<AppState>;
