// src/config.rs
//
// Database configuration
//
// Loaded from a JSON file or built in code. Every field has a default so an
// empty object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "kitchen-ledger";
const DB_FILE: &str = "kitchen-ledger.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; defaults to the application data directory
    pub path: Option<PathBuf>,

    /// Upper bound on pooled connections
    pub max_connections: u32,

    /// How long a writer waits for the database lock
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 15,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for an explicit database file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: DatabaseConfig = serde_json::from_str(&raw)?;

        if config.max_connections == 0 {
            return Err(AppError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Resolve the database file path
    ///
    /// Without an explicit path the database lives in
    /// {APP_DATA}/kitchen-ledger/kitchen-ledger.db; the directory is created.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let app_data_dir = dirs::data_dir().ok_or_else(|| {
            AppError::Configuration("Could not determine app data directory".to_string())
        })?;

        let dir = app_data_dir.join(APP_DIR);
        std::fs::create_dir_all(&dir)?;

        Ok(dir.join(DB_FILE))
    }
}
