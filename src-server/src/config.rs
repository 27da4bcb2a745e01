//! Application Configuration
//!
//! Optional JSON file, then environment overrides:
//! `KANBAN_DB_PATH`, `KANBAN_LOG_DIR`, `OPENAI_API_KEY`,
//! `KANBAN_AI_BASE_URL`, `KANBAN_AI_MODEL`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const ENV_DB_PATH: &str = "KANBAN_DB_PATH";
pub const ENV_LOG_DIR: &str = "KANBAN_LOG_DIR";
pub const ENV_AI_KEY: &str = "OPENAI_API_KEY";
pub const ENV_AI_BASE_URL: &str = "KANBAN_AI_BASE_URL";
pub const ENV_AI_MODEL: &str = "KANBAN_AI_MODEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file, or ":memory:"
    pub db_path: PathBuf,
    /// Rolling log files go here; no file logging when unset
    pub log_dir: Option<PathBuf>,
    pub openai_api_key: Option<String>,
    pub ai_base_url: Option<String>,
    pub ai_model: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("kanban.db"),
            log_dir: None,
            openai_api_key: None,
            ai_base_url: None,
            ai_model: None,
        }
    }
}

impl AppConfig {
    /// In-memory database, no logging, no AI
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            ..Self::default()
        }
    }

    /// Read `file` when given, then apply the process environment
    pub fn load(file: Option<&Path>) -> DomainResult<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Configuration(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::Configuration(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Overwrite fields from `lookup` (blank values are ignored)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = get(ENV_AI_KEY) {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = get(ENV_AI_BASE_URL) {
            self.ai_base_url = Some(url);
        }
        if let Some(model) = get(ENV_AI_MODEL) {
            self.ai_model = Some(model);
        }
    }
}
