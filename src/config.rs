//! Application configuration.
//!
//! Three tiers, lowest to highest priority: built-in defaults, an optional
//! YAML file (`taskflow.yaml` in the working directory, else
//! `~/.taskflow/config.yaml`), and environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Collection names on the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collections {
    #[serde(default = "default_tasks_collection")]
    pub tasks: String,
    #[serde(default = "default_tags_collection")]
    pub tags: String,
    #[serde(default = "default_task_tags_collection")]
    pub task_tags: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            tasks: default_tasks_collection(),
            tags: default_tags_collection(),
            task_tags: default_task_tags_collection(),
        }
    }
}

fn default_tasks_collection() -> String {
    "tasks".to_string()
}

fn default_tags_collection() -> String {
    "tags".to_string()
}

fn default_task_tags_collection() -> String {
    "task_tags".to_string()
}

fn default_page_size() -> usize {
    100
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Project id handed to the concrete gateway implementation.
    #[serde(default)]
    pub project_id: String,

    /// Public API key handed to the concrete gateway implementation.
    #[serde(default)]
    pub public_key: String,

    #[serde(default)]
    pub collections: Collections,

    /// Page size for list fetches (default: 100).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            public_key: String::new(),
            collections: Collections::default(),
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the first config file found, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::discover_file() {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };
        let vars: HashMap<String, String> = std::env::vars().collect();
        config.apply_env(&vars);
        Ok(config)
    }

    /// Parse a YAML config file. Missing fields fall back to defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn discover_file() -> Option<PathBuf> {
        let local = PathBuf::from("taskflow.yaml");
        if local.exists() {
            return Some(local);
        }
        let user = dirs::home_dir()?.join(".taskflow").join("config.yaml");
        user.exists().then_some(user)
    }

    /// Apply environment overrides from the given variable map.
    fn apply_env(&mut self, vars: &HashMap<String, String>) {
        if let Some(v) = vars.get("TASKFLOW_PROJECT_ID") {
            self.project_id = v.clone();
        }
        if let Some(v) = vars.get("TASKFLOW_PUBLIC_KEY") {
            self.public_key = v.clone();
        }
        if let Some(v) = vars.get("TASKFLOW_TASKS_COLLECTION") {
            self.collections.tasks = v.clone();
        }
        if let Some(v) = vars.get("TASKFLOW_TAGS_COLLECTION") {
            self.collections.tags = v.clone();
        }
        if let Some(v) = vars.get("TASKFLOW_TASK_TAGS_COLLECTION") {
            self.collections.task_tags = v.clone();
        }
        if let Some(v) = vars.get("TASKFLOW_PAGE_SIZE") {
            match v.parse() {
                Ok(n) => self.page_size = n,
                Err(_) => warn!(value = %v, "ignoring invalid TASKFLOW_PAGE_SIZE"),
            }
        }
    }
}
