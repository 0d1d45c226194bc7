use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::HN_API_BASE_URL;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the item API; item and ranking paths are appended to it.
    pub api_base_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout_secs: u64,
    /// Stories requested per listing page.
    pub page_size: usize,
    /// Top-level comments resolved when a story is first opened.
    pub comments_limit: usize,
    /// Reply levels resolved below each top-level comment on first open.
    pub initial_depth: usize,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter level, e.g. "info" or "debug".
    pub level: String,
    /// Directory for the daily rolling log file. Logs go to stderr when unset.
    pub log_directory: Option<String>,
    /// Extra per-module levels appended to the filter (`module=level`).
    pub module_levels: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: HN_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            page_size: 20,
            comments_limit: 5,
            initial_depth: 1,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_directory: None,
            module_levels: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive string built from `level` and `module_levels`.
    pub fn filter_directives(&self) -> String {
        let mut filter_str = self.level.clone();
        for (module, level) in &self.module_levels {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

impl AppConfig {
    /// Load `config.ron` from the first candidate location that parses.
    ///
    /// Candidates, in order: current directory, next to the executable, and
    /// the platform config directory (`hn-browse/config.ron`).
    pub fn load() -> Self {
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("hn-browse").join("config.ron"));
        }

        for path in candidates {
            if let Some(config) = Self::load_from(&path) {
                return config;
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    /// Load a specific file. `None` when it is missing or fails to parse.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read config at {}: {}", path.display(), e);
                return None;
            }
        };
        match ron::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                None
            }
        }
    }
}
