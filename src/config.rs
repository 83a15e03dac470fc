//! Application configuration
//!
//! Values come from `~/.authors-tui/config.json` when present, then
//! command-line flags override them.

use crate::model::debounce::DEFAULT_FILTER_DEBOUNCE;
use crate::model::view::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATA_SOURCE: &str = "assets/data/data-my-questions.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the JSON file holding the author records
    pub data_source: String,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub filter_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            filter_debounce_ms: DEFAULT_FILTER_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".authors-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the user config, falling back to defaults
    pub fn load() -> Config {
        match Self::config_path() {
            Some(path) => Self::load_or_create(&path),
            None => Config::default(),
        }
    }

    /// Load from `path`; on first run write the defaults there for editing
    pub fn load_or_create(path: &Path) -> Config {
        if let Some(config) = Self::load_from(path) {
            return config;
        }

        let config = Config::default();
        if !path.exists() {
            if let Err(e) = config.save_to(path) {
                tracing::warn!(path = %path.display(), "could not write default config: {}", e);
            }
        }
        config
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {}", e);
                None
            }
        }
    }

    /// Save the config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// Rows per page; zero falls back to the default
    pub fn page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Page size options, always including the configured page size
    pub fn page_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .page_size_options
            .iter()
            .copied()
            .filter(|s| *s > 0)
            .collect();
        let page_size = self.page_size();
        if !sizes.contains(&page_size) {
            sizes.push(page_size);
        }
        sizes.sort_unstable();
        sizes
    }
}
