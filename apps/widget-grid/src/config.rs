use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use crate::layout::geometry::DEFAULT_MAX_PAGES;
use crate::store::{validate_key, DEFAULT_STORE_KEY};

/// Engine configuration loaded from environment variables.
/// Every variable is optional; unset variables fall back to `EngineConfig::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub max_pages: usize,
    /// Directory for the file store. `None` keeps widgets in memory only.
    pub store_dir: Option<PathBuf>,
    pub store_key: String,
    pub rust_log: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_pages: DEFAULT_MAX_PAGES,
            store_dir: None,
            store_key: DEFAULT_STORE_KEY.to_string(),
            rust_log: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = EngineConfig::default();

        let max_pages = match lookup("WIDGET_GRID_MAX_PAGES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("WIDGET_GRID_MAX_PAGES must be a positive integer")?,
            None => defaults.max_pages,
        };
        ensure!(max_pages >= 1, "WIDGET_GRID_MAX_PAGES must be at least 1");

        let store_key = lookup("WIDGET_GRID_STORE_KEY").unwrap_or(defaults.store_key);
        validate_key(&store_key)
            .with_context(|| format!("WIDGET_GRID_STORE_KEY '{store_key}' is not a valid key"))?;

        Ok(EngineConfig {
            max_pages,
            store_dir: lookup("WIDGET_GRID_STORE_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            store_key,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}
