//! Configuration file parser for ~/.config/agro-radar/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and logged as warnings so typos show up
//! in the log.
use crate::feed::{Endpoint, DEFAULT_API_URL, DEFAULT_LIMIT, DEFAULT_TIMEOUT};
use crate::filter::{CategoryMode, DEFAULT_FIXED_CATEGORIES};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Which API route to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// `/api/articles?limit=N`: plain listing.
    #[default]
    Articles,
    /// `/api/output`: aggregated feed with a hero article.
    Output,
}

/// Where the category filter options come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryModeKind {
    #[default]
    Derived,
    Fixed,
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the news API (scheme + host, no path).
    pub api_url: String,

    pub endpoint: EndpointKind,

    /// Page size for the `articles` endpoint. 0 omits the parameter.
    pub limit: u32,

    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    pub category_mode: CategoryModeKind,

    /// Options used when `category_mode = "fixed"`.
    pub fixed_categories: Vec<String>,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            endpoint: EndpointKind::Articles,
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            theme: "dark".to_string(),
            category_mode: CategoryModeKind::Derived,
            fixed_categories: DEFAULT_FIXED_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "api_url",
        "endpoint",
        "limit",
        "timeout_secs",
        "theme",
        "category_mode",
        "fixed_categories",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            api_url = %config.api_url,
            endpoint = ?config.endpoint,
            theme = %config.theme,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Pick the API base URL: CLI flag, then environment, then this file.
    /// Blank values are skipped.
    pub fn resolve_api_url(&self, cli: Option<&str>, env: Option<&str>) -> String {
        [cli, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.api_url.clone())
    }

    pub fn feed_endpoint(&self) -> Endpoint {
        match self.endpoint {
            EndpointKind::Articles => Endpoint::Articles {
                limit: (self.limit > 0).then_some(self.limit),
            },
            EndpointKind::Output => Endpoint::Output,
        }
    }

    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    pub fn category_mode(&self) -> CategoryMode {
        match self.category_mode {
            CategoryModeKind::Derived => CategoryMode::Derived,
            CategoryModeKind::Fixed if self.fixed_categories.is_empty() => {
                CategoryMode::default_fixed()
            }
            CategoryModeKind::Fixed => CategoryMode::Fixed(self.fixed_categories.clone()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
