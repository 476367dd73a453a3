//! Configuration system using TOML files.
//!
//! Config is read from the OS-standard config directory unless a path is
//! given on the command line:
//! - Windows: %APPDATA%\doizer\config.toml
//! - macOS: ~/Library/Application Support/doizer/config.toml
//! - Linux: ~/.config/doizer/config.toml
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! The file is never written by the program.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outbound request budget
    pub limiter: LimiterConfig,

    /// Crossref API settings
    pub crossref: CrossrefConfig,
}

/// Token bucket settings shared by all lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Sustained requests per second
    pub rate_per_second: u32,

    /// Requests allowed back to back before the rate applies
    pub burst: u32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            rate_per_second: 10,
            burst: 10,
        }
    }
}

impl LimiterConfig {
    pub fn rate(&self) -> Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.rate_per_second)
            .ok_or_else(|| ConfigError::Invalid("limiter.rate_per_second must be positive".into()))
    }

    pub fn burst(&self) -> Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.burst)
            .ok_or_else(|| ConfigError::Invalid("limiter.burst must be positive".into()))
    }
}

/// Crossref API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossrefConfig {
    /// Works search endpoint
    pub base_url: String,

    /// Contact address sent in the User-Agent (Crossref "polite pool")
    pub mailto: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.crossref.org/works".to_string(),
            mailto: None,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limiter.rate()?;
        self.limiter.burst()?;
        if self.crossref.base_url.is_empty() {
            return Err(ConfigError::Invalid("crossref.base_url must not be empty".into()));
        }
        if self.crossref.timeout_secs == 0 {
            return Err(ConfigError::Invalid("crossref.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("doizer"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

// ============================================================================
// Tests
// ============================================================================
