//! Configuration file handling.
//!
//! This module provides loading and saving of surascan configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/surascan/config.toml`
//! - macOS: `~/Library/Application Support/surascan/config.toml`
//! - Windows: `%APPDATA%\surascan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! server_url = "http://localhost:8000"
//! poll_interval_ms = 2000
//! poll_timeout_secs = 120
//! default_format = "table"
//! offline_auth = false
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
///
/// This struct represents all configurable options for surascan.
/// It can be loaded from a TOML file or created with default values.
///
/// # Example
///
/// ```no_run
/// use surascan::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Server: {}", config.server_url);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the scan server.
    ///
    /// Default: `http://localhost:8000`
    pub server_url: String,

    /// How often a running scan job is polled, in milliseconds.
    ///
    /// Default: 2000
    pub poll_interval_ms: u64,

    /// How long to keep polling before giving up, in seconds.
    ///
    /// Default: 120 (2 minutes)
    pub poll_timeout_secs: u64,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json", "html"
    /// Default: "table"
    pub default_format: String,

    /// Use the offline demo session instead of the server's auth API.
    ///
    /// When enabled, login/logout only touch the local session store and
    /// never contact the server.
    ///
    /// Default: false
    pub offline_auth: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            poll_interval_ms: 2000,
            poll_timeout_secs: 120,
            default_format: "table".to_string(),
            offline_auth: false,
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("surascan")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    ///
    /// This is useful for showing users what the default config looks like.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
