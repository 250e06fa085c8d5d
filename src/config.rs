//! Configuration file handling.
//!
//! This module provides loading and saving of mcp-directory configuration
//! from a TOML file. Every key is optional; missing keys take their default.
//!
//! # Configuration Location
//!
//! - Linux: `~/.config/mcp-directory/config.toml`
//! - macOS: `~/Library/Application Support/mcp-directory/config.toml`
//! - Windows: `%APPDATA%\mcp-directory\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! data_dir = "/srv/mcps-data"
//! skip_malformed = true
//! default_format = "table"
//!
//! [readme]
//! cache_ttl_hours = 1
//! timeout_secs = 10
//! use_cache = true
//! github_token = "ghp_..."
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::resolver::MalformedPolicy;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use mcp_directory::Config;
///
/// let config = Config::load().unwrap();
/// println!("Records: {}", config.data_dir.display());
/// println!("README timeout: {}s", config.readme.timeout_secs);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON record per package.
    ///
    /// Default: `mcps-data` (relative to the working directory)
    pub data_dir: PathBuf,

    /// Skip records that fail to load instead of failing the whole listing.
    ///
    /// Default: false
    pub skip_malformed: bool,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json", "html"
    /// Default: "table"
    pub default_format: String,

    /// README fetching options.
    pub readme: ReadmeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    /// How long fetched READMEs stay cached, in hours.
    ///
    /// Default: 1
    pub cache_ttl_hours: u64,

    /// Per-request timeout, in seconds.
    ///
    /// Default: 10
    pub timeout_secs: u64,

    /// Whether to cache fetched READMEs on disk.
    ///
    /// Default: true
    pub use_cache: bool,

    /// Token sent to the GitHub contents API. `GITHUB_TOKEN` takes
    /// precedence when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: 1,
            timeout_secs: 10,
            use_cache: true,
            github_token: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("mcps-data"),
            skip_malformed: false,
            default_format: "table".to_string(),
            readme: ReadmeConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file, or defaults if there is
    /// none.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("invalid config file {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration, creating the parent directory if needed.
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

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mcp-directory")
            .join("config.toml")
    }

    pub fn malformed_policy(&self) -> MalformedPolicy {
        if self.skip_malformed {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Abort
        }
    }

    pub fn generate_default_config() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}
