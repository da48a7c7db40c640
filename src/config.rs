//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.studiotrack.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".studiotrack.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Catalog source settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Date window settings.
    #[serde(default)]
    pub window: WindowConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where studios are loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// File path or `http(s)://` URL; the built-in fixtures when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Request timeout in seconds for remote catalogs.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Date window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Days back from today selected when no window is given.
    ///
    /// When unset, metrics stay zeroed until a window is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_days: Option<u32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_days: Some(30),
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Focus genres shown per studio before collapsing into `+N`.
    #[serde(default = "default_max_genres")]
    pub max_genres: usize,

    /// List each studio's in-range releases.
    #[serde(default = "default_true")]
    pub include_releases: bool,

    /// Number of studios in the top-downloads section.
    #[serde(default = "default_top_studios")]
    pub top_studios: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_genres: default_max_genres(),
            include_releases: true,
            top_studios: default_top_studios(),
        }
    }
}

fn default_max_genres() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_top_studios() -> usize {
    3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref source) = args.catalog {
            self.catalog.source = Some(source.clone());
        }
        if let Some(timeout) = args.timeout {
            self.catalog.timeout_seconds = timeout;
        }

        if let Some(max_genres) = args.max_genres {
            self.report.max_genres = max_genres;
        }
        if args.no_releases {
            self.report.include_releases = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
