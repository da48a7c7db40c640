//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::SortColumn;
use crate::models::TrackingStatus;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// StudioTrack - release analytics for tracked game studios
///
/// Loads a studio catalog, filters every studio's releases by a date
/// window and reports per-studio and fleet-wide metrics.
///
/// Examples:
///   studiotrack --from 2024-02-01 --to 2024-03-31
///   studiotrack --last 90 --today 2024-03-31 --sort downloads --descending
///   studiotrack --catalog studios.toml --filter pixel --format json
///   studiotrack --catalog https://example.com/studios.json -o report.md
///   studiotrack --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Catalog to analyze: a .json/.toml file, an http(s) URL, or "builtin"
    ///
    /// Can also be set via STUDIOTRACK_CATALOG env var or .studiotrack.toml config.
    #[arg(long, value_name = "SOURCE", env = "STUDIOTRACK_CATALOG")]
    pub catalog: Option<String>,

    /// First day of the window (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Select the last N days up to today (e.g. 7, 30, 90)
    #[arg(long, value_name = "DAYS", conflicts_with_all = ["from", "to"])]
    pub last: Option<u32>,

    /// Reference day for --last and the configured default window
    ///
    /// Defaults to the current local date.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Only show studios whose name contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Only show studios with this tracking status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<StatusFilter>,

    /// Sort the studio table by this column
    #[arg(long, default_value = "catalog", value_name = "COLUMN")]
    pub sort: SortBy,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .studiotrack.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds for remote catalogs
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Focus genres shown per studio before collapsing into "+N"
    #[arg(long, value_name = "COUNT")]
    pub max_genres: Option<usize>,

    /// Leave the per-studio release listing out of the report
    #[arg(long)]
    pub no_releases: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .studiotrack.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Tracking status accepted by --status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    Active,
    Paused,
    Archived,
}

impl From<StatusFilter> for TrackingStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Active => TrackingStatus::Active,
            StatusFilter::Paused => TrackingStatus::Paused,
            StatusFilter::Archived => TrackingStatus::Archived,
        }
    }
}

/// Column accepted by --sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortBy {
    /// Keep catalog order
    #[default]
    Catalog,
    Name,
    Country,
    /// Releases in range
    Releases,
    /// Downloads in range
    Downloads,
    /// Average rating in range
    Rating,
    /// Lifetime game count
    TotalGames,
    /// Lifetime rating
    OverallRating,
}

impl From<SortBy> for SortColumn {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Catalog => SortColumn::Catalog,
            SortBy::Name => SortColumn::Name,
            SortBy::Country => SortColumn::Country,
            SortBy::Releases => SortColumn::Releases,
            SortBy::Downloads => SortColumn::Downloads,
            SortBy::Rating => SortColumn::Rating,
            SortBy::TotalGames => SortColumn::TotalGames,
            SortBy::OverallRating => SortColumn::OverallRating,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.last == Some(0) {
            return Err("--last must be at least 1 day".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Validate catalog source format
        if let Some(ref catalog) = self.catalog {
            let catalog = catalog.trim();
            if catalog.is_empty() {
                return Err("Catalog source cannot be empty".to_string());
            }
            if catalog.contains("://")
                && !catalog.starts_with("http://")
                && !catalog.starts_with("https://")
            {
                return Err("Catalog URL must start with 'http://' or 'https://'".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Returns true if the window was given explicitly on the command line.
    pub fn has_explicit_window(&self) -> bool {
        self.from.is_some() || self.to.is_some() || self.last.is_some()
    }
}
