//! StudioTrack - release analytics for tracked game studios
//!
//! A CLI tool that loads a catalog of game studios, filters their
//! releases by a date window and reports per-studio and fleet-wide
//! metrics as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, catalog load, etc.)

mod analysis;
mod catalog;
mod cli;
mod config;
mod models;
mod report;

use analysis::{
    filter_by_name, filter_by_status, report_highlights, sort_rows, AnalyticsSession, DateWindow,
};
use anyhow::{Context, Result};
use catalog::{load_catalog, CatalogSource, LoadOptions};
use chrono::{Local, Utc};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `[general] verbose` applies
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("StudioTrack v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run_report(args, config).await {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .studiotrack.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to choose a catalog source, default window and report layout.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report printed to stdout stays clean.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("⚠️  A tracing subscriber was already installed; keeping it.");
    }
}

/// Load the catalog, compute metrics for the selected window and write the report.
async fn run_report(args: Args, config: Config) -> Result<()> {
    // Step 1: Load the catalog
    let source = CatalogSource::from_arg(config.catalog.source.as_deref());
    let load_options = LoadOptions {
        timeout_seconds: config.catalog.timeout_seconds,
        show_progress: !args.quiet,
    };

    let catalog = load_catalog(&source, &load_options)
        .await
        .with_context(|| format!("Failed to load catalog from {}", source))?;

    // Step 2: Resolve the date window
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let window = DateWindow::resolve(
        args.from,
        args.to,
        args.last,
        config.window.default_days,
        today,
    );

    if !args.has_explicit_window() {
        debug!("No window on the command line, using configured default");
    }
    if !window.is_set() {
        warn!("Date range is not fully selected ({}); windowed metrics will be zero", window);
    } else if window.is_inverted() {
        warn!("Date range {} ends before it starts; no releases can match", window);
    }
    info!("Date range: {}", window);

    // Step 3: Compute metrics
    let mut session = AnalyticsSession::new(Arc::new(catalog), window);
    let summary = session.summary().clone();
    let mut rows = session.metrics().to_vec();
    let studios_tracked = session.catalog().len();
    let highlights = report_highlights(&rows, config.report.top_studios);

    // Step 4: Shape the studio table
    if let Some(ref query) = args.filter {
        rows = filter_by_name(rows, query);
    }
    if let Some(status) = args.status {
        rows = filter_by_status(rows, status.into());
    }
    sort_rows(&mut rows, args.sort.into(), args.descending);
    debug!("Showing {} of {} studios", rows.len(), studios_tracked);

    let report = Report {
        metadata: ReportMetadata {
            catalog_source: source.to_string(),
            generated_at: Utc::now(),
            window,
            studios_tracked,
            name_filter: args.filter.clone(),
            status_filter: args.status.map(Into::into),
        },
        summary,
        highlights,
        studios: rows,
    };

    // Step 5: Generate and write the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", output),
    }

    // Print summary
    if !args.quiet {
        let summary = &report.summary;
        eprintln!("\n📊 Studio Summary ({}):", window);
        eprintln!("   Studios: {} ({} active)", summary.studio_count, summary.active_studio_count);
        eprintln!("   Releases in range: {}", summary.total_releases);
        eprintln!(
            "   Downloads in range: {}",
            report::format_thousands(summary.total_downloads)
        );
        if summary.studios_with_releases > 0 {
            eprintln!(
                "   Avg rating: {:.1} across {} studios",
                summary.average_rating_across_studios, summary.studios_with_releases
            );
        } else {
            eprintln!("   Avg rating: N/A");
        }
        if let Some(ref path) = args.output {
            eprintln!("\n✅ Report saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems are reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
