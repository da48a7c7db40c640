//! Catalog acquisition.
//!
//! Loads a catalog from the built-in fixtures, a local file, or a remote
//! JSON endpoint.

use super::{Catalog, CatalogError, CatalogFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fixtures compiled into the binary.
    Builtin,
    /// A local `.json` or `.toml` file.
    File(PathBuf),
    /// An `http(s)://` URL returning JSON.
    Remote(String),
}

impl CatalogSource {
    /// Interpret a `--catalog` value.
    ///
    /// `None` or `"builtin"` selects the fixtures, URLs select a remote
    /// fetch, anything else is a file path.
    pub fn from_arg(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => CatalogSource::Builtin,
            Some(v) if v.eq_ignore_ascii_case("builtin") => CatalogSource::Builtin,
            Some(v) if v.starts_with("http://") || v.starts_with("https://") => {
                CatalogSource::Remote(v.to_string())
            }
            Some(v) => CatalogSource::File(PathBuf::from(v)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Builtin => write!(f, "built-in fixtures"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Options for loading a catalog.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Request timeout for remote catalogs.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while fetching.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Load and validate a catalog from the given source.
pub async fn load_catalog(
    source: &CatalogSource,
    options: &LoadOptions,
) -> Result<Catalog, CatalogError> {
    debug!("Loading catalog from {}", source);

    let catalog = match source {
        CatalogSource::Builtin => Catalog::builtin()?,
        CatalogSource::File(path) => load_file(path).await?,
        CatalogSource::Remote(url) => fetch_remote(url, options).await?,
    };

    for (studio_id, game) in catalog.malformed_release_dates() {
        warn!(
            "Release '{}' of studio {} has an unreadable date and will never match a window",
            game, studio_id
        );
    }

    info!("Loaded {} studios from {}", catalog.len(), source);
    Ok(catalog)
}

async fn load_file(path: &Path) -> Result<Catalog, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Catalog::parse(
        &content,
        CatalogFormat::from_path(path),
        &path.display().to_string(),
    )
}

async fn fetch_remote(url: &str, options: &LoadOptions) -> Result<Catalog, CatalogError> {
    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Fetching catalog from {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let body = fetch_body(url, options).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Catalog::parse(&body?, CatalogFormat::Json, url)
}

async fn fetch_body(url: &str, options: &LoadOptions) -> Result<String, CatalogError> {
    let fetch_error = |source: reqwest::Error| CatalogError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()
        .map_err(fetch_error)?;

    let response = client.get(url).send().await.map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(fetch_error)
}
