//! Studio catalog.
//!
//! One canonical schema for studios and their releases, parsed from JSON or
//! TOML and validated before any analytics run on it. The catalog is
//! read-only once built.

mod loader;

pub use loader::{load_catalog, CatalogSource, LoadOptions};

use crate::models::Studio;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixture catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../../fixtures/studios.json");

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog request to {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse catalog {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("duplicate studio id '{0}'")]
    DuplicateId(String),

    #[error("studio #{index} has an empty {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("rating {rating} for {subject} is outside 0-5")]
    InvalidRating { subject: String, rating: f64 },
}

/// Serialization format of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    /// Guess the format from a file extension. Defaults to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => CatalogFormat::Toml,
            _ => CatalogFormat::Json,
        }
    }
}

/// Document shape with a top-level `studios` list (TOML `[[studios]]`).
#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    studios: Vec<Studio>,
}

/// A validated, read-only set of studios.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    studios: Vec<Studio>,
}

impl Catalog {
    /// Build a catalog, validating every studio.
    pub fn from_studios(studios: Vec<Studio>) -> Result<Self, CatalogError> {
        validate_studios(&studios)?;
        Ok(Self { studios })
    }

    /// Parse and validate a catalog document.
    ///
    /// JSON may be a bare array of studios or an object with a `studios`
    /// array. TOML uses `[[studios]]` tables.
    pub fn parse(content: &str, format: CatalogFormat, origin: &str) -> Result<Self, CatalogError> {
        let parse_error = |message: String| CatalogError::Parse {
            origin: origin.to_string(),
            message,
        };

        let studios = match format {
            CatalogFormat::Json if content.trim_start().starts_with('[') => {
                serde_json::from_str::<Vec<Studio>>(content)
                    .map_err(|e| parse_error(e.to_string()))?
            }
            CatalogFormat::Json => {
                serde_json::from_str::<CatalogDocument>(content)
                    .map_err(|e| parse_error(e.to_string()))?
                    .studios
            }
            CatalogFormat::Toml => {
                toml::from_str::<CatalogDocument>(content)
                    .map_err(|e| parse_error(e.to_string()))?
                    .studios
            }
        };

        Self::from_studios(studios)
    }

    /// The fixture catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(BUILTIN_CATALOG, CatalogFormat::Json, "built-in fixtures")
    }

    pub fn studios(&self) -> &[Studio] {
        &self.studios
    }

    pub fn len(&self) -> usize {
        self.studios.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.studios.is_empty()
    }

    /// Look up a studio by id.
    #[allow(dead_code)] // Lookup for callers holding a studio id
    pub fn get(&self, id: &str) -> Option<&Studio> {
        self.studios.iter().find(|studio| studio.id == id)
    }

    /// `(studio id, game name)` for every release whose date cannot be parsed.
    ///
    /// These are kept in the catalog but never match a date window.
    pub fn malformed_release_dates(&self) -> Vec<(&str, &str)> {
        self.studios
            .iter()
            .flat_map(|studio| {
                studio
                    .game_releases
                    .iter()
                    .filter(|release| release.release_day().is_none())
                    .map(move |release| (studio.id.as_str(), release.game_name.as_str()))
            })
            .collect()
    }
}

fn validate_studios(studios: &[Studio]) -> Result<(), CatalogError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, studio) in studios.iter().enumerate() {
        if studio.id.trim().is_empty() {
            return Err(CatalogError::MissingField { index, field: "id" });
        }
        if studio.name.trim().is_empty() {
            return Err(CatalogError::MissingField {
                index,
                field: "name",
            });
        }
        if !seen.insert(studio.id.as_str()) {
            return Err(CatalogError::DuplicateId(studio.id.clone()));
        }

        check_rating(studio.average_rating, || studio.id.clone())?;
        for release in &studio.game_releases {
            check_rating(release.rating, || {
                format!("{} / {}", studio.id, release.game_name)
            })?;
        }
    }

    Ok(())
}

fn check_rating(rating: f64, subject: impl FnOnce() -> String) -> Result<(), CatalogError> {
    // NaN fails the range check too.
    if (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(CatalogError::InvalidRating {
            subject: subject(),
            rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackingStatus;

    const TWO_STUDIOS: &str = r#"[
        {"id": "a", "name": "Alpha", "country": "Finland", "trackingStatus": "active",
         "gameReleases": [{"gameName": "A1", "releaseDate": "2024-01-02",
                           "genre": "Puzzle", "rating": 4.0, "downloads": 10}]},
        {"id": "b", "name": "Beta", "country": "Chile", "trackingStatus": "archived"}
    ]"#;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 4);

        let anime = catalog.get("studio_3").unwrap();
        assert_eq!(anime.name, "Anime Studio Games");
        assert_eq!(anime.tracking_status, TrackingStatus::Paused);
        assert_eq!(anime.game_releases.len(), 5);
        assert!(catalog.malformed_release_dates().is_empty());
    }

    #[test]
    fn test_parse_json_array_and_document() {
        let listing = Catalog::parse(TWO_STUDIOS, CatalogFormat::Json, "test").unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing.get("b").unwrap().game_releases.is_empty());

        let wrapped = format!("{{\"studios\": {}}}", TWO_STUDIOS);
        let document = Catalog::parse(&wrapped, CatalogFormat::Json, "test").unwrap();
        assert_eq!(document, listing);
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
[[studios]]
id = "toml_1"
name = "Toml Games"
country = "Germany"
focusGenres = ["Strategy"]
trackingStatus = "paused"
totalGames = 2
averageRating = 3.9

[[studios.gameReleases]]
gameName = "Border Wars"
releaseDate = "2024-02-11"
genre = "Strategy"
rating = 3.8
downloads = 1200
"#;

        let catalog = Catalog::parse(content, CatalogFormat::Toml, "test.toml").unwrap();
        let studio = catalog.get("toml_1").unwrap();
        assert_eq!(studio.game_releases[0].downloads, 1200);
        assert_eq!(studio.focus_genres, vec!["Strategy"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let content = r#"[
            {"id": "dup", "name": "One", "country": "X", "trackingStatus": "active"},
            {"id": "dup", "name": "Two", "country": "Y", "trackingStatus": "active"}
        ]"#;

        let err = Catalog::parse(content, CatalogFormat::Json, "test").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "dup"));
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let content = r#"[
            {"id": "a", "name": "Alpha", "country": "X", "trackingStatus": "active",
             "gameReleases": [{"gameName": "Too Good", "releaseDate": "2024-01-02",
                               "genre": "Puzzle", "rating": 7.5, "downloads": 10}]}
        ]"#;

        let err = Catalog::parse(content, CatalogFormat::Json, "test").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRating { rating, .. } if rating == 7.5));
    }

    #[test]
    fn test_rejects_empty_name() {
        let content = r#"[{"id": "a", "name": " ", "country": "X", "trackingStatus": "active"}]"#;

        let err = Catalog::parse(content, CatalogFormat::Json, "test").unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_malformed_dates_are_kept() {
        let content = r#"[
            {"id": "a", "name": "Alpha", "country": "X", "trackingStatus": "active",
             "gameReleases": [{"gameName": "Someday", "releaseDate": "Q3",
                               "genre": "Puzzle", "rating": 4.0, "downloads": 10}]}
        ]"#;

        let catalog = Catalog::parse(content, CatalogFormat::Json, "test").unwrap();
        assert_eq!(catalog.malformed_release_dates(), vec![("a", "Someday")]);
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = Catalog::parse("{not json", CatalogFormat::Json, "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("studios.TOML")),
            CatalogFormat::Toml
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("studios.json")),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("studios")),
            CatalogFormat::Json
        );
    }
}
