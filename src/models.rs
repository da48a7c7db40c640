//! Data models for studio tracking.
//!
//! This module contains the catalog records (studios and their release
//! events) and the derived analytics structures used for reporting.

use crate::analysis::{parse_release_date, DateWindow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracking status of a studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingStatus {
    /// Studio is actively tracked
    Active,
    /// Tracking temporarily suspended
    Paused,
    /// No longer tracked, kept for history
    Archived,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::Active => write!(f, "active"),
            TrackingStatus::Paused => write!(f, "paused"),
            TrackingStatus::Archived => write!(f, "archived"),
        }
    }
}

impl TrackingStatus {
    /// Returns an emoji badge for the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            TrackingStatus::Active => "🟢",
            TrackingStatus::Paused => "🟡",
            TrackingStatus::Archived => "⚪",
        }
    }
}

/// Which events a studio should notify about.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub new_releases: bool,
    #[serde(default = "default_true")]
    pub ratings: bool,
    #[serde(default = "default_true")]
    pub updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            new_releases: true,
            ratings: true,
            updates: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A single game launch owned by a studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseEvent {
    /// Game title (not unique across studios).
    pub game_name: String,
    /// Release date as supplied by the catalog.
    ///
    /// Kept verbatim; normalized to a calendar day only when compared.
    pub release_date: String,
    /// Free-form genre tag.
    pub genre: String,
    /// Store rating, expected in `[0, 5]`.
    pub rating: f64,
    /// Number of downloads.
    pub downloads: u64,
}

impl ReleaseEvent {
    /// Calendar day of the release, or `None` if the date is malformed.
    pub fn release_day(&self) -> Option<NaiveDate> {
        parse_release_date(&self.release_date)
    }
}

/// A tracked game studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Studio {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Home country.
    pub country: String,
    /// Focus genres in display order.
    #[serde(default)]
    pub focus_genres: Vec<String>,
    /// Current tracking status.
    pub tracking_status: TrackingStatus,
    /// Lifetime number of games (supplied externally).
    #[serde(default)]
    pub total_games: u32,
    /// Lifetime average rating (supplied externally).
    #[serde(default)]
    pub average_rating: f64,
    /// Release history, in catalog order.
    #[serde(default)]
    pub game_releases: Vec<ReleaseEvent>,
    // Descriptive fields below are carried for catalog round-trips only.
    #[allow(dead_code)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[allow(dead_code)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[allow(dead_code)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

impl Studio {
    /// Latest parseable release date.
    pub fn last_release_date(&self) -> Option<NaiveDate> {
        self.game_releases
            .iter()
            .filter_map(ReleaseEvent::release_day)
            .max()
    }

    /// Names of the `n` most recent releases, newest first.
    ///
    /// Releases with malformed dates are skipped.
    pub fn recent_games(&self, n: usize) -> Vec<&str> {
        let mut dated: Vec<(NaiveDate, &str)> = self
            .game_releases
            .iter()
            .filter_map(|r| r.release_day().map(|day| (day, r.game_name.as_str())))
            .collect();

        dated.sort_by(|a, b| b.0.cmp(&a.0));
        dated.into_iter().take(n).map(|(_, name)| name).collect()
    }
}

/// Number of recent game names carried on each metrics row.
const RECENT_GAMES: usize = 3;

/// Windowed metrics for a single studio.
///
/// Recomputed whenever the catalog or the window changes; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioMetrics {
    pub studio_id: String,
    /// Position of the studio in the catalog.
    #[serde(skip)]
    pub catalog_index: usize,
    pub name: String,
    pub country: String,
    pub focus_genres: Vec<String>,
    pub tracking_status: TrackingStatus,
    /// Lifetime game count, copied from the studio.
    pub total_games: u32,
    /// Lifetime rating, copied from the studio.
    pub average_rating: f64,
    /// Number of releases inside the window.
    pub releases_in_range: usize,
    /// Sum of downloads over releases inside the window.
    pub total_downloads_in_range: u64,
    /// Mean rating over releases inside the window.
    ///
    /// `0.0` when `releases_in_range == 0`; check the count to tell the
    /// sentinel apart from a real zero rating.
    pub average_rating_in_range: f64,
    /// The matched releases, in catalog order.
    pub releases: Vec<ReleaseEvent>,
    /// Latest release overall, regardless of the window.
    pub last_release: Option<NaiveDate>,
    /// Most recent game names overall, newest first.
    pub recent_games: Vec<String>,
}

impl StudioMetrics {
    /// Zeroed metrics for a studio (no releases in range).
    pub fn empty(studio: &Studio) -> Self {
        Self {
            studio_id: studio.id.clone(),
            catalog_index: 0,
            name: studio.name.clone(),
            country: studio.country.clone(),
            focus_genres: studio.focus_genres.clone(),
            tracking_status: studio.tracking_status,
            total_games: studio.total_games,
            average_rating: studio.average_rating,
            releases_in_range: 0,
            total_downloads_in_range: 0,
            average_rating_in_range: 0.0,
            releases: Vec::new(),
            last_release: studio.last_release_date(),
            recent_games: studio
                .recent_games(RECENT_GAMES)
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Returns true if at least one release fell inside the window.
    pub fn has_releases(&self) -> bool {
        self.releases_in_range > 0
    }
}

/// Fleet-wide rollup across all studios' windowed metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    /// Number of studios summarized.
    pub studio_count: usize,
    /// Number of studios with at least one release in range.
    pub studios_with_releases: usize,
    pub total_releases: usize,
    pub total_downloads: u64,
    pub active_studio_count: usize,
    /// Mean of per-studio windowed ratings, over studios with releases only.
    pub average_rating_across_studios: f64,
}

/// In-range release count for one genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreCount {
    pub genre: String,
    pub releases: usize,
}

/// A studio ranked by downloads in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopStudio {
    pub studio_id: String,
    pub name: String,
    pub downloads: u64,
    pub releases: usize,
}

/// Breakdowns shown under the fleet summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHighlights {
    /// Genres by release count, most frequent first.
    pub genres: Vec<GenreCount>,
    /// Studios with the most downloads in range.
    pub top_studios: Vec<TopStudio>,
}

/// Metadata about an analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Where the catalog was loaded from.
    pub catalog_source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Date window the metrics were computed for.
    pub window: DateWindow,
    /// Number of studios in the catalog.
    pub studios_tracked: usize,
    /// Name filter applied to the studio rows, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_filter: Option<String>,
    /// Status filter applied to the studio rows, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<TrackingStatus>,
}

/// The complete studio analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Summary over the whole catalog (not just the shown rows).
    pub summary: FleetSummary,
    /// Genre and top-studio breakdowns, also over the whole catalog.
    pub highlights: ReportHighlights,
    /// Studio rows after filtering and sorting.
    pub studios: Vec<StudioMetrics>,
}
