//! Windowed release aggregation.
//!
//! This module filters each studio's release history by a date window and
//! derives per-studio and fleet-wide rollups. Everything here is a pure
//! function of its inputs.

use crate::analysis::DateWindow;
use crate::models::{
    FleetSummary, GenreCount, ReleaseEvent, ReportHighlights, Studio, StudioMetrics, TopStudio,
    TrackingStatus,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Timestamp layouts accepted besides plain dates and RFC 3339.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalize a stored release date to its calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the day is taken in the
/// timestamp's own offset) and naive `YYYY-MM-DD[T ]HH:MM:SS` timestamps.
/// Returns `None` for anything else.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Iterate over a studio's releases that fall inside the window.
///
/// Releases with malformed dates never match.
pub fn releases_in_window<'a>(
    studio: &'a Studio,
    window: &DateWindow,
) -> impl Iterator<Item = &'a ReleaseEvent> + 'a {
    let window = *window;
    studio
        .game_releases
        .iter()
        .filter(move |release| release.release_day().is_some_and(|day| window.contains(day)))
}

/// Compute windowed metrics for a single studio.
pub fn studio_metrics(studio: &Studio, window: &DateWindow) -> StudioMetrics {
    let mut metrics = StudioMetrics::empty(studio);

    let releases: Vec<ReleaseEvent> = releases_in_window(studio, window).cloned().collect();
    if releases.is_empty() {
        return metrics;
    }

    let rating_sum: f64 = releases.iter().map(|r| r.rating).sum();

    metrics.releases_in_range = releases.len();
    metrics.total_downloads_in_range = releases
        .iter()
        .map(|r| r.downloads)
        .fold(0, u64::saturating_add);
    metrics.average_rating_in_range = rating_sum / releases.len() as f64;
    metrics.releases = releases;

    metrics
}

/// Compute windowed metrics for every studio in the catalog.
///
/// Output order mirrors the catalog. If either window bound is missing,
/// every studio gets zeroed metrics rather than all-time figures.
/// Download totals saturate at `u64::MAX`.
pub fn compute_metrics(catalog: &[Studio], window: &DateWindow) -> Vec<StudioMetrics> {
    let set = window.is_set();

    catalog
        .iter()
        .enumerate()
        .map(|(index, studio)| {
            let mut metrics = if set {
                studio_metrics(studio, window)
            } else {
                StudioMetrics::empty(studio)
            };
            metrics.catalog_index = index;
            metrics
        })
        .collect()
}

/// Roll per-studio metrics up into a fleet summary.
///
/// Studios without releases in range are left out of the rating average.
pub fn compute_fleet_summary(metrics: &[StudioMetrics]) -> FleetSummary {
    let mut summary = FleetSummary {
        studio_count: metrics.len(),
        ..FleetSummary::default()
    };

    let mut rating_sum = 0.0;

    for studio in metrics {
        summary.total_releases += studio.releases_in_range;
        summary.total_downloads = summary
            .total_downloads
            .saturating_add(studio.total_downloads_in_range);

        if studio.tracking_status == TrackingStatus::Active {
            summary.active_studio_count += 1;
        }

        if studio.has_releases() {
            summary.studios_with_releases += 1;
            rating_sum += studio.average_rating_in_range;
        }
    }

    if summary.studios_with_releases > 0 {
        summary.average_rating_across_studios = rating_sum / summary.studios_with_releases as f64;
    }

    summary
}

/// Count in-range releases per genre.
pub fn genre_distribution(metrics: &[StudioMetrics]) -> HashMap<String, usize> {
    let mut dist: HashMap<String, usize> = HashMap::new();

    for release in metrics.iter().flat_map(|m| &m.releases) {
        *dist.entry(release.genre.clone()).or_default() += 1;
    }

    dist
}

/// The `n` studios with the most downloads in range.
///
/// Studios without releases in range are skipped.
pub fn top_by_downloads(metrics: &[StudioMetrics], n: usize) -> Vec<&StudioMetrics> {
    let mut ranked: Vec<&StudioMetrics> = metrics.iter().filter(|m| m.has_releases()).collect();

    ranked.sort_by_key(|m| std::cmp::Reverse(m.total_downloads_in_range));
    ranked.truncate(n);

    ranked
}

/// Genre counts and top studios for a set of metrics.
///
/// Genres are ordered by release count, then name.
pub fn report_highlights(metrics: &[StudioMetrics], top_n: usize) -> ReportHighlights {
    let mut genres: Vec<GenreCount> = genre_distribution(metrics)
        .into_iter()
        .map(|(genre, releases)| GenreCount { genre, releases })
        .collect();
    genres.sort_by(|a, b| b.releases.cmp(&a.releases).then_with(|| a.genre.cmp(&b.genre)));

    let top_studios = top_by_downloads(metrics, top_n)
        .into_iter()
        .map(|m| TopStudio {
            studio_id: m.studio_id.clone(),
            name: m.name.clone(),
            downloads: m.total_downloads_in_range,
            releases: m.releases_in_range,
        })
        .collect();

    ReportHighlights {
        genres,
        top_studios,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationSettings;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_release(date: &str, downloads: u64, rating: f64) -> ReleaseEvent {
        ReleaseEvent {
            game_name: format!("Game {}", date),
            release_date: date.to_string(),
            genre: "Merge".to_string(),
            rating,
            downloads,
        }
    }

    fn create_test_studio(id: &str, releases: Vec<ReleaseEvent>) -> Studio {
        Studio {
            id: id.to_string(),
            name: format!("Studio {}", id),
            country: "United States".to_string(),
            focus_genres: vec!["Casual".to_string(), "Merge".to_string()],
            tracking_status: TrackingStatus::Active,
            total_games: 12,
            average_rating: 4.5,
            game_releases: releases,
            website: None,
            notes: None,
            competitors: vec![],
            notification_settings: NotificationSettings::default(),
        }
    }

    fn happy_games() -> Studio {
        create_test_studio(
            "studio_1",
            vec![
                create_test_release("2024-03-15", 50000, 4.6),
                create_test_release("2024-02-28", 35000, 4.4),
                create_test_release("2024-01-05", 38000, 4.5),
            ],
        )
    }

    #[test]
    fn test_parse_release_date() {
        assert_eq!(parse_release_date("2024-03-15"), Some(day(2024, 3, 15)));
        assert_eq!(
            parse_release_date("2024-03-15T23:59:59Z"),
            Some(day(2024, 3, 15))
        );
        assert_eq!(
            parse_release_date("2024-03-15T23:30:00-05:00"),
            Some(day(2024, 3, 15))
        );
        assert_eq!(
            parse_release_date("2024-03-15 18:45:00"),
            Some(day(2024, 3, 15))
        );
        assert_eq!(
            parse_release_date("2024-03-15T18:45:00.250"),
            Some(day(2024, 3, 15))
        );
        assert_eq!(parse_release_date("next spring"), None);
        assert_eq!(parse_release_date("2024-02-30"), None);
        assert_eq!(parse_release_date(""), None);
    }

    #[test]
    fn test_window_metrics_scenario() {
        let catalog = vec![happy_games()];
        let window = DateWindow::between(day(2024, 2, 1), day(2024, 3, 31));

        let metrics = compute_metrics(&catalog, &window);

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].releases_in_range, 2);
        assert_eq!(metrics[0].total_downloads_in_range, 85000);
        assert!((metrics[0].average_rating_in_range - 4.5).abs() < 1e-9);
        assert_eq!(metrics[0].releases.len(), 2);
    }

    #[test]
    fn test_window_without_matches() {
        let catalog = vec![happy_games()];
        let window = DateWindow::between(day(2024, 4, 1), day(2024, 4, 30));

        let metrics = compute_metrics(&catalog, &window);

        assert_eq!(metrics[0].releases_in_range, 0);
        assert_eq!(metrics[0].total_downloads_in_range, 0);
        assert_eq!(metrics[0].average_rating_in_range, 0.0);
        assert!(!metrics[0].has_releases());
    }

    #[test]
    fn test_unset_and_partial_window_zero_everything() {
        let catalog = vec![happy_games(), create_test_studio("studio_2", vec![])];

        for window in [
            DateWindow::unset(),
            DateWindow::new(Some(day(2024, 1, 1)), None),
            DateWindow::new(None, Some(day(2024, 12, 31))),
        ] {
            let metrics = compute_metrics(&catalog, &window);
            assert_eq!(metrics.len(), 2);
            for m in &metrics {
                assert_eq!(m.releases_in_range, 0);
                assert_eq!(m.total_downloads_in_range, 0);
                assert_eq!(m.average_rating_in_range, 0.0);
            }
        }
    }

    #[test]
    fn test_boundary_inclusion() {
        let studio = create_test_studio(
            "edge",
            vec![
                create_test_release("2024-03-31", 10, 4.0),
                create_test_release("2024-03-31T23:59:59Z", 20, 4.0),
                create_test_release("2024-04-01", 40, 4.0),
                create_test_release("2024-02-01T00:00:00", 80, 4.0),
            ],
        );
        let window = DateWindow::between(day(2024, 2, 1), day(2024, 3, 31));

        let metrics = studio_metrics(&studio, &window);

        assert_eq!(metrics.releases_in_range, 3);
        assert_eq!(metrics.total_downloads_in_range, 110);
    }

    #[test]
    fn test_malformed_dates_never_match() {
        let studio = create_test_studio(
            "messy",
            vec![
                create_test_release("TBD", 1000, 5.0),
                create_test_release("2024-02-10", 500, 3.0),
            ],
        );
        let window = DateWindow::between(NaiveDate::MIN, NaiveDate::MAX);

        let metrics = studio_metrics(&studio, &window);

        assert_eq!(metrics.releases_in_range, 1);
        assert_eq!(metrics.total_downloads_in_range, 500);
        assert_eq!(metrics.average_rating_in_range, 3.0);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let catalog = vec![happy_games()];
        let window = DateWindow::between(day(2024, 3, 31), day(2024, 2, 1));

        let metrics = compute_metrics(&catalog, &window);

        assert_eq!(metrics[0].releases_in_range, 0);
    }

    #[test]
    fn test_count_bounded_by_release_history() {
        let studio = happy_games();
        let windows = [
            DateWindow::between(NaiveDate::MIN, NaiveDate::MAX),
            DateWindow::between(day(2024, 1, 5), day(2024, 1, 5)),
            DateWindow::unset(),
        ];

        for window in windows {
            let metrics = compute_metrics(std::slice::from_ref(&studio), &window);
            assert!(metrics[0].releases_in_range <= studio.game_releases.len());
        }
    }

    #[test]
    fn test_compute_metrics_is_pure_and_ordered() {
        let catalog = vec![
            create_test_studio("b", vec![create_test_release("2024-02-02", 5, 4.0)]),
            happy_games(),
            create_test_studio("a", vec![]),
        ];
        let snapshot = catalog.clone();
        let window = DateWindow::between(day(2024, 2, 1), day(2024, 3, 31));

        let first = compute_metrics(&catalog, &window);
        let second = compute_metrics(&catalog, &window);

        assert_eq!(first, second);
        assert_eq!(catalog, snapshot);
        let ids: Vec<_> = first.iter().map(|m| m.studio_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "studio_1", "a"]);
    }

    #[test]
    fn test_download_totals_saturate() {
        let huge = u64::MAX / 2 + 1;
        let catalog = vec![
            create_test_studio(
                "big",
                vec![
                    create_test_release("2024-02-10", huge, 4.0),
                    create_test_release("2024-02-11", huge, 4.0),
                ],
            ),
            create_test_studio("bigger", vec![create_test_release("2024-02-12", huge, 4.0)]),
        ];
        let window = DateWindow::between(day(2024, 2, 1), day(2024, 3, 31));

        let metrics = compute_metrics(&catalog, &window);
        assert_eq!(metrics[0].releases_in_range, 2);
        assert_eq!(metrics[0].total_downloads_in_range, u64::MAX);

        let summary = compute_fleet_summary(&metrics);
        assert_eq!(summary.total_releases, 3);
        assert_eq!(summary.total_downloads, u64::MAX);
    }

    #[test]
    fn test_catalog_index_follows_catalog() {
        let catalog = vec![
            create_test_studio("x", vec![]),
            create_test_studio("y", vec![]),
        ];

        for window in [
            DateWindow::unset(),
            DateWindow::between(day(2024, 1, 1), day(2024, 12, 31)),
        ] {
            let indexes: Vec<_> = compute_metrics(&catalog, &window)
                .iter()
                .map(|m| m.catalog_index)
                .collect();
            assert_eq!(indexes, vec![0, 1]);
        }
    }

    #[test]
    fn test_empty_catalog() {
        let window = DateWindow::between(day(2024, 1, 1), day(2024, 12, 31));
        assert!(compute_metrics(&[], &window).is_empty());
        assert_eq!(compute_fleet_summary(&[]), FleetSummary::default());
    }

    #[test]
    fn test_fleet_summary_skips_studios_without_releases() {
        let quiet = StudioMetrics::empty(&create_test_studio("quiet", vec![]));
        let mut busy = StudioMetrics::empty(&create_test_studio("busy", vec![]));
        busy.releases_in_range = 3;
        busy.total_downloads_in_range = 120000;
        busy.average_rating_in_range = 4.2;

        let summary = compute_fleet_summary(&[quiet, busy]);

        assert_eq!(summary.total_releases, 3);
        assert_eq!(summary.total_downloads, 120000);
        assert_eq!(summary.studio_count, 2);
        assert_eq!(summary.studios_with_releases, 1);
        assert!((summary.average_rating_across_studios - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_fleet_summary_counts_active_studios() {
        let mut paused = create_test_studio("paused", vec![]);
        paused.tracking_status = TrackingStatus::Paused;
        let catalog = vec![happy_games(), paused];

        let metrics = compute_metrics(&catalog, &DateWindow::unset());
        let summary = compute_fleet_summary(&metrics);

        assert_eq!(summary.active_studio_count, 1);
        assert_eq!(summary.average_rating_across_studios, 0.0);
    }

    #[test]
    fn test_genre_distribution_and_top_by_downloads() {
        let mut rpg = create_test_release("2024-02-10", 90000, 4.8);
        rpg.genre = "RPG".to_string();
        let catalog = vec![
            happy_games(),
            create_test_studio("pixel", vec![rpg]),
            create_test_studio("idle", vec![]),
        ];
        let window = DateWindow::between(day(2024, 2, 1), day(2024, 3, 31));
        let metrics = compute_metrics(&catalog, &window);

        let genres = genre_distribution(&metrics);
        assert_eq!(genres.get("Merge"), Some(&2));
        assert_eq!(genres.get("RPG"), Some(&1));

        let top = top_by_downloads(&metrics, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].studio_id, "pixel");
        assert_eq!(top[1].studio_id, "studio_1");

        let highlights = report_highlights(&metrics, 1);
        assert_eq!(highlights.genres[0].genre, "Merge");
        assert_eq!(highlights.genres[0].releases, 2);
        assert_eq!(highlights.genres[1].genre, "RPG");
        assert_eq!(highlights.top_studios.len(), 1);
        assert_eq!(highlights.top_studios[0].downloads, 90000);
    }
}
