//! Row filtering and sorting for the studio table.
//!
//! These helpers shape what gets displayed; they never feed back into the
//! fleet summary, which always covers the whole catalog.

use crate::models::{StudioMetrics, TrackingStatus};
use std::cmp::Ordering;

/// Column the studio table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Catalog order (no sorting)
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

/// Keep rows whose studio name contains `query`, ignoring case.
///
/// A blank query keeps every row.
pub fn filter_by_name(rows: Vec<StudioMetrics>, query: &str) -> Vec<StudioMetrics> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| row.name.to_lowercase().contains(&needle))
        .collect()
}

/// Keep rows with the given tracking status.
pub fn filter_by_status(rows: Vec<StudioMetrics>, status: TrackingStatus) -> Vec<StudioMetrics> {
    rows.into_iter()
        .filter(|row| row.tracking_status == status)
        .collect()
}

/// Sort rows in place.
///
/// `Catalog` orders by catalog position regardless of the rows' current
/// order. For every other column, ties keep catalog order in both
/// directions.
pub fn sort_rows(rows: &mut [StudioMetrics], column: SortColumn, descending: bool) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        let ordering = if descending {
            ordering.reverse()
        } else {
            ordering
        };
        ordering.then_with(|| a.catalog_index.cmp(&b.catalog_index))
    });
}

fn compare(a: &StudioMetrics, b: &StudioMetrics, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Catalog => a.catalog_index.cmp(&b.catalog_index),
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Country => a.country.cmp(&b.country),
        SortColumn::Releases => a.releases_in_range.cmp(&b.releases_in_range),
        SortColumn::Downloads => a.total_downloads_in_range.cmp(&b.total_downloads_in_range),
        SortColumn::Rating => a.average_rating_in_range.total_cmp(&b.average_rating_in_range),
        SortColumn::TotalGames => a.total_games.cmp(&b.total_games),
        SortColumn::OverallRating => a.average_rating.total_cmp(&b.average_rating),
    }
}
