//! Markdown and JSON report generation.
//!
//! This module renders studio analytics reports from the computed
//! metrics and fleet summary.

use crate::config::ReportConfig;
use crate::models::{FleetSummary, Report, ReportHighlights, ReportMetadata, StudioMetrics};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Studio Analytics Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata, report.studios.len()));
    output.push_str(&generate_summary_section(&report.summary, &report.highlights));
    output.push_str(&generate_studio_table(&report.studios, options.max_genres));

    if options.include_releases {
        output.push_str(&generate_releases_section(&report.studios));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, rows_shown: usize) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Catalog:** {}\n", metadata.catalog_source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Date Range:** {}\n", metadata.window));
    section.push_str(&format!(
        "- **Studios Tracked:** {}\n",
        metadata.studios_tracked
    ));
    if let Some(ref filter) = metadata.name_filter {
        section.push_str(&format!("- **Name Filter:** `{}`\n", filter));
    }
    if let Some(status) = metadata.status_filter {
        section.push_str(&format!("- **Status Filter:** {}\n", status));
    }
    if rows_shown != metadata.studios_tracked {
        section.push_str(&format!("- **Studios Shown:** {}\n", rows_shown));
    }
    section.push('\n');

    if !metadata.window.is_set() {
        section.push_str(
            "> **Note:** no complete date range is selected, so all windowed figures are zero. \
             Choose a range to see release metrics.\n\n",
        );
    }

    section
}

/// Generate the fleet summary section.
fn generate_summary_section(summary: &FleetSummary, highlights: &ReportHighlights) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Releases | Total Downloads | Active Studios | Avg Rating |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        summary.total_releases,
        format_thousands(summary.total_downloads),
        summary.active_studio_count,
        format_rating(summary.average_rating_across_studios, summary.studios_with_releases)
    ));
    section.push_str(
        "*Releases, downloads and rating cover the selected range across all tracked studios.*\n\n",
    );

    // Genre breakdown
    if !highlights.genres.is_empty() {
        section.push_str("### Releases by Genre\n\n");
        section.push_str("| Genre | Releases |\n");
        section.push_str("|:---|:---:|\n");

        for entry in &highlights.genres {
            section.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&entry.genre),
                entry.releases
            ));
        }
        section.push('\n');
    }

    // Top studios
    if !highlights.top_studios.is_empty() {
        section.push_str("### Top Studios by Downloads\n\n");
        section.push_str("| Studio | Downloads | Releases |\n");
        section.push_str("|:---|:---:|:---:|\n");

        for studio in &highlights.top_studios {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&studio.name),
                format_thousands(studio.downloads),
                studio.releases
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the studio table.
fn generate_studio_table(studios: &[StudioMetrics], max_genres: usize) -> String {
    let mut section = String::new();

    section.push_str("## Studios\n\n");

    if studios.is_empty() {
        section.push_str("No results found for the selected date range.\n\n");
        return section;
    }

    section.push_str(
        "| Studio | Status | Country | Focus Genres | Releases | Downloads | Avg Rating | Total Games | Overall Rating | Last Release |\n",
    );
    section.push_str("|:---|:---|:---|:---|:---:|:---:|:---:|:---:|:---:|:---:|\n");

    for studio in studios {
        section.push_str(&format!(
            "| {} | {} {} | {} | {} | {} | {} | {} | {} | {:.1} | {} |\n",
            escape_cell(&studio.name),
            studio.tracking_status.emoji(),
            studio.tracking_status,
            escape_cell(&studio.country),
            format_genres(&studio.focus_genres, max_genres),
            studio.releases_in_range,
            format_thousands(studio.total_downloads_in_range),
            format_rating(studio.average_rating_in_range, studio.releases_in_range),
            studio.total_games,
            studio.average_rating,
            studio
                .last_release
                .map(|day| day.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-studio listing of in-range releases.
fn generate_releases_section(studios: &[StudioMetrics]) -> String {
    let with_releases: Vec<_> = studios.iter().filter(|s| s.has_releases()).collect();
    if with_releases.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Releases in Range\n\n");

    for studio in with_releases {
        section.push_str(&format!("### {}\n\n", studio.name));
        section.push_str("| Game | Released | Genre | Rating | Downloads |\n");
        section.push_str("|:---|:---:|:---|:---:|:---:|\n");

        for release in &studio.releases {
            section.push_str(&format!(
                "| {} | {} | {} | {:.1} | {} |\n",
                escape_cell(&release.game_name),
                release
                    .release_day()
                    .map(|day| day.to_string())
                    .unwrap_or_else(|| escape_cell(&release.release_date)),
                escape_cell(&release.genre),
                release.rating,
                format_thousands(release.downloads)
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by StudioTrack v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Format a windowed rating, or `N/A` when nothing was released in range.
fn format_rating(rating: f64, releases: usize) -> String {
    if releases > 0 {
        format!("{:.1}", rating)
    } else {
        "N/A".to_string()
    }
}

/// Show the first `max` genres and collapse the rest into `+N`.
fn format_genres(genres: &[String], max: usize) -> String {
    if genres.is_empty() {
        return "-".to_string();
    }

    let mut shown: Vec<String> = genres.iter().take(max).map(|g| escape_cell(g)).collect();
    if genres.len() > max {
        shown.push(format!("+{}", genres.len() - max));
    }
    shown.join(", ")
}

/// Make text safe inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Group digits in thousands: `85000` becomes `85,000`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
