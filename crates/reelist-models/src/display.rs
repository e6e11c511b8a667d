//! Text formatting shared by every view of a movie.

use chrono::{Datelike, NaiveDate};

/// Rating with one decimal, e.g. `8.8`.
pub fn format_rating(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}

/// Release year or `N/A`.
pub fn year_label(release_date: Option<NaiveDate>) -> String {
    release_date
        .map(|d| d.year().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Dollar amount in millions, e.g. `$160.0M`.
pub fn format_money(amount: u64) -> String {
    format!("${:.1}M", amount as f64 / 1_000_000.0)
}
