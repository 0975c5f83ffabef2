//! Display formatting for dashboard values.

use crate::{CalendarDate, Timestamp};
use chrono::NaiveDate;

/// Placeholder rendered for absent dates.
pub const MISSING: &str = "-";

/// Whole-dollar currency with thousands separators, e.g. `$2,500,000`.
pub fn format_currency(amount: u64) -> String {
    format!("${}", group_thousands(amount))
}

/// Integer with thousands separators, e.g. `12,450`.
pub fn format_count(value: u64) -> String {
    group_thousands(value)
}

/// Short month date, e.g. `Jan 10, 2025`.
pub fn format_date(date: CalendarDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_optional_date(date: Option<CalendarDate>) -> String {
    date.map_or_else(|| MISSING.to_string(), format_date)
}

/// Format an ISO `YYYY-MM-DD` string; anything unparseable (including the
/// `-` placeholder) is returned unchanged.
pub fn format_date_text(text: &str) -> String {
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => format_date(date),
        Err(_) => text.to_string(),
    }
}

/// Short month date with 12-hour time, e.g. `Feb 10, 2025, 09:30 AM`.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Percentage with no decimals, clamped to `0..=100`.
pub fn format_percent(ratio: f64) -> String {
    let pct = (ratio * 100.0).round().clamp(0.0, 100.0);
    format!("{pct:.0}%")
}

fn group_thousands(value: u64) -> String {
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
