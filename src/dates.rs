//! Publication date formatting for edition cards.
//!
//! The backend sends dates in whichever form its storage produced: a plain
//! ISO date, an RFC 3339 timestamp, or SQLite's `YYYY-MM-DD HH:MM:SS`.
//! Cards show the Mexican Spanish long form (`15 de marzo de 2024`).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Parse a backend date into a calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Long-form Spanish date, or the input unchanged when it does not parse.
pub fn format_long_es(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}
