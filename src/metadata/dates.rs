//! Lenient date parsing shared by the frontmatter and filename sources.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses the date forms authors commonly write.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM[:SS]` and bare
/// `YYYY-MM-DD` (midnight UTC). Anything else yields `None`.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    ymd_to_utc(text)
}

/// Midnight UTC on a `YYYY-MM-DD` date.
pub fn ymd_to_utc(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
