//! Timestamp helpers. Everything persisted is ISO-8601 in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Current instant as RFC 3339 with microseconds and a `+00:00` offset.
pub fn now_iso() -> String {
    to_iso(&Utc::now())
}

pub fn to_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Today's calendar date in UTC, `YYYY-MM-DD`.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a stored timestamp leniently.
///
/// Accepts RFC 3339 (`Z` or explicit offset), zone-less date-times with `T` or a
/// space separator (read as UTC), and bare dates (midnight UTC). Anything else,
/// including blank input, is `None`.
pub fn parse_iso_utc(value: &str) -> Option<DateTime<Utc>> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.with_timezone(&Utc));
    }
    // RFC 3339 insists on `T`; tolerate the space form SQLite's datetime() emits.
    if let Ok(dt) = DateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
