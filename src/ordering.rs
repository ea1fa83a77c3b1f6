// ⏰ Ordering Stage - oldest receipt first
//
// Records without a readable timestamp sort before everything else and keep
// their relative input order. The sort is stable, so equal timestamps also
// keep input order and re-sorting sorted output is a no-op.

use crate::record::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive layouts tried after RFC 3339. Interpreted as UTC.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a timestamp string into an instant
///
/// Supports RFC 3339 (`2024-01-15T14:23:00-05:00`), naive date-times
/// (`2024-01-15T14:23:00`, `2024-01-15 14:23:00`) and plain dates
/// (`2024-01-15`, taken as midnight UTC).
pub fn parse_occurred_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Sort key for a record; `None` (unreadable) orders before any instant
pub fn sort_key(record: &Record) -> Option<DateTime<Utc>> {
    record.occurred_at().and_then(parse_occurred_at)
}

/// Stable sort by `occurredAt`, ascending
pub fn order(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by_cached_key(sort_key);
    records
}
