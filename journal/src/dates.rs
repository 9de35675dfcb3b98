//! Date handling
//!
//! Trip dates are calendar dates persisted as ISO-8601 `YYYY-MM-DD` strings.
//! Display strings and day counts are derived from them here.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Source of the current local time, used to stamp notes
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Short display form, e.g. "Jun 15, 2024"
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Trip date range, e.g. "Jun 15, 2024 - Jun 22, 2024"
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_display_date(start), format_display_date(end))
}

/// Inclusive day count; 0 when either end is missing
pub fn count_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u32 {
    match (start, end) {
        (Some(start), Some(end)) => {
            let span = (end - start).num_days() + 1;
            u32::try_from(span.max(0)).unwrap_or(u32::MAX)
        }
        _ => 0,
    }
}

/// Note date stamp, e.g. "October 19, 2026"
pub fn format_note_date(at: NaiveDateTime) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Note time stamp, e.g. "3:05 PM"
pub fn format_note_time(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

/// Parse a stored date. Accepts plain dates and the full timestamps older
/// builds wrote (`2024-06-15T10:00:00.000Z`).
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc().date());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Serde adapter for `Option<NaiveDate>` fields stored as ISO strings
pub mod iso_date {
    use super::parse_stored_date;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_stored_date(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{}'", s))),
        }
    }
}
