//! Serde adapter for backend timestamps.
//!
//! The project service writes RFC 3339 strings, but rows created by older backends carry
//! naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` values; those are read as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

/// `savedAt` format of the content envelope: UTC, millisecond precision, `Z` suffix.
pub fn saved_at(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn naive_and_offset_timestamps_both_parse() {
        let naive = parse("2025-03-01T10:15:30.123456").unwrap();
        let offset = parse("2025-03-01T11:15:30.123456+01:00").unwrap();
        assert_eq!(naive, offset);
        assert!(parse("yesterday").is_err());
    }

    #[test]
    fn saved_at_matches_the_browser_iso_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 30).unwrap();
        assert_eq!(saved_at(&at), "2025-03-01T10:15:30.000Z");
    }
}
