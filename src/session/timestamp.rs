//! ISO-8601 timestamp encoding shared by every stored record
//!
//! Record timestamps are written with millisecond precision and a `Z`
//! suffix (`2026-10-18T09:30:00.123Z`), the format browsers produce, so
//! stored documents stay interchangeable with the web front end. Log entry
//! timestamps additionally drop the sub-second part entirely.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Format `dt` as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC-3339 timestamp into UTC
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Drop the sub-second part so the encoded form always ends in `.000Z`
pub fn normalize_log_time(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.trunc_subsecs(0)
}

pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_millis(dt))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {}", raw)))
}

/// Serde adapter for log entry timestamps (seconds precision, `.000Z`)
pub mod log_time {
    use super::*;

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize(&normalize_log_time(*dt), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        super::deserialize(deserializer).map(normalize_log_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_millis_uses_z_suffix() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(format_millis(&dt), "2026-10-18T09:30:00.123Z");
    }

    #[test]
    fn test_normalize_log_time_zeroes_millis() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 5).unwrap()
            + chrono::Duration::milliseconds(987);
        assert_eq!(
            format_millis(&normalize_log_time(dt)),
            "2026-10-18T09:30:05.000Z"
        );
    }

    #[test]
    fn test_parse_accepts_offsets() {
        let dt = parse("2026-10-18T18:30:00.000+09:00").unwrap();
        assert_eq!(format_millis(&dt), "2026-10-18T09:30:00.000Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_none());
    }
}
