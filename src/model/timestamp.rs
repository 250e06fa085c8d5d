//! Lenient timestamp parsing for record dates.
//!
//! Record producers are not consistent about date formats, so every date
//! field goes through [`parse`], which accepts RFC 3339, naive date-times
//! (read as UTC) and plain calendar dates (midnight UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse("2024-03-10T08:15:30Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 10));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (8, 15, 30));
    }

    #[test]
    fn test_parse_rfc3339_with_millis_and_offset() {
        let dt = parse("2024-03-10T08:15:30.123+02:00").unwrap();
        assert_eq!(dt.hour(), 6);
    }

    #[test]
    fn test_parse_naive_datetime() {
        let dt = parse("2024-03-10T08:15:30").unwrap();
        assert_eq!(dt.minute(), 15);
    }

    #[test]
    fn test_parse_plain_date() {
        let dt = parse("2024-03-10").unwrap();
        assert_eq!((dt.day(), dt.hour()), (10, 0));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("last tuesday").is_none());
        assert!(parse("").is_none());
        assert!(parse("2024-13-40").is_none());
    }
}
