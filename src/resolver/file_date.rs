use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

static FRAGMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}").ok());

/// Extracts the "file added" timestamp embedded in a record filename.
///
/// Filenames look like `weather-mcp_2024-05-01T12-30-00-000Z.json`. The first
/// `YYYY-MM-DDTHH-MM-SS` fragment has the dashes in its time part turned into
/// colons and is read as UTC. Fractional seconds after the fragment are
/// ignored.
pub fn parse_file_date(file_name: &str) -> Option<DateTime<Utc>> {
    let fragment = find_fragment(file_name)?;
    let iso = format!(
        "{}T{}:{}:{}",
        &fragment[..10],
        &fragment[11..13],
        &fragment[14..16],
        &fragment[17..19]
    );
    NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn find_fragment(s: &str) -> Option<&str> {
    FRAGMENT.as_ref()?.find(s).map(|m| m.as_str())
}
