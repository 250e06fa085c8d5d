use crate::model::PackageRecord;

/// Lowercases and drops hyphens, underscores and whitespace, so that
/// `My-Package`, `my_package` and `My Package` all compare equal.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A normalized package-name query.
#[derive(Debug, Clone)]
pub struct NameQuery {
    raw_lower: String,
    normalized: String,
}

impl NameQuery {
    pub fn new(query: &str) -> Self {
        Self {
            raw_lower: query.to_lowercase(),
            normalized: normalize(query),
        }
    }

    /// True when the display name or the last identifier segment equals the
    /// query after normalization, or the identifier contains the raw query.
    pub fn matches(&self, record: &PackageRecord) -> bool {
        normalize(&record.name) == self.normalized
            || normalize(record.short_name()) == self.normalized
            || record.identifier.to_lowercase().contains(&self.raw_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Repository;
    use chrono::Utc;

    fn record(identifier: &str, name: &str) -> PackageRecord {
        PackageRecord {
            identifier: identifier.to_string(),
            name: name.to_string(),
            description: String::new(),
            platform: String::new(),
            is_official: false,
            is_community: true,
            is_hostable: false,
            first_release_date: Utc::now(),
            repository: Repository {
                provider: "github".to_string(),
                url: String::new(),
            },
            versions: Vec::new(),
            file_added: None,
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("My-Package"), "mypackage");
        assert_eq!(normalize("MY_PACKAGE"), "mypackage");
        assert_eq!(normalize("My Package"), "mypackage");
        assert_eq!(normalize(" a-b_c\td "), "abcd");
    }

    #[test]
    fn test_matches_display_name_any_separator() {
        let rec = record("acme/something-else", "My Package");
        for q in ["My-Package", "mypackage", "MY_PACKAGE", "my package"] {
            assert!(NameQuery::new(q).matches(&rec), "query {q:?}");
        }
    }

    #[test]
    fn test_matches_last_identifier_segment() {
        let rec = record("acme/servers/weather_mcp", "Forecasts");
        assert!(NameQuery::new("Weather-MCP").matches(&rec));
        assert!(NameQuery::new("weathermcp").matches(&rec));
    }

    #[test]
    fn test_matches_identifier_substring() {
        let rec = record("acme/servers/weather_mcp", "Forecasts");
        assert!(NameQuery::new("ACME/servers").matches(&rec));
        // substring match uses the raw query, not the normalized one
        assert!(!NameQuery::new("acme servers").matches(&rec));
    }

    #[test]
    fn test_no_match() {
        let rec = record("acme/weather", "Weather");
        assert!(!NameQuery::new("github").matches(&rec));
    }

    #[test]
    fn test_empty_query_matches_via_substring() {
        let rec = record("acme/weather", "Weather");
        assert!(NameQuery::new("").matches(&rec));
    }
}
