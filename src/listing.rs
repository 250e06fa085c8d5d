//! Directory listing: per-package summaries, search, sorting and
//! headline statistics.
//!
//! Summaries are derived from the latest version of each record. Records
//! without a security review still list, with zero downloads and no score.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::PackageRecord;
use crate::score::overall_score;

/// One row of the package listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    /// 1-based position in the loaded record list.
    pub id: usize,
    /// Last identifier segment, used in package URLs.
    pub name: String,
    pub display_name: String,
    pub author: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub weekly_downloads: u64,
    pub total_downloads: u64,
    pub updated: String,
    pub vulnerabilities: usize,
    pub security_score: Option<i64>,
    pub is_official: bool,
    pub is_community: bool,
}

impl PackageSummary {
    pub fn from_record(index: usize, record: &PackageRecord, now: DateTime<Utc>) -> Self {
        let latest = record.latest_version();
        let review = latest.and_then(|v| v.security_review.as_ref());

        let category = if record.is_official {
            "Official"
        } else if record.is_community {
            "Community"
        } else {
            "Other Servers"
        };

        let kind = if record.is_official { "official" } else { "community" };
        let released = latest
            .map(|v| v.release_date)
            .unwrap_or(record.first_release_date);
        let weekly = latest.map(|v| v.weekly_downloads()).unwrap_or(0);

        Self {
            id: index + 1,
            name: record.short_name().to_string(),
            display_name: record.name.clone(),
            author: record.author().to_string(),
            description: record.description.clone(),
            tags: vec![record.platform.clone(), kind.to_string()],
            category: category.to_string(),
            weekly_downloads: weekly,
            total_downloads: weekly.saturating_mul(52),
            updated: updated_text(released, now),
            vulnerabilities: latest.map(|v| v.vulnerability_count()).unwrap_or(0),
            security_score: review.map(|r| overall_score(&r.scores)),
            is_official: record.is_official,
            is_community: record.is_community,
        }
    }

    /// Case-insensitive substring match over the searchable fields.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.display_name.to_lowercase().contains(&query)
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.author.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

/// Summaries for every record, most downloaded first.
pub fn summarize(records: &[PackageRecord], now: DateTime<Utc>) -> Vec<PackageSummary> {
    let mut summaries: Vec<PackageSummary> = records
        .iter()
        .enumerate()
        .map(|(i, record)| PackageSummary::from_record(i, record, now))
        .collect();
    SortOrder::Popular.sort(&mut summaries);
    summaries
}

/// Filters summaries by a free-text query. An empty query keeps everything.
pub fn search<'a>(summaries: &'a [PackageSummary], query: &str) -> Vec<&'a PackageSummary> {
    summaries
        .iter()
        .filter(|s| query.is_empty() || s.matches(query))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Weekly downloads, descending.
    #[default]
    Popular,
    /// Keep the incoming order.
    Recent,
    /// Security score, descending; unscored packages count as 0.
    Security,
    /// Vulnerability count, descending.
    Vulnerabilities,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "popular" => Ok(SortOrder::Popular),
            "recent" => Ok(SortOrder::Recent),
            "security" => Ok(SortOrder::Security),
            "vulnerabilities" | "vulns" => Ok(SortOrder::Vulnerabilities),
            _ => Err(format!(
                "Unknown sort order: {}. Use 'popular', 'recent', 'security', or 'vulnerabilities'",
                s
            )),
        }
    }
}

impl SortOrder {
    /// Stable sort in place.
    pub fn sort<S: std::borrow::Borrow<PackageSummary>>(&self, summaries: &mut [S]) {
        match self {
            SortOrder::Popular => {
                summaries.sort_by(|a, b| b.borrow().weekly_downloads.cmp(&a.borrow().weekly_downloads))
            }
            SortOrder::Recent => {}
            SortOrder::Security => summaries.sort_by(|a, b| {
                let a = a.borrow().security_score.unwrap_or(0);
                let b = b.borrow().security_score.unwrap_or(0);
                b.cmp(&a)
            }),
            SortOrder::Vulnerabilities => {
                summaries.sort_by(|a, b| b.borrow().vulnerabilities.cmp(&a.borrow().vulnerabilities))
            }
        }
    }
}

/// "today", "yesterday" or "N days ago". Future dates read as "today".
pub fn updated_text(released: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - released).num_days() {
        d if d <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d => format!("{} days ago", d),
    }
}

/// Headline counts for the directory landing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    pub total: usize,
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
}

impl DirectoryStats {
    /// Counts records added within the last 1, 7 and 30 days, using the
    /// filename timestamp and falling back to the first release date.
    pub fn compute(records: &[PackageRecord], now: DateTime<Utc>) -> Self {
        let added_since = |days: i64| {
            let cutoff = now - Duration::days(days);
            records.iter().filter(|r| r.added_at() >= cutoff).count()
        };

        Self {
            total: records.len(),
            daily: added_since(1),
            weekly: added_since(7),
            monthly: added_since(30),
        }
    }
}

/// Keyword category derived from a package's display name.
pub fn name_category(name: &str) -> &'static str {
    let name = name.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| name.contains(w));

    if has(&["database", "mongo", "sql"]) {
        "Databases"
    } else if has(&["gitlab", "github"]) {
        "Version Control"
    } else if has(&["pdf", "excel", "reader"]) {
        "Document Processing"
    } else if has(&["earth", "data"]) {
        "Data Sources"
    } else if has(&["inspector", "toolkit"]) {
        "Development Tools"
    } else {
        "Other Servers"
    }
}

/// Unique categories across all records, in first-seen order.
pub fn categories(records: &[PackageRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut add = |category: &str| {
        if !category.is_empty() && !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    };

    for record in records {
        if record.is_official {
            add("Official");
        }
        if record.is_community {
            add("Community");
        }
        add(&record.platform);
        add(name_category(&record.name));
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Repository, Scores, SecurityReview, Trend, Version, Vulnerability};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn review(weekly: u64, vulns: usize, scores: Scores) -> SecurityReview {
        SecurityReview {
            scores,
            is_malicious: false,
            weekly_downloads: weekly,
            trend: Trend::Stable,
            vulnerabilities: (0..vulns)
                .map(|i| Vulnerability {
                    id: format!("V-{i}"),
                    description: String::new(),
                    severity: Default::default(),
                    category: String::new(),
                    cwe: None,
                    is_ox_original: false,
                    base_metric_v3: None,
                    location: None,
                    exploitation_steps: None,
                })
                .collect(),
        }
    }

    fn scores(supply: f64) -> Scores {
        Scores {
            supply_chain_security: supply,
            vulnerability: 0.0,
            quality: 100.0,
            maintainability: 100.0,
            license: 100.0,
        }
    }

    fn record(identifier: &str, name: &str, review: Option<SecurityReview>) -> PackageRecord {
        PackageRecord {
            identifier: identifier.to_string(),
            name: name.to_string(),
            description: format!("{name} server"),
            platform: "npm".to_string(),
            is_official: false,
            is_community: true,
            is_hostable: false,
            first_release_date: now() - Duration::days(100),
            repository: Repository {
                provider: "github".to_string(),
                url: format!("https://github.com/{identifier}"),
            },
            versions: vec![Version {
                version: "1.0.0".to_string(),
                license: "MIT".to_string(),
                release_date: now() - Duration::days(3),
                security_review: review,
            }],
            file_added: None,
        }
    }

    #[test]
    fn test_summary_from_record() {
        let mut rec = record("acme/weather-mcp", "Weather", Some(review(500, 2, scores(100.0))));
        rec.is_official = true;

        let summary = PackageSummary::from_record(0, &rec, now());
        assert_eq!(summary.id, 1);
        assert_eq!(summary.name, "weather-mcp");
        assert_eq!(summary.author, "acme");
        assert_eq!(summary.category, "Official");
        assert_eq!(summary.tags, vec!["npm".to_string(), "official".to_string()]);
        assert_eq!(summary.weekly_downloads, 500);
        assert_eq!(summary.total_downloads, 26_000);
        assert_eq!(summary.vulnerabilities, 2);
        assert_eq!(summary.security_score, Some(100));
        assert_eq!(summary.updated, "3 days ago");
    }

    #[test]
    fn test_total_downloads_saturate() {
        let rec = record("acme/huge", "Huge", Some(review(u64::MAX, 0, scores(100.0))));
        let summary = PackageSummary::from_record(0, &rec, now());
        assert_eq!(summary.weekly_downloads, u64::MAX);
        assert_eq!(summary.total_downloads, u64::MAX);
    }

    #[test]
    fn test_summary_without_review() {
        let summary = PackageSummary::from_record(4, &record("acme/bare", "Bare", None), now());
        assert_eq!(summary.id, 5);
        assert_eq!(summary.weekly_downloads, 0);
        assert_eq!(summary.vulnerabilities, 0);
        assert_eq!(summary.security_score, None);
        assert_eq!(summary.category, "Community");
    }

    #[test]
    fn test_summarize_sorts_by_popularity() {
        let records = vec![
            record("a/low", "Low", Some(review(10, 0, scores(50.0)))),
            record("a/high", "High", Some(review(900, 0, scores(50.0)))),
            record("a/none", "None", None),
        ];
        let names: Vec<String> = summarize(&records, now()).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["high", "low", "none"]);
    }

    #[test]
    fn test_search_fields() {
        let records = vec![
            record("acme/weather-mcp", "Weather", None),
            record("globex/pdf-reader", "PDF Reader", None),
        ];
        let summaries = summarize(&records, now());

        assert_eq!(search(&summaries, "GLOBEX").len(), 1);
        assert_eq!(search(&summaries, "weather server").len(), 1);
        assert_eq!(search(&summaries, "npm").len(), 2);
        assert_eq!(search(&summaries, "").len(), 2);
        assert!(search(&summaries, "kubernetes").is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let records = vec![
            record("a/one", "One", Some(review(1, 3, scores(0.0)))),
            record("a/two", "Two", None),
            record("a/three", "Three", Some(review(2, 1, scores(100.0)))),
        ];
        let base: Vec<PackageSummary> = records
            .iter()
            .enumerate()
            .map(|(i, r)| PackageSummary::from_record(i, r, now()))
            .collect();

        let order = |sort: SortOrder| {
            let mut s = base.clone();
            sort.sort(&mut s);
            s.into_iter().map(|s| s.name).collect::<Vec<_>>()
        };

        assert_eq!(order(SortOrder::Recent), vec!["one", "two", "three"]);
        assert_eq!(order(SortOrder::Security), vec!["three", "one", "two"]);
        assert_eq!(order(SortOrder::Vulnerabilities), vec!["one", "three", "two"]);
        assert_eq!(order(SortOrder::Popular), vec!["three", "one", "two"]);
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("Security".parse::<SortOrder>(), Ok(SortOrder::Security));
        assert_eq!("vulns".parse::<SortOrder>(), Ok(SortOrder::Vulnerabilities));
        assert!("stars".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_updated_text() {
        assert_eq!(updated_text(now(), now()), "today");
        assert_eq!(updated_text(now() - Duration::hours(23), now()), "today");
        assert_eq!(updated_text(now() - Duration::hours(25), now()), "yesterday");
        assert_eq!(updated_text(now() - Duration::days(12), now()), "12 days ago");
        assert_eq!(updated_text(now() + Duration::days(2), now()), "today");
    }

    #[test]
    fn test_stats_use_file_date_then_first_release() {
        let mut today = record("a/today", "Today", None);
        today.file_added = Some(now() - Duration::hours(2));
        let mut this_week = record("a/week", "Week", None);
        this_week.file_added = Some(now() - Duration::days(5));
        let mut this_month = record("a/month", "Month", None);
        this_month.file_added = Some(now() - Duration::days(20));
        // no file date: first release was 100 days ago
        let old = record("a/old", "Old", None);

        let stats = DirectoryStats::compute(&[today, this_week, this_month, old], now());
        assert_eq!(
            stats,
            DirectoryStats {
                total: 4,
                daily: 1,
                weekly: 2,
                monthly: 3
            }
        );
    }

    #[test]
    fn test_name_category() {
        assert_eq!(name_category("MongoDB Server"), "Databases");
        assert_eq!(name_category("GitHub MCP"), "Version Control");
        assert_eq!(name_category("PDF Reader"), "Document Processing");
        assert_eq!(name_category("Google Earth Engine"), "Data Sources");
        assert_eq!(name_category("MCP Inspector"), "Development Tools");
        assert_eq!(name_category("Weather"), "Other Servers");
    }

    #[test]
    fn test_categories_unique_in_first_seen_order() {
        let mut official = record("a/github", "GitHub", None);
        official.is_official = true;
        official.is_community = false;
        let records = vec![
            official,
            record("a/sql", "SQL Helper", None),
            record("a/sql2", "Another SQL", None),
        ];

        assert_eq!(
            categories(&records),
            vec!["Official", "npm", "Version Control", "Community", "Databases"]
        );
    }
}
