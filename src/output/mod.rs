mod cli;
mod html;
mod json;

pub use cli::{listing_table, package_table, stats_table};
pub use html::generate_html_string;
pub use json::to_json_string;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::listing::{DirectoryStats, PackageSummary};
use crate::model::{PackageRecord, Version};
use crate::score::overall_score;

/// Output format for listings, stats and package reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
    /// Self-contained HTML report (package reports only)
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'json', or 'html'",
                s
            )),
        }
    }
}

/// One package at one version, optionally with its README.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageReport<'a> {
    pub package: &'a PackageRecord,
    pub version: &'a Version,
    pub is_latest: bool,
    pub overall_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

impl<'a> PackageReport<'a> {
    /// Report for `version`, or for the latest version when `version` is
    /// `None` or unknown. `None` only for a record without versions.
    pub fn new(package: &'a PackageRecord, version: Option<&str>) -> Option<Self> {
        let version = package.select_version(version)?;
        Some(Self {
            package,
            version,
            is_latest: package.is_latest(&version.version),
            overall_score: version
                .security_review
                .as_ref()
                .map(|r| overall_score(&r.scores)),
            readme: None,
        })
    }

    pub fn with_readme(mut self, readme: Option<String>) -> Self {
        self.readme = readme;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport<'a> {
    #[serde(flatten)]
    pub stats: DirectoryStats,
    pub categories: &'a [String],
}

pub fn format_listing(summaries: &[&PackageSummary], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(listing_table(summaries)),
        OutputFormat::Json => to_json_string(&summaries),
        OutputFormat::Html => bail!("HTML output is only available for `show`"),
    }
}

pub fn format_stats(report: &StatsReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(stats_table(report)),
        OutputFormat::Json => to_json_string(report),
        OutputFormat::Html => bail!("HTML output is only available for `show`"),
    }
}

pub fn format_report(report: &PackageReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(package_table(report)),
        OutputFormat::Json => to_json_string(report),
        OutputFormat::Html => Ok(generate_html_string(report)),
    }
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_html_listing_is_rejected() {
        assert!(format_listing(&[], OutputFormat::Html).is_err());
        assert!(format_listing(&[], OutputFormat::Json).is_ok());
    }
}
