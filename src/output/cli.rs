use std::fmt::Write;

use tabled::{settings::Style, Table, Tabled};

use super::{truncate, PackageReport, StatsReport};
use crate::listing::PackageSummary;
use crate::model::Severity;
use crate::score::ScoreBand;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Vulns")]
    vulnerabilities: usize,
    #[tabled(rename = "Weekly")]
    weekly: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Dimension")]
    dimension: &'static str,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Band")]
    band: &'static str,
}

#[derive(Tabled)]
struct VulnRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "CWE")]
    cwe: String,
    #[tabled(rename = "CVSS")]
    cvss: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "License")]
    license: String,
    #[tabled(rename = "Released")]
    released: String,
    #[tabled(rename = "Vulns")]
    vulnerabilities: usize,
    #[tabled(rename = "Score")]
    score: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Added")]
    window: &'static str,
    #[tabled(rename = "Packages")]
    count: usize,
}

pub fn listing_table(summaries: &[&PackageSummary]) -> String {
    if summaries.is_empty() {
        return "No packages found.\n".to_string();
    }

    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            name: truncate(&s.display_name, 35),
            author: truncate(&s.author, 25),
            category: s.category.clone(),
            score: s
                .security_score
                .map(|score| ScoreBand::from_score(score as f64).ansi(&score.to_string()))
                .unwrap_or_else(|| "-".to_string()),
            vulnerabilities: s.vulnerabilities,
            weekly: format_count(s.weekly_downloads),
            updated: s.updated.clone(),
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Found {} packages:", summaries.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    out
}

pub fn stats_table(report: &StatsReport<'_>) -> String {
    let stats = &report.stats;
    let rows = vec![
        StatRow { window: "Total", count: stats.total },
        StatRow { window: "Last 24 hours", count: stats.daily },
        StatRow { window: "Last 7 days", count: stats.weekly },
        StatRow { window: "Last 30 days", count: stats.monthly },
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    if !report.categories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Categories: {}", report.categories.join(", "));
    }
    out
}

pub fn package_table(report: &PackageReport<'_>) -> String {
    let record = report.package;
    let version = report.version;
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{} ({})", record.name, record.identifier);
    if !record.description.is_empty() {
        let _ = writeln!(out, "{}", record.description);
    }
    let _ = writeln!(out);

    let latest = if report.is_latest { " (latest)" } else { "" };
    let _ = writeln!(out, "  Version:     {}{}", version.version, latest);
    let _ = writeln!(out, "  Released:    {}", version.release_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "  License:     {}", or_dash(&version.license));
    let _ = writeln!(out, "  Author:      {}", record.author());
    let _ = writeln!(out, "  Platform:    {}", or_dash(&record.platform));
    let _ = writeln!(out, "  Repository:  {}", record.repository.url);
    let _ = writeln!(out, "  Flags:       {}", flags(report));

    let review = match &version.security_review {
        Some(review) => review,
        None => {
            let _ = writeln!(out);
            let _ = writeln!(out, "No security review for this version.");
            push_versions(&mut out, report);
            push_readme(&mut out, report);
            return out;
        }
    };

    let _ = writeln!(
        out,
        "  Downloads:   {}/week {}",
        format_count(review.weekly_downloads),
        review.trend.arrow()
    );
    if let Some(score) = report.overall_score {
        let band = ScoreBand::from_score(score as f64);
        let _ = writeln!(out, "  Score:       {}/100", band.ansi(&score.to_string()));
    }
    if review.is_malicious {
        let _ = writeln!(out);
        let _ = writeln!(out, "\x1b[31mWARNING: this package is flagged as malicious\x1b[0m");
    }

    let scores = &review.scores;
    let dimensions = [
        ("Supply chain security", scores.supply_chain_security, scores.supply_chain_security),
        // lower is better; banded on the inverted value
        ("Vulnerability", scores.vulnerability, 100.0 - scores.vulnerability),
        ("Quality", scores.quality, scores.quality),
        ("Maintainability", scores.maintainability, scores.maintainability),
        ("License", scores.license, scores.license),
    ];
    let rows: Vec<ScoreRow> = dimensions
        .iter()
        .map(|&(dimension, shown, banded)| ScoreRow {
            dimension,
            score: format!("{}", shown),
            band: ScoreBand::from_score(banded).label(),
        })
        .collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));

    if review.vulnerabilities.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No known vulnerabilities.");
    } else {
        let rows: Vec<VulnRow> = review
            .vulnerabilities_by_severity()
            .into_iter()
            .map(|v| VulnRow {
                severity: format_severity(v.severity),
                id: v.id.clone(),
                category: or_dash(&v.category).to_string(),
                cwe: v.cwe.clone().unwrap_or_else(|| "-".to_string()),
                cvss: v
                    .base_score()
                    .map(|s| format!("{:.1}", s))
                    .unwrap_or_else(|| "-".to_string()),
                description: truncate(&v.description, 50),
            })
            .collect();

        let _ = writeln!(out);
        let _ = writeln!(out, "Found {} vulnerabilities:", review.vulnerabilities.len());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    }

    push_versions(&mut out, report);
    push_readme(&mut out, report);
    out
}

fn push_versions(out: &mut String, report: &PackageReport<'_>) {
    let rows: Vec<VersionRow> = report
        .package
        .versions
        .iter()
        .map(|v| VersionRow {
            version: v.version.clone(),
            license: or_dash(&v.license).to_string(),
            released: v.release_date.format("%Y-%m-%d").to_string(),
            vulnerabilities: v.vulnerability_count(),
            score: v
                .security_review
                .as_ref()
                .map(|r| crate::score::overall_score(&r.scores).to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "Versions:");
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
}

fn push_readme(out: &mut String, report: &PackageReport<'_>) {
    if let Some(readme) = &report.readme {
        let _ = writeln!(out);
        let _ = writeln!(out, "README:");
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", readme.trim_end());
    }
}

fn flags(report: &PackageReport<'_>) -> String {
    let record = report.package;
    let mut flags = Vec::new();
    if record.is_official {
        flags.push("official");
    }
    if record.is_community {
        flags.push("community");
    }
    if record.is_hostable {
        flags.push("hostable");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(", ")
    }
}

fn format_severity(severity: Severity) -> String {
    match severity {
        Severity::Critical => "\x1b[31mCRITICAL\x1b[0m".to_string(),
        Severity::High => "\x1b[91mHIGH\x1b[0m".to_string(),
        Severity::Medium => "\x1b[33mMEDIUM\x1b[0m".to_string(),
        Severity::Low => "\x1b[32mLOW\x1b[0m".to_string(),
        Severity::Unknown => "UNKNOWN".to_string(),
    }
}

/// 1234 -> "1.2k", 2_500_000 -> "2.5M"
fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
