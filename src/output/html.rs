//! HTML report output format.
//!
//! Generates a self-contained HTML page for one package: metadata, overall
//! score, per-dimension bars, vulnerabilities, versions and the rendered
//! README.

use super::PackageReport;
use crate::markdown::{escape as html_escape, MarkdownRenderer};
use crate::model::{Scores, SecurityReview, Trend};
use crate::score::{severity_class, ScoreBand};

/// Generate the package report as a string
pub fn generate_html_string(report: &PackageReport<'_>) -> String {
    let record = report.package;
    let version = report.version;

    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} {} - MCP Directory</title>
    <style>
{}    </style>
</head>
<body>
    <div class="container">
        <header>
            <div>
                <h1>{}</h1>
                <div class="muted">{}</div>
            </div>
            <span class="version-tag">v{}{}</span>
        </header>
"#,
        html_escape(&record.name),
        html_escape(&version.version),
        STYLESHEET,
        html_escape(&record.name),
        html_escape(&record.identifier),
        html_escape(&version.version),
        if report.is_latest { " (latest)" } else { "" },
    ));

    if !record.description.is_empty() {
        html.push_str(&format!(
            "        <p class=\"description\">{}</p>\n",
            html_escape(&record.description)
        ));
    }

    // Metadata facts
    html.push_str(&format!(
        r#"        <section class="facts">
            <div class="fact"><span class="muted">Author</span> {}</div>
            <div class="fact"><span class="muted">Platform</span> {}</div>
            <div class="fact"><span class="muted">License</span> {}</div>
            <div class="fact"><span class="muted">Released</span> {}</div>
            <div class="fact"><span class="muted">Repository</span> <a href="{}" target="_blank" rel="noopener noreferrer">{}</a></div>
        </section>
"#,
        html_escape(record.author()),
        html_escape(&record.platform),
        html_escape(&version.license),
        version.release_date.format("%Y-%m-%d"),
        html_escape(&record.repository.url),
        html_escape(&record.repository.url),
    ));

    match &version.security_review {
        Some(review) => push_review(&mut html, review, report.overall_score),
        None => html.push_str(
            r#"        <section>
            <div class="empty">No security review for this version</div>
        </section>
"#,
        ),
    }

    push_versions(&mut html, report);

    if let Some(readme) = &report.readme {
        html.push_str(&format!(
            r#"        <section>
            <h2>README</h2>
            <div class="readme-content text-base">
{}
            </div>
        </section>
"#,
            MarkdownRenderer::styled().render(readme)
        ));
    }

    html.push_str(
        r#"        <footer>
            Generated by mcp-directory
        </footer>
    </div>
</body>
</html>
"#,
    );

    html
}

fn push_review(html: &mut String, review: &SecurityReview, overall: Option<i64>) {
    let overall = overall.unwrap_or(0);
    let band = ScoreBand::from_score(overall as f64);

    html.push_str(&format!(
        r#"        <div class="stats">
            <div class="stat-card">
                <div class="stat-value {}">{}</div>
                <div class="stat-label">Security Score</div>
            </div>
            <div class="stat-card">
                <div class="stat-value">{}</div>
                <div class="stat-label">Vulnerabilities</div>
            </div>
            <div class="stat-card">
                <div class="stat-value">{} <span class="trend trend-{}">{}</span></div>
                <div class="stat-label">Weekly Downloads</div>
            </div>
        </div>
"#,
        band.text_class(),
        overall,
        review.vulnerabilities.len(),
        review.weekly_downloads,
        review.trend.as_str(),
        trend_label(review.trend),
    ));

    if review.is_malicious {
        html.push_str(&format!(
            r#"        <div class="badge {}">Flagged as malicious</div>
"#,
            ScoreBand::Critical.badge_class()
        ));
    }

    push_score_bars(html, &review.scores);

    html.push_str(
        r#"        <section>
            <h2>Vulnerabilities</h2>
"#,
    );

    if review.vulnerabilities.is_empty() {
        html.push_str(
            r#"            <div class="empty">No vulnerabilities found</div>
"#,
        );
    } else {
        html.push_str("            <ul class=\"vulns\">\n");
        for vuln in review.vulnerabilities_by_severity() {
            let mut details = String::new();
            if !vuln.category.is_empty() {
                details.push_str(&format!(" &middot; {}", html_escape(&vuln.category)));
            }
            if let Some(cwe) = &vuln.cwe {
                details.push_str(&format!(" &middot; {}", html_escape(cwe)));
            }
            if let Some(score) = vuln.base_score() {
                details.push_str(&format!(" &middot; CVSS {:.1}", score));
            }

            html.push_str(&format!(
                r#"                <li class="vuln">
                    <span class="severity {}">{}</span>
                    <strong>{}</strong><span class="muted">{}</span>
                    <p>{}</p>
"#,
                severity_class(vuln.severity),
                vuln.severity,
                html_escape(&vuln.id),
                details,
                html_escape(&vuln.description),
            ));

            if let Some(location) = &vuln.location {
                html.push_str(&format!(
                    "                    <div class=\"muted\">{}:{}</div>\n",
                    html_escape(&location.file),
                    location.line
                ));
                if !location.snippet.is_empty() {
                    html.push_str(&format!(
                        "                    <pre><code>{}</code></pre>\n",
                        html_escape(&location.snippet)
                    ));
                }
            }
            if let Some(steps) = &vuln.exploitation_steps {
                html.push_str(&format!(
                    "                    <p class=\"muted\">Exploitation: {}</p>\n",
                    html_escape(steps)
                ));
            }

            html.push_str("                </li>\n");
        }
        html.push_str("            </ul>\n");
    }

    html.push_str("        </section>\n");
}

fn push_score_bars(html: &mut String, scores: &Scores) {
    let dimensions = [
        ("Supply Chain Security", scores.supply_chain_security, scores.supply_chain_security),
        // inverted dimension: shown as-is, banded on 100 - value
        ("Vulnerability", scores.vulnerability, 100.0 - scores.vulnerability),
        ("Quality", scores.quality, scores.quality),
        ("Maintainability", scores.maintainability, scores.maintainability),
        ("License", scores.license, scores.license),
    ];

    html.push_str(
        r#"        <section>
            <h2>Security Scores</h2>
"#,
    );

    for (label, shown, banded) in dimensions {
        let band = ScoreBand::from_score(banded);
        html.push_str(&format!(
            r#"            <div class="score-row">
                <span class="score-label">{}</span>
                <div class="bar"><div class="bar-fill {}" style="width: {}%"></div></div>
                <span class="{}">{}</span>
            </div>
"#,
            label,
            band.bar_class(),
            banded.clamp(0.0, 100.0),
            band.text_class(),
            shown,
        ));
    }

    html.push_str("        </section>\n");
}

fn push_versions(html: &mut String, report: &PackageReport<'_>) {
    html.push_str(
        r#"        <section>
            <h2>Versions</h2>
            <table>
                <thead>
                    <tr>
                        <th>Version</th>
                        <th>License</th>
                        <th>Released</th>
                        <th>Vulnerabilities</th>
                    </tr>
                </thead>
                <tbody>
"#,
    );

    for version in &report.package.versions {
        let selected = if version.version == report.version.version {
            " class=\"selected\""
        } else {
            ""
        };
        html.push_str(&format!(
            r#"                    <tr{}>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                    </tr>
"#,
            selected,
            html_escape(&version.version),
            html_escape(&version.license),
            version.release_date.format("%Y-%m-%d"),
            version.vulnerability_count(),
        ));
    }

    html.push_str(
        r#"                </tbody>
            </table>
        </section>
"#,
    );
}

fn trend_label(trend: Trend) -> String {
    format!("{} {}", trend.arrow(), trend.as_str())
}

const STYLESHEET: &str = r#"        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #1f2937; background: #f9fafb; line-height: 1.6; padding: 2rem; }
        .container { max-width: 1000px; margin: 0 auto; }
        header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem; padding-bottom: 1rem; border-bottom: 1px solid #e5e7eb; }
        h1 { font-size: 1.75rem; font-weight: 600; }
        h2 { font-size: 1.25rem; margin-bottom: 1rem; padding-bottom: 0.5rem; border-bottom: 1px solid #e5e7eb; }
        section { margin-bottom: 2rem; }
        a { color: #2563eb; }
        .muted { color: #6b7280; font-size: 0.9rem; }
        .description { margin-bottom: 1.5rem; }
        .version-tag { background: #e5e7eb; border-radius: 4px; padding: 0.25rem 0.5rem; font-family: monospace; }
        .facts { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 0.5rem; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
        .stat-card { background: white; padding: 1.25rem; border-radius: 8px; border: 1px solid #e5e7eb; }
        .stat-value { font-size: 2rem; font-weight: 700; }
        .stat-label { color: #6b7280; font-size: 0.85rem; }
        .trend { font-size: 0.9rem; font-weight: 500; }
        .trend-increasing { color: #16a34a; }
        .trend-decreasing { color: #dc2626; }
        .trend-stable { color: #6b7280; }
        .badge { display: inline-block; padding: 0.25rem 0.75rem; border-radius: 9999px; font-weight: 600; margin-bottom: 1.5rem; }
        .score-row { display: flex; align-items: center; gap: 1rem; margin-bottom: 0.5rem; }
        .score-label { width: 12rem; }
        .bar { flex: 1; height: 0.5rem; background: #e5e7eb; border-radius: 9999px; overflow: hidden; }
        .bar-fill { height: 100%; }
        .vulns { list-style: none; }
        .vuln { background: white; border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 0.75rem; }
        .severity { padding: 0.125rem 0.5rem; border: 1px solid; border-radius: 4px; font-size: 0.75rem; font-weight: 600; margin-right: 0.5rem; }
        table { width: 100%; border-collapse: collapse; background: white; }
        th, td { padding: 0.5rem 1rem; text-align: left; border-bottom: 1px solid #e5e7eb; }
        tr.selected { background: #eff6ff; }
        pre { background: #f3f4f6; padding: 0.75rem; border-radius: 6px; overflow-x: auto; margin: 0.5rem 0; }
        .empty { text-align: center; padding: 2rem; color: #6b7280; }
        .readme-content h1, .readme-content h2, .readme-content h3, .readme-content h4 { margin: 1rem 0 0.5rem; border: none; }
        .readme-content p, .readme-content ul, .readme-content blockquote { margin-bottom: 0.75rem; }
        .readme-content ul { padding-left: 1.5rem; }
        .readme-content blockquote { border-left: 4px solid #d1d5db; padding-left: 1rem; color: #4b5563; }
        .readme-content code { background: #f3f4f6; padding: 0.1rem 0.3rem; border-radius: 4px; font-family: monospace; }
        .readme-content pre code { padding: 0; }
        .text-green-600 { color: #16a34a; } .text-yellow-600 { color: #ca8a04; }
        .text-orange-600 { color: #ea580c; } .text-red-600 { color: #dc2626; }
        .bg-green-500 { background: #22c55e; } .bg-yellow-500 { background: #eab308; }
        .bg-orange-500 { background: #f97316; } .bg-red-500 { background: #ef4444; }
        .bg-red-100 { background: #fee2e2; } .text-red-800 { color: #991b1b; }
        .bg-orange-100 { background: #ffedd5; } .text-orange-800 { color: #9a3412; }
        .bg-yellow-100 { background: #fef9c3; } .text-yellow-800 { color: #854d0e; }
        .bg-blue-100 { background: #dbeafe; } .text-blue-800 { color: #1e40af; }
        .bg-gray-100 { background: #f3f4f6; } .text-gray-800 { color: #1f2937; }
        footer { text-align: center; color: #6b7280; font-size: 0.8rem; margin-top: 2rem; padding-top: 1rem; border-top: 1px solid #e5e7eb; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PackageRecord;

    fn record() -> PackageRecord {
        serde_json::from_str(
            r#"{
                "identifier": "acme/weather",
                "name": "Weather <Beta>",
                "description": "Forecasts & alerts",
                "platform": "npm",
                "isCommunity": true,
                "firstReleaseDate": "2024-01-01",
                "repository": { "provider": "github", "url": "https://github.com/acme/weather" },
                "versions": [
                    {
                        "version": "1.1.0",
                        "license": "MIT",
                        "releaseDate": "2024-05-01",
                        "securityReview": {
                            "scores": { "supplyChainSecurity": 90, "vulnerability": 10, "quality": 80, "maintainabile": 70, "license": 100 },
                            "isMalicious": true,
                            "weeklyDownloads": 321,
                            "trend": "increasing",
                            "vulnerabilities": [
                                { "id": "OX-1", "severity": "LOW", "description": "uses <eval>" },
                                { "id": "OX-2", "severity": "CRITICAL", "description": "shell injection" }
                            ]
                        }
                    },
                    { "version": "1.0.0", "license": "MIT", "releaseDate": "2024-01-01" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_report_escapes_page_text() {
        let record = record();
        let html = generate_html_string(&PackageReport::new(&record, None).unwrap());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Weather &lt;Beta&gt;</h1>"));
        assert!(html.contains("Forecasts &amp; alerts"));
        assert!(html.contains("uses &lt;eval&gt;"));
        assert!(!html.contains("<Beta>"));
    }

    #[test]
    fn test_report_scores_and_badges() {
        let record = record();
        let html = generate_html_string(&PackageReport::new(&record, None).unwrap());

        assert!(html.contains(r#"<div class="stat-value text-green-600">86</div>"#));
        assert!(html.contains(
            r#"<div class="badge bg-red-100 text-red-800">Flagged as malicious</div>"#
        ));
        assert!(html.contains("trend-increasing"));
        // critical first
        let critical = html.find("OX-2").unwrap();
        let low = html.find("OX-1").unwrap();
        assert!(critical < low);
    }

    #[test]
    fn test_report_escapes_link_attributes() {
        let mut record = record();
        record.repository.url = r#"https://github.com/acme/weather"onclick="x"#.to_string();
        let html = generate_html_string(&PackageReport::new(&record, None).unwrap());

        assert!(html.contains(r#"href="https://github.com/acme/weather&quot;onclick=&quot;x""#));
        assert!(!html.contains(r#""onclick="#));
    }

    #[test]
    fn test_report_for_unreviewed_version() {
        let record = record();
        let report = PackageReport::new(&record, Some("1.0.0")).unwrap();
        assert!(!report.is_latest);

        let html = generate_html_string(&report);
        assert!(html.contains("No security review for this version"));
        assert!(html.contains("<tr class=\"selected\">\n                        <td>1.0.0</td>"));
    }

    #[test]
    fn test_report_embeds_styled_readme() {
        let record = record();
        let report = PackageReport::new(&record, None)
            .unwrap()
            .with_readme(Some("# Weather\n\nUse **it**.".to_string()));
        let html = generate_html_string(&report);

        assert!(html.contains(r#"<div class="readme-content text-base">"#));
        assert!(html.contains("<strong"));
        assert!(html.contains("<h1 class="));
    }
}
