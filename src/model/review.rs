use serde::{Deserialize, Serialize};

/// The five review dimensions, each on a 0-100 scale.
///
/// `vulnerability` is inverted: 0 means no known vulnerabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub supply_chain_security: f64,
    pub vulnerability: f64,
    pub quality: f64,
    // The data set spells this key "maintainabile".
    #[serde(rename = "maintainabile")]
    pub maintainability: f64,
    pub license: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl From<String> for Trend {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "increasing" => Trend::Increasing,
            "decreasing" => Trend::Decreasing,
            _ => Trend::Stable,
        }
    }
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Increasing => "↑",
            Trend::Decreasing => "↓",
            Trend::Stable => "→",
        }
    }
}

impl Default for Trend {
    fn default() -> Self {
        Trend::Stable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" | "MODERATE" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unknown
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvssV3 {
    pub version: String,
    pub vector_string: String,
    pub attack_vector: String,
    pub attack_complexity: String,
    pub privileges_required: String,
    pub user_interaction: String,
    pub scope: String,
    pub confidentiality_impact: String,
    pub integrity_impact: String,
    pub availability_impact: String,
    pub base_score: f64,
    pub base_severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMetricV3 {
    pub cvss_v3: CvssV3,
    #[serde(default)]
    pub exploitability_score: f64,
    #[serde(default)]
    pub impact_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
    #[serde(default)]
    pub is_ox_original: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_metric_v3: Option<BaseMetricV3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploitation_steps: Option<String>,
}

impl Vulnerability {
    pub fn base_score(&self) -> Option<f64> {
        self.base_metric_v3.as_ref().map(|m| m.cvss_v3.base_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReview {
    pub scores: Scores,
    #[serde(default)]
    pub is_malicious: bool,
    #[serde(default)]
    pub weekly_downloads: u64,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

impl SecurityReview {
    /// Vulnerabilities ordered from most to least severe, keeping source
    /// order within a severity.
    pub fn vulnerabilities_by_severity(&self) -> Vec<&Vulnerability> {
        let mut vulns: Vec<&Vulnerability> = self.vulnerabilities.iter().collect();
        vulns.sort_by_key(|v| v.severity);
        vulns
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.vulnerabilities
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}
