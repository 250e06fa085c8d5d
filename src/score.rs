//! Overall security score and display bands.
//!
//! The overall score is a weighted average of the five review dimensions.
//! The vulnerability dimension is inverted (0 = no findings) so it is flipped
//! to `100 - vulnerability` before weighting, putting every term on the same
//! "higher is better" scale.
//!
//! ```
//! use mcp_directory::{score::overall_score, Scores};
//!
//! let scores = Scores {
//!     supply_chain_security: 90.0,
//!     vulnerability: 10.0,
//!     quality: 80.0,
//!     maintainability: 70.0,
//!     license: 100.0,
//! };
//! assert_eq!(overall_score(&scores), 86);
//! ```

use crate::model::{Scores, Severity};

const SUPPLY_CHAIN_WEIGHT: f64 = 0.25;
const VULNERABILITY_WEIGHT: f64 = 0.30;
const QUALITY_WEIGHT: f64 = 0.20;
const MAINTAINABILITY_WEIGHT: f64 = 0.15;
const LICENSE_WEIGHT: f64 = 0.10;

/// Weighted overall score, rounded half away from zero.
///
/// Inputs are not clamped; a producer emitting values outside 0-100 gets a
/// result outside 0-100.
pub fn overall_score(scores: &Scores) -> i64 {
    let inverted_vulnerability = 100.0 - scores.vulnerability;

    let weighted = scores.supply_chain_security * SUPPLY_CHAIN_WEIGHT
        + inverted_vulnerability * VULNERABILITY_WEIGHT
        + scores.quality * QUALITY_WEIGHT
        + scores.maintainability * MAINTAINABILITY_WEIGHT
        + scores.license * LICENSE_WEIGHT;

    weighted.round() as i64
}

/// Display band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
    Critical,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Good
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else if score >= 40.0 {
            ScoreBand::Poor
        } else {
            ScoreBand::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
            ScoreBand::Critical => "critical",
        }
    }

    pub fn text_class(&self) -> &'static str {
        match self {
            ScoreBand::Good => "text-green-600",
            ScoreBand::Fair => "text-yellow-600",
            ScoreBand::Poor => "text-orange-600",
            ScoreBand::Critical => "text-red-600",
        }
    }

    pub fn bar_class(&self) -> &'static str {
        match self {
            ScoreBand::Good => "bg-green-500",
            ScoreBand::Fair => "bg-yellow-500",
            ScoreBand::Poor => "bg-orange-500",
            ScoreBand::Critical => "bg-red-500",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            ScoreBand::Good => "bg-green-100 text-green-800",
            ScoreBand::Fair => "bg-yellow-100 text-yellow-800",
            ScoreBand::Poor => "bg-orange-100 text-orange-800",
            ScoreBand::Critical => "bg-red-100 text-red-800",
        }
    }

    /// Terminal rendering of a score in this band.
    pub fn ansi(&self, text: &str) -> String {
        let code = match self {
            ScoreBand::Good => "32",
            ScoreBand::Fair => "33",
            ScoreBand::Poor => "91",
            ScoreBand::Critical => "31",
        };
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "bg-red-100 text-red-800 border-red-300",
        Severity::High => "bg-orange-100 text-orange-800 border-orange-300",
        Severity::Medium => "bg-yellow-100 text-yellow-800 border-yellow-300",
        Severity::Low => "bg-blue-100 text-blue-800 border-blue-300",
        Severity::Unknown => "bg-gray-100 text-gray-800 border-gray-300",
    }
}
