//! Model-derived analysis of a retrieval.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest risk score the model may report.
pub const MAX_RISK_SCORE: u8 = 100;

/// Output of the analyze stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Risk score in `0..=100`
    pub risk_score: u8,

    /// Executive summary
    pub summary: String,

    /// Key terms extracted from the text
    pub keywords: Vec<String>,

    /// Organizations, people or locations identified
    pub detected_entities: Vec<String>,

    /// Applicable compliance frameworks (e.g. "NIST-800-53", "GDPR")
    pub compliance_tags: Vec<String>,
}

impl AnalysisResult {
    /// Band the risk score.
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

/// Coarse risk band used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
}

impl RiskLevel {
    /// `< 30` is low, `< 70` elevated, anything else high.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => Self::Low,
            30..=69 => Self::Elevated,
            _ => Self::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::Elevated => "ELEVATED",
            Self::High => "HIGH",
        })
    }
}
