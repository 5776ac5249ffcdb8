//! Advisory recommendations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority of a recommendation, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One advisory action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,

    pub description: String,

    pub priority: Priority,

    /// Named framework or control, e.g. "NIST SP 800-53 AC-2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_reference: Option<String>,
}

impl Recommendation {
    /// Framework reference or `N/A`.
    pub fn reference_or_na(&self) -> &str {
        self.framework_reference.as_deref().filter(|r| !r.trim().is_empty()).unwrap_or("N/A")
    }
}
