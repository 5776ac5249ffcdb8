//! Operator-supplied intelligence input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification level of the retrieved material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Unclassified,
    Confidential,
    Secret,
    TopSecret,
}

impl Classification {
    /// All levels, least to most sensitive.
    pub const ALL: [Self; 4] = [Self::Unclassified, Self::Confidential, Self::Secret, Self::TopSecret];

    /// Wire name (`TOP_SECRET` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unclassified => "UNCLASSIFIED",
            Self::Confidential => "CONFIDENTIAL",
            Self::Secret => "SECRET",
            Self::TopSecret => "TOP_SECRET",
        }
    }

    /// Title-case label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unclassified => "Unclassified",
            Self::Confidential => "Confidential",
            Self::Secret => "Secret",
            Self::TopSecret => "Top Secret",
        }
    }

    /// Next level, wrapping around.
    pub fn cycle_next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous level, wrapping around.
    pub fn cycle_prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::Unclassified
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "UNCLASSIFIED" => Ok(Self::Unclassified),
            "CONFIDENTIAL" => Ok(Self::Confidential),
            "SECRET" => Ok(Self::Secret),
            "TOP_SECRET" => Ok(Self::TopSecret),
            _ => Err(ValidationError::UnknownClassification(s.to_string())),
        }
    }
}

/// Input validation failures. Raised before anything reaches the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Source origin must not be empty")]
    EmptySource,

    #[error("Unknown classification level: {0}")]
    UnknownClassification(String),
}

/// Retrieved intelligence as submitted by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalData {
    /// Raw text content
    pub content: String,

    /// Where the content came from (e.g. "Internal Memo", "OSINT Feed")
    pub source: String,

    /// ISO-8601 submission time
    pub timestamp: String,

    /// Classification level
    pub classification: Classification,
}

impl RetrievalData {
    /// Validate the operator's input and stamp it with the current time.
    ///
    /// Content and source must be non-empty after trimming. The values are
    /// stored as given.
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        classification: Classification,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        let source = source.into();

        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        if source.trim().is_empty() {
            return Err(ValidationError::EmptySource);
        }

        Ok(Self { content, source, timestamp: super::now_iso8601(), classification })
    }
}
