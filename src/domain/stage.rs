//! The five ordered phases of a session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A session stage.
///
/// Stages are totally ordered: `Retrieve < Analyze < Document < Advise < Report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Operator supplies the raw intelligence
    Retrieve,
    /// The model scores and summarizes it
    Analyze,
    /// An immutable record is produced
    Document,
    /// The model proposes recommendations
    Advise,
    /// Final report
    Report,
}

impl Stage {
    /// All stages in order.
    pub const ALL: [Self; 5] =
        [Self::Retrieve, Self::Analyze, Self::Document, Self::Advise, Self::Report];

    /// Zero-based position of the stage.
    pub fn index(self) -> usize {
        match self {
            Self::Retrieve => 0,
            Self::Analyze => 1,
            Self::Document => 2,
            Self::Advise => 3,
            Self::Report => 4,
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Retrieve => "Retrieve",
            Self::Analyze => "Analyze",
            Self::Document => "Document",
            Self::Advise => "Advise",
            Self::Report => "Report",
        }
    }

    /// Letter shown in the stepper (spells R-A-D-A-R).
    pub fn letter(self) -> char {
        match self {
            Self::Retrieve | Self::Report => 'R',
            Self::Analyze | Self::Advise => 'A',
            Self::Document => 'D',
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Retrieve
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Retrieve => "RETRIEVE",
            Self::Analyze => "ANALYZE",
            Self::Document => "DOCUMENT",
            Self::Advise => "ADVISE",
            Self::Report => "REPORT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Retrieve < Stage::Analyze);
        assert!(Stage::Analyze < Stage::Document);
        assert!(Stage::Document < Stage::Advise);
        assert!(Stage::Advise < Stage::Report);
    }

    #[test]
    fn test_stage_next_walks_forward_by_one() {
        let mut stage = Stage::Retrieve;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert_eq!(next.index(), stage.index() + 1);
            stage = next;
            visited.push(stage);
        }
        assert_eq!(visited, Stage::ALL);
        assert_eq!(Stage::Report.next(), None);
    }

    #[test]
    fn test_stage_letters_spell_radar() {
        let word: String = Stage::ALL.iter().map(|s| s.letter()).collect();
        assert_eq!(word, "RADAR");
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Document).unwrap(), "\"DOCUMENT\"");
        assert_eq!(Stage::Advise.to_string(), "ADVISE");
    }
}
