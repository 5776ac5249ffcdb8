//! Session snapshot and its pure transitions.
//!
//! Every transition takes `&self` and returns a whole new snapshot; nothing
//! here mutates in place or performs I/O.

use serde::Serialize;

use crate::ai::AdapterError;
use crate::domain::{
    AnalysisResult, DocumentationRecord, RecordStamp, Recommendation, RetrievalData, Stage,
};

/// Banner shown when the analyze call fails.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze content. Please verify API configuration.";

/// Banner shown when the advice call fails.
pub const ADVICE_FAILED_MESSAGE: &str = "Failed to generate advice.";

/// Banner shown when advice is requested without an analysis.
pub const MISSING_ANALYSIS_MESSAGE: &str = "No analysis data found.";

/// Why a transition was refused. The snapshot is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Cannot {action} at stage {actual} (expected {expected})")]
    WrongStage { action: &'static str, expected: Stage, actual: Stage },

    #[error("A model call is still in flight")]
    Busy,

    #[error("No analysis data found")]
    MissingAnalysis,

    #[error("Nothing to retry at stage {0}")]
    NothingToRetry(Stage),
}

/// The aggregate root of a session.
///
/// `SessionState::default()` is the initial state: stage `Retrieve`, empty
/// retrieval, nothing produced, not processing, no error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    stage: Stage,
    retrieval: RetrievalData,
    analysis: Option<AnalysisResult>,
    documentation: Option<DocumentationRecord>,
    advice: Vec<Recommendation>,
    processing: bool,
    error: Option<String>,
}

impl SessionState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn retrieval(&self) -> &RetrievalData {
        &self.retrieval
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn documentation(&self) -> Option<&DocumentationRecord> {
        self.documentation.as_ref()
    }

    pub fn advice(&self) -> &[Recommendation] {
        &self.advice
    }

    /// True while a model call is in flight.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Last user-facing error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// RETRIEVE → ANALYZE; the analyze call is now in flight.
    pub fn begin_analysis(&self, data: RetrievalData) -> Result<Self, TransitionError> {
        self.require_stage(Stage::Retrieve, "submit retrieval")?;

        Ok(Self {
            stage: Stage::Analyze,
            retrieval: data,
            processing: true,
            error: None,
            ..self.clone()
        })
    }

    /// Settle the analyze call. The stage stays `Analyze` either way.
    pub fn resolve_analysis(&self, result: Result<AnalysisResult, AdapterError>) -> Self {
        match result {
            Ok(analysis) => {
                Self { analysis: Some(analysis), processing: false, error: None, ..self.clone() }
            }
            Err(_) => Self {
                processing: false,
                error: Some(ANALYSIS_FAILED_MESSAGE.to_string()),
                ..self.clone()
            },
        }
    }

    /// ANALYZE → DOCUMENT, sealing a documentation record under `stamp`.
    pub fn confirm_analysis(&self, stamp: RecordStamp) -> Result<Self, TransitionError> {
        self.require_stage(Stage::Analyze, "confirm analysis")?;
        let analysis = self.analysis.as_ref().ok_or(TransitionError::MissingAnalysis)?;

        let record = DocumentationRecord::create(stamp, analysis, &self.retrieval);
        Ok(Self {
            stage: Stage::Document,
            documentation: Some(record),
            error: None,
            ..self.clone()
        })
    }

    /// DOCUMENT → ADVISE; the advice call is now in flight.
    pub fn begin_advice(&self) -> Result<Self, TransitionError> {
        self.require_stage(Stage::Document, "confirm documentation")?;
        if self.analysis.is_none() {
            return Err(TransitionError::MissingAnalysis);
        }

        Ok(Self { stage: Stage::Advise, processing: true, error: None, ..self.clone() })
    }

    /// Settle the advice call. The stage stays `Advise` either way.
    pub fn resolve_advice(&self, result: Result<Vec<Recommendation>, AdapterError>) -> Self {
        match result {
            Ok(advice) => Self { advice, processing: false, error: None, ..self.clone() },
            Err(_) => Self {
                processing: false,
                error: Some(ADVICE_FAILED_MESSAGE.to_string()),
                ..self.clone()
            },
        }
    }

    /// ADVISE → REPORT.
    pub fn confirm_advice(&self) -> Result<Self, TransitionError> {
        self.require_stage(Stage::Advise, "confirm advice")?;
        Ok(Self { stage: Stage::Report, error: None, ..self.clone() })
    }

    /// Re-issue the failed call of the current stage.
    ///
    /// Only valid after an adapter failure: `Analyze` without an analysis, or
    /// `Advise` with an analysis to advise on.
    pub fn begin_retry(&self) -> Result<Self, TransitionError> {
        if self.processing {
            return Err(TransitionError::Busy);
        }

        let retryable = self.error.is_some()
            && match self.stage {
                Stage::Analyze => self.analysis.is_none(),
                Stage::Advise => self.analysis.is_some(),
                _ => false,
            };
        if !retryable {
            return Err(TransitionError::NothingToRetry(self.stage));
        }

        Ok(Self { processing: true, error: None, ..self.clone() })
    }

    /// Same snapshot with the error banner replaced.
    pub(crate) fn with_error(&self, message: &str) -> Self {
        Self { error: Some(message.to_string()), ..self.clone() }
    }

    /// An otherwise empty snapshot sitting at `stage`.
    #[cfg(test)]
    pub(crate) fn bare_at(stage: Stage) -> Self {
        Self { stage, ..Self::default() }
    }

    fn require_stage(&self, expected: Stage, action: &'static str) -> Result<(), TransitionError> {
        if self.stage != expected {
            return Err(TransitionError::WrongStage { action, expected, actual: self.stage });
        }
        if self.processing {
            return Err(TransitionError::Busy);
        }
        Ok(())
    }
}
