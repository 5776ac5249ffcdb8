//! The session controller.
//!
//! Holds the current snapshot and drives the stage transitions. Model calls
//! are handed out as pending values tagged with the generation they were
//! issued under; their outcomes are applied only if that generation is still
//! current, so a reply that lands after a reset or a newer call is dropped.

use std::sync::Arc;

use super::state::{SessionState, TransitionError, MISSING_ANALYSIS_MESSAGE};
use crate::ai::{AdapterError, IntelligenceClient};
use crate::domain::{AnalysisResult, RecordStamp, Recommendation, RetrievalData, Stage};

/// An analyze call that has been issued but not yet run.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    generation: u64,
    retrieval: RetrievalData,
}

impl PendingAnalysis {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The retrieval being analyzed.
    pub fn retrieval(&self) -> &RetrievalData {
        &self.retrieval
    }

    /// Run the call against the model.
    pub async fn run(self, client: &IntelligenceClient) -> AnalysisOutcome {
        let result = client.analyze(&self.retrieval).await;
        self.complete(result)
    }

    /// Settle the call with an already known result.
    pub fn complete(self, result: Result<AnalysisResult, AdapterError>) -> AnalysisOutcome {
        AnalysisOutcome { generation: self.generation, result }
    }
}

/// The settled result of a [`PendingAnalysis`].
#[derive(Debug)]
pub struct AnalysisOutcome {
    generation: u64,
    result: Result<AnalysisResult, AdapterError>,
}

/// An advice call that has been issued but not yet run.
#[derive(Debug, Clone)]
pub struct PendingAdvice {
    generation: u64,
    analysis: AnalysisResult,
}

impl PendingAdvice {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the call against the model.
    pub async fn run(self, client: &IntelligenceClient) -> AdviceOutcome {
        let result = client.generate_advice(&self.analysis).await;
        self.complete(result)
    }

    /// Settle the call with an already known result.
    pub fn complete(self, result: Result<Vec<Recommendation>, AdapterError>) -> AdviceOutcome {
        AdviceOutcome { generation: self.generation, result }
    }
}

/// The settled result of a [`PendingAdvice`].
#[derive(Debug)]
pub struct AdviceOutcome {
    generation: u64,
    result: Result<Vec<Recommendation>, AdapterError>,
}

/// Either kind of in-flight call.
#[derive(Debug, Clone)]
pub enum PendingCall {
    Analysis(PendingAnalysis),
    Advice(PendingAdvice),
}

impl PendingCall {
    pub async fn run(self, client: &IntelligenceClient) -> CallOutcome {
        match self {
            Self::Analysis(pending) => CallOutcome::Analysis(pending.run(client).await),
            Self::Advice(pending) => CallOutcome::Advice(pending.run(client).await),
        }
    }
}

impl From<PendingAnalysis> for PendingCall {
    fn from(pending: PendingAnalysis) -> Self {
        Self::Analysis(pending)
    }
}

impl From<PendingAdvice> for PendingCall {
    fn from(pending: PendingAdvice) -> Self {
        Self::Advice(pending)
    }
}

/// Either kind of settled call.
#[derive(Debug)]
pub enum CallOutcome {
    Analysis(AnalysisOutcome),
    Advice(AdviceOutcome),
}

/// What happened to an outcome handed back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The snapshot was updated
    Applied,
    /// The call no longer belongs to this session and was dropped
    Stale,
}

/// Why an unattended run stopped before the report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("{message}")]
    Failed { stage: Stage, message: String },
}

/// The single live session.
#[derive(Debug, Default)]
pub struct Session {
    state: Arc<SessionState>,
    generation: u64,
}

impl Session {
    /// Create a session in the initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// A shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    /// Generation of the most recently issued call (or reset).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store the retrieval, move to `Analyze` and issue the analyze call.
    pub fn submit_retrieval(
        &mut self,
        data: RetrievalData,
    ) -> Result<PendingAnalysis, TransitionError> {
        let next = self.state.begin_analysis(data)?;
        let retrieval = next.retrieval().clone();
        self.replace(next);

        Ok(PendingAnalysis { generation: self.issue(), retrieval })
    }

    /// Apply a settled analyze call.
    pub fn apply_analysis(&mut self, outcome: AnalysisOutcome) -> Resolution {
        if !self.is_current(outcome.generation) {
            tracing::warn!(generation = outcome.generation, "Dropping stale analysis result");
            return Resolution::Stale;
        }

        let next = self.state.resolve_analysis(outcome.result);
        self.replace(next);
        Resolution::Applied
    }

    /// Seal the analysis into a documentation record and move to `Document`.
    ///
    /// Without an analysis the snapshot is left untouched and
    /// [`TransitionError::MissingAnalysis`] is returned.
    pub fn confirm_analysis(&mut self) -> Result<(), TransitionError> {
        match self.state.confirm_analysis(RecordStamp::generate()) {
            Ok(next) => {
                self.replace(next);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis not confirmed");
                Err(e)
            }
        }
    }

    /// Move to `Advise` and issue the advice call.
    ///
    /// Without an analysis the stage is kept, the error banner is set and no
    /// call is issued.
    pub fn confirm_documentation(&mut self) -> Result<PendingAdvice, TransitionError> {
        let next = match self.state.begin_advice() {
            Ok(next) => next,
            Err(TransitionError::MissingAnalysis) => {
                tracing::warn!("Advice requested without an analysis");
                let failed = self.state.with_error(MISSING_ANALYSIS_MESSAGE);
                self.replace(failed);
                return Err(TransitionError::MissingAnalysis);
            }
            Err(e) => return Err(e),
        };

        let analysis = next.analysis().cloned().ok_or(TransitionError::MissingAnalysis)?;
        self.replace(next);

        Ok(PendingAdvice { generation: self.issue(), analysis })
    }

    /// Apply a settled advice call.
    pub fn apply_advice(&mut self, outcome: AdviceOutcome) -> Resolution {
        if !self.is_current(outcome.generation) {
            tracing::warn!(generation = outcome.generation, "Dropping stale advice result");
            return Resolution::Stale;
        }

        let next = self.state.resolve_advice(outcome.result);
        self.replace(next);
        Resolution::Applied
    }

    /// Apply either kind of settled call.
    pub fn apply(&mut self, outcome: CallOutcome) -> Resolution {
        match outcome {
            CallOutcome::Analysis(outcome) => self.apply_analysis(outcome),
            CallOutcome::Advice(outcome) => self.apply_advice(outcome),
        }
    }

    /// Move to `Report`.
    pub fn confirm_advice(&mut self) -> Result<(), TransitionError> {
        let next = self.state.confirm_advice()?;
        self.replace(next);
        Ok(())
    }

    /// Re-issue the call that failed at the current stage.
    pub fn retry(&mut self) -> Result<PendingCall, TransitionError> {
        let next = self.state.begin_retry()?;
        self.replace(next);

        let generation = self.issue();
        tracing::info!(stage = %self.state.stage(), generation, "Retrying model call");

        // Analyze retries have no analysis yet; Advise retries always do.
        Ok(match self.state.analysis() {
            None => PendingAnalysis { generation, retrieval: self.state.retrieval().clone() }.into(),
            Some(analysis) => PendingAdvice { generation, analysis: analysis.clone() }.into(),
        })
    }

    /// Drive a fresh session from retrieval to report without operator input.
    ///
    /// Stops at the first model failure; the snapshot is left where it failed.
    pub async fn run_to_report(
        &mut self,
        client: &IntelligenceClient,
        data: RetrievalData,
    ) -> Result<(), FlowError> {
        let pending = self.submit_retrieval(data)?;
        let outcome = pending.run(client).await;
        self.apply_analysis(outcome);
        self.ensure_no_error()?;
        self.confirm_analysis()?;

        let pending = self.confirm_documentation()?;
        let outcome = pending.run(client).await;
        self.apply_advice(outcome);
        self.ensure_no_error()?;
        self.confirm_advice()?;

        tracing::info!(advice = self.state.advice().len(), "Session reached report");
        Ok(())
    }

    fn ensure_no_error(&self) -> Result<(), FlowError> {
        match self.state.error() {
            Some(message) => {
                Err(FlowError::Failed { stage: self.state.stage(), message: message.to_string() })
            }
            None => Ok(()),
        }
    }

    /// Discard everything and start over.
    ///
    /// Calls still in flight become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = Arc::new(SessionState::default());
        tracing::debug!(generation = self.generation, "Session reset");
    }

    fn issue(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.state.is_processing()
    }

    fn replace(&mut self, next: SessionState) {
        tracing::debug!(
            stage = %next.stage(),
            processing = next.is_processing(),
            error = next.error().unwrap_or(""),
            "Session updated"
        );
        self.state = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, Priority, Stage};
    use crate::session::{ADVICE_FAILED_MESSAGE, ANALYSIS_FAILED_MESSAGE};

    fn retrieval() -> RetrievalData {
        RetrievalData::new("Employee flagged suspicious USB use", "Internal Memo", Classification::Confidential)
            .unwrap()
    }

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            risk_score: 72,
            summary: "Removable media used outside policy.".to_string(),
            keywords: vec!["usb".to_string(), "insider-threat".to_string()],
            detected_entities: vec![],
            compliance_tags: vec!["NIST-800-53".to_string()],
        }
    }

    fn recommendation() -> Recommendation {
        Recommendation {
            title: "Block USB storage".to_string(),
            description: "Apply device control.".to_string(),
            priority: Priority::High,
            framework_reference: Some("NIST SP 800-53 MP-7".to_string()),
        }
    }

    fn documented() -> Session {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();
        session.apply_analysis(pending.complete(Ok(analysis())));
        session.confirm_analysis().unwrap();
        session
    }

    #[test]
    fn test_submit_is_observable_before_resolution() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();

        assert_eq!(session.state().stage(), Stage::Analyze);
        assert!(session.state().is_processing());
        assert_eq!(pending.generation(), session.generation());
        assert_eq!(pending.retrieval().source, "Internal Memo");
    }

    #[test]
    fn test_analysis_success() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();

        assert_eq!(session.apply_analysis(pending.complete(Ok(analysis()))), Resolution::Applied);
        let state = session.state();
        assert_eq!(state.stage(), Stage::Analyze);
        assert!(!state.is_processing());
        assert_eq!(state.analysis(), Some(&analysis()));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_analysis_failure() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();

        session.apply_analysis(pending.complete(Err(AdapterError::EmptyResponse)));
        let state = session.state();
        assert_eq!(state.stage(), Stage::Analyze);
        assert!(!state.is_processing());
        assert!(state.analysis().is_none());
        assert_eq!(state.error(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    #[test]
    fn test_confirm_analysis_without_result_is_a_no_op() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();
        session.apply_analysis(pending.complete(Err(AdapterError::EmptyResponse)));

        let before = session.snapshot();
        assert_eq!(session.confirm_analysis(), Err(TransitionError::MissingAnalysis));
        assert_eq!(*session.state(), *before);
    }

    #[test]
    fn test_confirm_analysis_builds_record() {
        let session = documented();
        let state = session.state();
        let record = state.documentation().unwrap();

        assert_eq!(state.stage(), Stage::Document);
        assert!(!record.id().is_empty());
        assert!(record.hash().starts_with("SHA256-"));
        assert_eq!(record.structured_data().analysis.risk_score, 72);
        assert_eq!(record.structured_data().retrieval.source, "Internal Memo");
    }

    #[test]
    fn test_documentation_to_advice() {
        let mut session = documented();
        let pending = session.confirm_documentation().unwrap();
        assert_eq!(session.state().stage(), Stage::Advise);
        assert!(session.state().is_processing());

        session.apply_advice(pending.complete(Ok(vec![recommendation()])));
        assert!(!session.state().is_processing());
        assert_eq!(session.state().advice().len(), 1);

        session.confirm_advice().unwrap();
        assert_eq!(session.state().stage(), Stage::Report);
    }

    #[test]
    fn test_advice_failure_then_retry() {
        let mut session = documented();
        let pending = session.confirm_documentation().unwrap();
        session.apply_advice(pending.complete(Err(AdapterError::Api {
            status: 500,
            body: "internal".to_string(),
        })));
        assert_eq!(session.state().error(), Some(ADVICE_FAILED_MESSAGE));
        assert_eq!(session.state().stage(), Stage::Advise);

        let PendingCall::Advice(retry) = session.retry().unwrap() else {
            panic!("expected an advice retry");
        };
        assert!(session.state().is_processing());
        assert!(session.state().error().is_none());

        assert_eq!(session.apply_advice(retry.complete(Ok(vec![recommendation()]))), Resolution::Applied);
        assert_eq!(session.state().advice().len(), 1);
    }

    #[test]
    fn test_analysis_retry_reuses_retrieval() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();
        let first_generation = pending.generation();
        session.apply_analysis(pending.complete(Err(AdapterError::EmptyResponse)));

        let PendingCall::Analysis(retry) = session.retry().unwrap() else {
            panic!("expected an analysis retry");
        };
        assert!(retry.generation() > first_generation);
        assert_eq!(retry.retrieval(), session.state().retrieval());
    }

    #[test]
    fn test_reset_returns_initial_state() {
        let mut session = documented();
        session.reset();
        assert_eq!(*session.state(), SessionState::default());

        let mut fresh = Session::new();
        fresh.reset();
        assert_eq!(*fresh.state(), SessionState::default());
    }

    #[test]
    fn test_resolution_after_reset_is_stale() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();
        session.reset();

        assert_eq!(session.apply_analysis(pending.complete(Ok(analysis()))), Resolution::Stale);
        assert_eq!(*session.state(), SessionState::default());
    }

    #[test]
    fn test_resolution_after_reset_and_resubmit_is_stale() {
        let mut session = Session::new();
        let old = session.submit_retrieval(retrieval()).unwrap();
        session.reset();
        let new = session.submit_retrieval(retrieval()).unwrap();

        assert_eq!(session.apply_analysis(old.complete(Ok(analysis()))), Resolution::Stale);
        assert!(session.state().is_processing());
        assert_eq!(session.apply_analysis(new.complete(Ok(analysis()))), Resolution::Applied);
    }

    #[test]
    fn test_duplicate_resolution_is_stale() {
        let mut session = Session::new();
        let pending = session.submit_retrieval(retrieval()).unwrap();
        let copy = pending.clone();

        assert_eq!(session.apply_analysis(pending.complete(Ok(analysis()))), Resolution::Applied);
        assert_eq!(
            session.apply_analysis(copy.complete(Err(AdapterError::EmptyResponse))),
            Resolution::Stale
        );
        assert!(session.state().error().is_none());
    }

    #[test]
    fn test_confirm_documentation_without_analysis_sets_error() {
        let mut session = Session {
            state: Arc::new(SessionState::bare_at(Stage::Document)),
            generation: 3,
        };

        assert_eq!(session.confirm_documentation().unwrap_err(), TransitionError::MissingAnalysis);
        assert_eq!(session.state().stage(), Stage::Document);
        assert!(!session.state().is_processing());
        assert_eq!(session.state().error(), Some(MISSING_ANALYSIS_MESSAGE));
        assert_eq!(session.generation(), 3);
    }

    #[test]
    fn test_wrong_stage_leaves_session_untouched() {
        let mut session = Session::new();
        let before = session.snapshot();

        assert!(matches!(session.confirm_advice(), Err(TransitionError::WrongStage { .. })));
        assert!(matches!(session.retry(), Err(TransitionError::NothingToRetry(Stage::Retrieve))));
        assert_eq!(*session.state(), *before);
        assert_eq!(session.generation(), 0);
    }
}
