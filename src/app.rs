//! Application state and lifecycle management.
//!
//! This module contains the `App` struct that owns the live session, the
//! retrieval form and the channel model calls report back on.

use tokio::sync::mpsc;

use crate::ai::IntelligenceClient;
use crate::core::Config;
use crate::domain::{Classification, RetrievalData, Stage};
use crate::report::Report;
use crate::session::{CallOutcome, PendingCall, Resolution, Session, TransitionError};
use crate::tui::Theme;

/// Main application state.
///
/// The `App` struct is the central state container for the TUI. It manages:
/// - The session and its in-flight model calls
/// - The retrieval form
/// - Application lifecycle (running/quit)
#[derive(Debug)]
pub struct App {
    /// The live session
    pub session: Session,

    /// Retrieval form input
    pub form: RetrievalForm,

    /// Application configuration
    pub config: Config,

    /// Current UI theme
    pub theme: Theme,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Scroll offset for the document payload
    pub document_scroll: u16,

    /// Spinner frame shown while a call is in flight
    pub spinner: usize,

    client: IntelligenceClient,
    outcome_tx: mpsc::UnboundedSender<CallOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<CallOutcome>,
}

/// Field of the retrieval form that receives typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Source,
    Classification,
    Content,
}

impl FormField {
    /// Next field, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Source => Self::Classification,
            Self::Classification => Self::Content,
            Self::Content => Self::Source,
        }
    }

    /// Previous field, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Self::Source => Self::Content,
            Self::Classification => Self::Source,
            Self::Content => Self::Classification,
        }
    }
}

/// The retrieve-stage input form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalForm {
    pub source: String,
    pub content: String,
    pub classification: Classification,
    pub focus: FormField,
}

impl RetrievalForm {
    /// Empty form preset to `classification`.
    pub fn new(classification: Classification) -> Self {
        Self { classification, ..Self::default() }
    }

    /// Type a character into the focused text field.
    pub fn enter_char(&mut self, c: char) {
        match self.focus {
            FormField::Source => self.source.push(c),
            FormField::Content => self.content.push(c),
            FormField::Classification => {}
        }
    }

    /// Delete the last character of the focused text field (backspace).
    pub fn delete_char(&mut self) {
        match self.focus {
            FormField::Source => {
                self.source.pop();
            }
            FormField::Content => {
                self.content.pop();
            }
            FormField::Classification => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn next_classification(&mut self) {
        self.classification = self.classification.cycle_next();
    }

    pub fn prev_classification(&mut self) {
        self.classification = self.classification.cycle_prev();
    }

    /// Validate the form into retrieval data.
    pub fn to_retrieval(&self) -> Result<RetrievalData, crate::domain::ValidationError> {
        RetrievalData::new(&self.content, &self.source, self.classification)
    }
}

impl App {
    /// Create a new application instance around a configured client.
    pub fn new(config: Config, client: IntelligenceClient) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let theme = Self::resolve_theme(&config);
        let form = RetrievalForm::new(config.general.default_classification);

        Self {
            session: Session::new(),
            form,
            config,
            theme,
            status_message: None,
            should_quit: false,
            document_scroll: 0,
            spinner: 0,
            client,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Resolve theme from configuration.
    fn resolve_theme(config: &Config) -> Theme {
        Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.ui.theme, "Unknown theme, using default");
            Theme::default()
        })
    }

    /// Name of the provider behind the client.
    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Current stage of the session.
    pub fn stage(&self) -> Stage {
        self.session.state().stage()
    }

    /// Advance the session from whatever stage it is on.
    ///
    /// Retrieve submits the form, Analyze seals the record, Document asks for
    /// advice and Advise moves to the report. Report has nothing to continue.
    pub fn continue_stage(&mut self) {
        self.clear_status();

        let result = match self.stage() {
            Stage::Retrieve => {
                self.submit_form();
                return;
            }
            Stage::Analyze => self.session.confirm_analysis(),
            Stage::Document => {
                self.session.confirm_documentation().map(|pending| self.dispatch(pending.into()))
            }
            Stage::Advise => self.session.confirm_advice(),
            Stage::Report => Ok(()),
        };

        if let Err(e) = result {
            self.report_refusal(&e);
        }
        self.document_scroll = 0;
    }

    /// Validate the form and start the analysis.
    pub fn submit_form(&mut self) {
        let data = match self.form.to_retrieval() {
            Ok(data) => data,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };

        match self.session.submit_retrieval(data) {
            Ok(pending) => self.dispatch(pending.into()),
            Err(e) => self.report_refusal(&e),
        }
    }

    /// Re-issue the call that failed on the current stage.
    pub fn retry(&mut self) {
        self.clear_status();
        match self.session.retry() {
            Ok(pending) => self.dispatch(pending),
            Err(e) => self.report_refusal(&e),
        }
    }

    /// Start over with an empty session and form.
    pub fn new_session(&mut self) {
        self.session.reset();
        self.form = RetrievalForm::new(self.config.general.default_classification);
        self.document_scroll = 0;
        self.clear_status();
    }

    /// The final report, once the session reached it.
    pub fn report(&self) -> Option<Report> {
        Report::from_state(self.session.state()).ok()
    }

    /// Run a call on the tokio runtime; the outcome comes back through the channel.
    fn dispatch(&self, pending: PendingCall) {
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let outcome = pending.run(&client).await;
            // The receiver only goes away when the app does.
            let _ = tx.send(outcome);
        });
    }

    /// Apply every outcome that has arrived since the last poll.
    pub fn poll_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Wait for the next outcome and apply it.
    pub async fn next_outcome(&mut self) -> Option<Resolution> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply_outcome(outcome))
    }

    fn apply_outcome(&mut self, outcome: CallOutcome) -> Resolution {
        let resolution = self.session.apply(outcome);
        if resolution == Resolution::Stale {
            tracing::debug!("Ignored a reply from a previous session");
        }
        resolution
    }

    fn report_refusal(&mut self, error: &TransitionError) {
        match error {
            TransitionError::Busy => self.set_status("Please wait for the current request"),
            // The banner already carries the message.
            TransitionError::MissingAnalysis if self.session.state().error().is_some() => {}
            other => self.set_status(other.to_string()),
        }
    }

    /// Set a status message to display temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Scroll the document payload.
    pub fn scroll_document_up(&mut self) {
        self.document_scroll = self.document_scroll.saturating_sub(1);
    }

    pub fn scroll_document_down(&mut self) {
        self.document_scroll = self.document_scroll.saturating_add(1);
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Perform periodic updates (called on tick).
    pub fn tick(&mut self) {
        self.poll_outcomes();
        if self.session.state().is_processing() {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{Scripted, ADVICE_REPLY, ANALYSIS_REPLY};
    use super::*;
    use crate::ai::AdapterError;
    use crate::session::{ADVICE_FAILED_MESSAGE, ANALYSIS_FAILED_MESSAGE};

    fn app(replies: Vec<Result<String, AdapterError>>) -> App {
        App::new(Config::default(), Scripted::client(replies))
    }

    fn fill_form(app: &mut App) {
        app.form.source = "Internal Memo".to_string();
        app.form.content = "Employee flagged suspicious USB use".to_string();
        app.form.classification = Classification::Confidential;
    }

    #[test]
    fn test_app_creation() {
        let app = app(vec![]);
        assert_eq!(app.stage(), Stage::Retrieve);
        assert_eq!(app.form.classification, Classification::Unclassified);
        assert_eq!(app.provider_name(), "scripted");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_form_editing() {
        let mut form = RetrievalForm::default();
        form.enter_char('h');
        form.enter_char('i');
        assert_eq!(form.source, "hi");

        form.focus_next();
        form.enter_char('x');
        form.next_classification();
        assert_eq!(form.classification, Classification::Confidential);
        form.prev_classification();
        form.prev_classification();
        assert_eq!(form.classification, Classification::TopSecret);

        form.focus_next();
        form.enter_char('a');
        form.delete_char();
        form.delete_char();
        assert_eq!(form.content, "");
        assert_eq!(form.source, "hi");

        form.focus_next();
        assert_eq!(form.focus, FormField::Source);
        form.focus_prev();
        assert_eq!(form.focus, FormField::Content);
    }

    #[test]
    fn test_invalid_form_stays_on_retrieve() {
        let mut app = app(vec![]);
        app.form.source = "Internal Memo".to_string();
        app.continue_stage();

        assert_eq!(app.stage(), Stage::Retrieve);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_full_walk_through_the_app() {
        let mut app = app(vec![Ok(ANALYSIS_REPLY.to_string()), Ok(ADVICE_REPLY.to_string())]);
        fill_form(&mut app);

        app.continue_stage();
        assert_eq!(app.stage(), Stage::Analyze);
        assert!(app.session.state().is_processing());
        assert_eq!(app.next_outcome().await, Some(Resolution::Applied));
        assert_eq!(app.session.state().analysis().unwrap().risk_score, 72);

        app.continue_stage();
        assert_eq!(app.stage(), Stage::Document);

        app.continue_stage();
        assert_eq!(app.stage(), Stage::Advise);
        assert_eq!(app.next_outcome().await, Some(Resolution::Applied));

        app.continue_stage();
        assert_eq!(app.stage(), Stage::Report);
        assert_eq!(app.report().unwrap().action_items, 1);

        app.new_session();
        assert_eq!(app.stage(), Stage::Retrieve);
        assert!(app.form.source.is_empty());
    }

    #[tokio::test]
    async fn test_busy_while_processing() {
        let mut app = app(vec![Ok(ANALYSIS_REPLY.to_string())]);
        fill_form(&mut app);

        app.continue_stage();
        app.continue_stage();
        assert_eq!(app.stage(), Stage::Analyze);
        assert_eq!(app.status_message.as_deref(), Some("Please wait for the current request"));
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let mut app = app(vec![Err(AdapterError::EmptyResponse), Ok(ANALYSIS_REPLY.to_string())]);
        fill_form(&mut app);

        app.continue_stage();
        app.next_outcome().await;
        assert_eq!(app.session.state().error(), Some(ANALYSIS_FAILED_MESSAGE));

        app.retry();
        assert!(app.session.state().error().is_none());
        app.next_outcome().await;
        assert!(app.session.state().analysis().is_some());
    }

    #[tokio::test]
    async fn test_skipping_failed_advice_clears_banner() {
        let mut app = app(vec![Ok(ANALYSIS_REPLY.to_string()), Err(AdapterError::EmptyResponse)]);
        fill_form(&mut app);

        app.continue_stage();
        app.next_outcome().await;
        app.continue_stage();
        app.continue_stage();
        app.next_outcome().await;
        assert_eq!(app.stage(), Stage::Advise);
        assert_eq!(app.session.state().error(), Some(ADVICE_FAILED_MESSAGE));

        app.continue_stage();
        assert_eq!(app.stage(), Stage::Report);
        assert!(app.session.state().error().is_none());
        assert_eq!(app.report().unwrap().action_items, 0);
    }

    #[tokio::test]
    async fn test_reply_after_new_session_is_ignored() {
        let mut app = app(vec![Ok(ANALYSIS_REPLY.to_string())]);
        fill_form(&mut app);

        app.continue_stage();
        app.new_session();
        assert_eq!(app.next_outcome().await, Some(Resolution::Stale));
        assert_eq!(app.stage(), Stage::Retrieve);
        assert!(app.session.state().analysis().is_none());
    }
}
