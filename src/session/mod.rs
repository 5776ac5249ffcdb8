//! The five-stage intelligence session.
//!
//! [`SessionState`] is the immutable snapshot the views render from;
//! [`Session`] owns the current snapshot and guards against model replies
//! that arrive after the session has moved on.

mod machine;
mod state;

pub use machine::{
    AdviceOutcome, AnalysisOutcome, CallOutcome, FlowError, PendingAdvice, PendingAnalysis,
    PendingCall, Resolution, Session,
};
pub use state::{
    SessionState, TransitionError, ADVICE_FAILED_MESSAGE, ANALYSIS_FAILED_MESSAGE,
    MISSING_ANALYSIS_MESSAGE,
};
