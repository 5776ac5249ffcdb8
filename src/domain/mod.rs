//! Domain model shared by the adapter, the session and the views.
//!
//! Pure data: construction and validation helpers only.

mod advice;
mod analysis;
mod record;
mod retrieval;
mod stage;

pub use advice::{Priority, Recommendation};
pub use analysis::{AnalysisResult, RiskLevel, MAX_RISK_SCORE};
pub use record::{DocumentationRecord, RecordStamp, StructuredData, HASH_PREFIX, RECORD_AUTHOR};
pub use retrieval::{Classification, RetrievalData, ValidationError};
pub use stage::Stage;

use chrono::{SecondsFormat, Utc};

/// Current time as ISO-8601 with millisecond precision, e.g. `2024-07-01T12:00:00.000Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
