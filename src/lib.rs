#![allow(dead_code)]
#![allow(clippy::vec_init_then_push)]
#![allow(clippy::needless_collect)]
#![allow(clippy::format_push_string)]
#![allow(clippy::unused_self)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_filter_map)]
#![allow(clippy::unnecessary_lazy_evaluations)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::manual_strip)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::single_char_pattern)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::or_fun_call)]
#![allow(clippy::case_sensitive_file_extension_comparisons)]
#![allow(clippy::should_implement_trait)]

//! # R.A.D.A.R.
//!
//! Structured intelligence engine for governance, risk and compliance work.
//!
//! A session walks raw intelligence through five stages (Retrieve, Analyze,
//! Document, Advise, Report). Analysis and advice come from a generative
//! model that answers in a declared JSON schema; the documentation record is
//! sealed with a SHA-256 integrity hash.
//!
//! ## Features
//!
//! - **Stage machine**: immutable snapshots, forward-only transitions
//! - **Structured output**: Gemini, Claude, OpenAI or Ollama behind one trait
//! - **Audit record**: content-addressed documentation of every analysis
//! - **Reports**: plain text, Markdown or JSON
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive session
//! radar
//!
//! # One-shot analysis from a file
//! radar analyze --source "Internal Memo" --file memo.txt --format markdown
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::redundant_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unnecessary_literal_bound)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::redundant_clone)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unnecessary_debug_formatting)]
#![allow(clippy::for_kv_map)]
#![allow(clippy::use_self)]
#![allow(clippy::ptr_arg)]

pub mod ai;
pub mod app;
pub mod core;
pub mod domain;
pub mod report;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use ai::{AdapterError, IntelligenceClient, IntelligenceProvider};
pub use app::App;
pub use core::Config;
pub use domain::{
    AnalysisResult, Classification, DocumentationRecord, Priority, Recommendation, RetrievalData,
    Stage,
};
pub use report::{Report, ReportFormat};
pub use session::{Session, SessionState, TransitionError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "radar";
