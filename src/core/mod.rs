//! Core types and functionality for R.A.D.A.R.
//!
//! Configuration shared by the CLI and the TUI.

mod config;

pub use config::{AiConfig, Config, GeneralConfig, ProviderKind, UiConfig};
