//! AI integration module.
//!
//! Translates the two model-backed stages (content analysis and advice
//! generation) into structured-output requests against a generative model.
//!
//! ## Layers
//!
//! - [`IntelligenceProvider`] - transport to one vendor API; returns raw text
//! - [`IntelligenceClient`] - builds prompts and schemas, parses and validates
//!   the JSON reply into domain types
//!
//! Calls are single-shot: no retry, no fallback between providers, no caching.

mod claude;
mod client;
mod gemini;
mod ollama;
mod openai;
mod schema;

pub use claude::ClaudeProvider;
pub use client::{IntelligenceClient, ADVICE_SYSTEM_INSTRUCTION, ANALYSIS_SYSTEM_INSTRUCTION};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use schema::{advice_schema, analysis_schema, parse_advice, parse_analysis};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{AiConfig, ProviderKind};

/// A structured-output request: instructions plus the schema the reply must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    /// System-level framing of the model's role
    pub system_instruction: String,

    /// The user prompt
    pub prompt: String,

    /// Short schema identifier (some APIs require one)
    pub schema_name: &'static str,

    /// JSON Schema of the expected reply
    pub schema: Value,
}

/// Trait for AI providers.
#[async_trait]
pub trait IntelligenceProvider: Send + Sync {
    /// Send the request and return the model's text payload.
    async fn generate(&self, request: &StructuredRequest) -> Result<String, AdapterError>;

    /// Get the provider name.
    fn name(&self) -> &str;

    /// Check if the provider is available.
    async fn is_available(&self) -> bool;
}

/// Adapter error types.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No response from AI model")]
    EmptyResponse,

    #[error("Response is not valid JSON: {0}")]
    Parse(String),

    #[error("Response does not match schema: {0}")]
    Schema(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Build the provider selected in configuration.
///
/// Credentials come from the environment; a missing key is reported here
/// rather than at call time.
pub fn provider_from_config(
    config: &AiConfig,
) -> Result<Arc<dyn IntelligenceProvider>, AdapterError> {
    let provider: Arc<dyn IntelligenceProvider> = match config.provider {
        ProviderKind::Gemini => {
            let mut p = GeminiProvider::new()?;
            if let Some(model) = &config.model {
                p = p.with_model(model);
            }
            if let Some(url) = &config.base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        ProviderKind::Claude => {
            let mut p = ClaudeProvider::new()?;
            if let Some(model) = &config.model {
                p = p.with_model(model);
            }
            if let Some(url) = &config.base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        ProviderKind::OpenAI => {
            let mut p = OpenAIProvider::new()?;
            if let Some(model) = &config.model {
                p = p.with_model(model);
            }
            if let Some(url) = &config.base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        ProviderKind::Ollama => {
            let mut p = OllamaProvider::new();
            if let Some(model) = &config.model {
                p = p.with_model(model);
            }
            if let Some(url) = &config.base_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
    };

    tracing::debug!(provider = provider.name(), "AI provider configured");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_needs_no_credentials() {
        let config = AiConfig { provider: ProviderKind::Ollama, ..AiConfig::default() };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_adapter_error_display() {
        let err = AdapterError::Api { status: 429, body: "slow down".to_string() };
        assert_eq!(err.to_string(), "API error (429): slow down");
        assert_eq!(AdapterError::EmptyResponse.to_string(), "No response from AI model");
    }
}
