//! Ollama local LLM integration.
//!
//! Implements the IntelligenceProvider trait for Ollama (local LLM). The
//! schema is passed through the `format` field.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterError, IntelligenceProvider, StructuredRequest};

/// Ollama API provider for local LLM.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses localhost:11434 by default.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
        }
    }

    /// Create with a specific base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(&self, request: &StructuredRequest) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system_instruction.clone(),
            format: request.schema.clone(),
            stream: false,
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntelligenceProvider for OllamaProvider {
    async fn generate(&self, request: &StructuredRequest) -> Result<String, AdapterError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api { status, body });
        }

        let response: OllamaResponse = response.json().await?;
        Ok(response.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        // Try to reach the Ollama API
        let result = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await;

        result.is_ok()
    }
}

/// Ollama API request structure.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    system: String,
    format: Value,
    stream: bool,
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}
