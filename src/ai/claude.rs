//! Claude API integration.
//!
//! Implements the IntelligenceProvider trait for Claude. The messages API has
//! no schema parameter, so the schema travels in the system prompt.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AdapterError, IntelligenceProvider, StructuredRequest};

/// Claude API provider.
pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    ///
    /// Reads API key from ANTHROPIC_API_KEY environment variable.
    pub fn new() -> Result<Self, AdapterError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AdapterError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com/v1".to_string(),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(&self, request: &StructuredRequest) -> ClaudeRequest {
        let system = format!(
            "{}\n\nRespond with a single JSON object that conforms to this JSON schema. \
             Output only the JSON, no prose and no markdown.\n\n{}",
            request.system_instruction, request.schema
        );

        ClaudeRequest {
            model: self.model.clone(),
            max_tokens: 2048,
            system,
            messages: vec![Message { role: "user".to_string(), content: request.prompt.clone() }],
        }
    }
}

#[async_trait]
impl IntelligenceProvider for ClaudeProvider {
    async fn generate(&self, request: &StructuredRequest) -> Result<String, AdapterError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api { status, body });
        }

        let response: ClaudeResponse = response.json().await?;

        response
            .content
            .into_iter()
            .find(|c| !c.text.trim().is_empty())
            .map(|c| c.text)
            .ok_or(AdapterError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "claude"
    }

    async fn is_available(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;

        response.map(|r| r.status().is_success()).unwrap_or(false)
    }
}

/// Claude API request structure.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

/// Message in a Claude request.
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Claude API response structure.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a Claude response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::advice_schema;
    use serial_test::serial;

    #[test]
    #[serial(claude_env)]
    fn test_claude_provider_creation_fails_without_key() {
        let original = std::env::var("ANTHROPIC_API_KEY").ok();
        std::env::remove_var("ANTHROPIC_API_KEY");

        let result = ClaudeProvider::new();

        if let Some(val) = original {
            std::env::set_var("ANTHROPIC_API_KEY", val);
        }

        assert!(result.is_err());
    }

    #[test]
    #[serial(claude_env)]
    fn test_schema_is_embedded_in_system_prompt() {
        let original = std::env::var("ANTHROPIC_API_KEY").ok();
        std::env::set_var("ANTHROPIC_API_KEY", "test-key");

        let provider = ClaudeProvider::new().unwrap().with_model("claude-test");

        match original {
            Some(val) => std::env::set_var("ANTHROPIC_API_KEY", val),
            None => std::env::remove_var("ANTHROPIC_API_KEY"),
        }

        let request = StructuredRequest {
            system_instruction: "You are a senior security advisor.".to_string(),
            prompt: "Advise.".to_string(),
            schema_name: "advice",
            schema: advice_schema(),
        };
        let body = provider.build_request(&request);

        assert_eq!(body.model, "claude-test");
        assert!(body.system.starts_with("You are a senior security advisor."));
        assert!(body.system.contains("\"recommendations\""));
        assert_eq!(body.messages[0].content, "Advise.");
    }

    #[tokio::test]
    #[serial(claude_env)]
    async fn test_unreachable_endpoint_is_unavailable() {
        let original = std::env::var("ANTHROPIC_API_KEY").ok();
        std::env::set_var("ANTHROPIC_API_KEY", "test-key");

        let provider = ClaudeProvider::new().unwrap().with_base_url("http://127.0.0.1:9");

        match original {
            Some(val) => std::env::set_var("ANTHROPIC_API_KEY", val),
            None => std::env::remove_var("ANTHROPIC_API_KEY"),
        }

        assert!(!provider.is_available().await);
    }

    #[test]
    fn test_response_skips_non_text_blocks() {
        let response: ClaudeResponse = serde_json::from_str(
            r#"{"content":[{"type":"thinking"},{"type":"text","text":"{}"}]}"#,
        )
        .unwrap();
        let text = response.content.into_iter().find(|c| !c.text.trim().is_empty());
        assert_eq!(text.map(|c| c.text).as_deref(), Some("{}"));
    }
}
