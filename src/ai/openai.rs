//! OpenAI API integration.
//!
//! Implements the IntelligenceProvider trait for OpenAI GPT models using
//! `response_format: json_schema`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{AdapterError, IntelligenceProvider, StructuredRequest};

/// OpenAI API provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    ///
    /// Reads API key from OPENAI_API_KEY environment variable.
    pub fn new() -> Result<Self, AdapterError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AdapterError::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a custom base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(&self, request: &StructuredRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(request.system_instruction.clone()),
                },
                ChatMessage { role: "user".to_string(), content: Some(request.prompt.clone()) },
            ],
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "schema": request.schema,
                }
            }),
        }
    }
}

#[async_trait]
impl IntelligenceProvider for OpenAIProvider {
    async fn generate(&self, request: &StructuredRequest) -> Result<String, AdapterError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api { status, body });
        }

        let response: OpenAIResponse = response.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AdapterError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        // Check if we can reach the API
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;

        response.map(|r| r.status().is_success()).unwrap_or(false)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}
