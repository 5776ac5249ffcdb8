//! Google Gemini API integration.
//!
//! Implements the IntelligenceProvider trait for Gemini using native
//! structured output (`responseSchema`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterError, IntelligenceProvider, StructuredRequest};

/// Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Reads the API key from GEMINI_API_KEY, falling back to API_KEY.
    pub fn new() -> Result<Self, AdapterError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| AdapterError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;

        Ok(Self::with_api_key(api_key))
    }

    /// Create with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
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

    fn build_request(request: &StructuredRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: request.prompt.clone() }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: request.system_instruction.clone() }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: to_gemini_schema(&request.schema),
            },
        }
    }
}

#[async_trait]
impl IntelligenceProvider for GeminiProvider {
    async fn generate(&self, request: &StructuredRequest) -> Result<String, AdapterError> {
        let body = Self::build_request(request);

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api { status, body });
        }

        let response: GeminiResponse = response.json().await?;
        response.text().ok_or(AdapterError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    async fn is_available(&self) -> bool {
        // Listing models checks both the endpoint and the key
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;

        response.map(|r| r.status().is_success()).unwrap_or(false)
    }
}

/// Gemini's schema dialect spells types in upper case (`OBJECT`, `STRING`).
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_uppercase()),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::analysis_schema;
    use serial_test::serial;

    #[test]
    #[serial(gemini_env)]
    fn test_gemini_provider_requires_api_key() {
        let gemini = std::env::var("GEMINI_API_KEY").ok();
        let fallback = std::env::var("API_KEY").ok();
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("API_KEY");

        let result = GeminiProvider::new();

        if let Some(val) = gemini {
            std::env::set_var("GEMINI_API_KEY", val);
        }
        if let Some(val) = fallback {
            std::env::set_var("API_KEY", val);
        }

        assert!(matches!(result, Err(AdapterError::NotConfigured(_))));
    }

    #[test]
    #[serial(gemini_env)]
    fn test_gemini_provider_falls_back_to_api_key() {
        let gemini = std::env::var("GEMINI_API_KEY").ok();
        let fallback = std::env::var("API_KEY").ok();
        std::env::remove_var("GEMINI_API_KEY");
        std::env::set_var("API_KEY", "test-key");

        let provider = GeminiProvider::new();

        match gemini {
            Some(val) => std::env::set_var("GEMINI_API_KEY", val),
            None => std::env::remove_var("GEMINI_API_KEY"),
        }
        match fallback {
            Some(val) => std::env::set_var("API_KEY", val),
            None => std::env::remove_var("API_KEY"),
        }

        assert_eq!(provider.unwrap().api_key, "test-key");
    }

    #[test]
    fn test_schema_types_are_uppercased() {
        let schema = to_gemini_schema(&analysis_schema());
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["riskScore"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["keywords"]["items"]["type"], "STRING");
        // descriptions are untouched
        assert!(schema["properties"]["summary"]["description"]
            .as_str()
            .unwrap()
            .starts_with("A concise"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = StructuredRequest {
            system_instruction: "be brief".to_string(),
            prompt: "hello".to_string(),
            schema_name: "analysis",
            schema: analysis_schema(),
        };
        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_extraction() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));

        let empty: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let provider = GeminiProvider::with_api_key("test-key").with_base_url("http://127.0.0.1:9");
        assert!(!provider.is_available().await);
    }

    #[test]
    fn test_gemini_with_model() {
        let provider = GeminiProvider::with_api_key("k").with_model("gemini-2.5-pro");
        assert_eq!(provider.model, "gemini-2.5-pro");
    }
}
