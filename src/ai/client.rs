//! Adapter between the session and a provider.

use std::sync::Arc;

use super::schema::{advice_schema, analysis_schema, parse_advice, parse_analysis};
use super::{AdapterError, IntelligenceProvider, StructuredRequest};
use crate::domain::{AnalysisResult, Recommendation, RetrievalData};

/// Role framing for the analysis call.
pub const ANALYSIS_SYSTEM_INSTRUCTION: &str = "You are an expert intelligence analyst for a cybersecurity GRC platform. Analyze the input for risks, compliance gaps, and key intelligence.";

/// Role framing for the advice call.
pub const ADVICE_SYSTEM_INSTRUCTION: &str = "You are a senior security advisor. Provide clear, actionable steps aligned with NIST and ISO standards.";

/// Stateless client for the two model-backed operations.
#[derive(Clone)]
pub struct IntelligenceClient {
    provider: Arc<dyn IntelligenceProvider>,
}

impl IntelligenceClient {
    pub fn new(provider: Arc<dyn IntelligenceProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Check whether the provider can be reached.
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Score and summarize retrieved content.
    pub async fn analyze(&self, data: &RetrievalData) -> Result<AnalysisResult, AdapterError> {
        let request = analysis_request(data);
        tracing::debug!(provider = self.provider_name(), "requesting analysis");

        let result = self.provider.generate(&request).await.and_then(|text| parse_analysis(&text));
        if let Err(ref e) = result {
            tracing::warn!(provider = self.provider_name(), error = %e, "Analysis failed");
        }
        result
    }

    /// Turn an analysis into recommendations.
    pub async fn generate_advice(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<Vec<Recommendation>, AdapterError> {
        let request = advice_request(analysis);
        tracing::debug!(provider = self.provider_name(), "requesting advice");

        let result = self.provider.generate(&request).await.and_then(|text| parse_advice(&text));
        if let Err(ref e) = result {
            tracing::warn!(provider = self.provider_name(), error = %e, "Advice generation failed");
        }
        result
    }
}

impl std::fmt::Debug for IntelligenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntelligenceClient").field("provider", &self.provider_name()).finish()
    }
}

fn analysis_request(data: &RetrievalData) -> StructuredRequest {
    let prompt = format!(
        r#"Perform a security and intelligence analysis on the following retrieved data.
Source: {}
Classification: {}

Content:
"{}""#,
        data.source, data.classification, data.content
    );

    StructuredRequest {
        system_instruction: ANALYSIS_SYSTEM_INSTRUCTION.to_string(),
        prompt,
        schema_name: "analysis",
        schema: analysis_schema(),
    }
}

fn advice_request(analysis: &AnalysisResult) -> StructuredRequest {
    let prompt = format!(
        r"Based on the following analysis, provide 3-5 actionable recommendations.
Risk Score: {}
Summary: {}
Compliance Context: {}",
        analysis.risk_score,
        analysis.summary,
        analysis.compliance_tags.join(", ")
    );

    StructuredRequest {
        system_instruction: ADVICE_SYSTEM_INSTRUCTION.to_string(),
        prompt,
        schema_name: "advice",
        schema: advice_schema(),
    }
}
