//! Output schemas and response parsing.
//!
//! Schemas are plain JSON Schema; providers that need a dialect convert them.

use serde::Deserialize;
use serde_json::{json, Value};

use super::AdapterError;
use crate::domain::{AnalysisResult, Recommendation, MAX_RISK_SCORE};

/// Schema of the analysis reply. All fields required.
pub fn analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "riskScore": {
                "type": "integer",
                "description": "A calculated risk score from 0 (Safe) to 100 (Critical) based on the content."
            },
            "summary": {
                "type": "string",
                "description": "A concise executive summary of the retrieved intelligence."
            },
            "keywords": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Key terms extracted from the text."
            },
            "detectedEntities": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Organizations, people, or locations identified."
            },
            "complianceTags": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Relevant compliance frameworks (e.g., NIST, ISO 27001, GDPR, HIPAA) applicable to this data."
            }
        },
        "required": ["riskScore", "summary", "keywords", "detectedEntities", "complianceTags"]
    })
}

/// Schema of the advice reply: an object wrapping the recommendation array.
pub fn advice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "priority": {
                            "type": "string",
                            "enum": ["LOW", "MEDIUM", "HIGH", "CRITICAL"]
                        },
                        "frameworkReference": { "type": "string" }
                    },
                    "required": ["title", "description", "priority"]
                }
            }
        },
        "required": ["recommendations"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisPayload {
    risk_score: i64,
    summary: String,
    keywords: Vec<String>,
    detected_entities: Vec<String>,
    compliance_tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AdvicePayload {
    recommendations: Vec<Recommendation>,
}

/// Parse and validate an analysis reply.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AdapterError> {
    let payload: AnalysisPayload = decode(text)?;

    let risk_score = u8::try_from(payload.risk_score)
        .ok()
        .filter(|score| *score <= MAX_RISK_SCORE)
        .ok_or_else(|| {
            AdapterError::Schema(format!(
                "riskScore {} is outside 0..={MAX_RISK_SCORE}",
                payload.risk_score
            ))
        })?;

    Ok(AnalysisResult {
        risk_score,
        summary: payload.summary,
        keywords: payload.keywords,
        detected_entities: payload.detected_entities,
        compliance_tags: payload.compliance_tags,
    })
}

/// Parse and validate an advice reply, returning the inner array.
pub fn parse_advice(text: &str) -> Result<Vec<Recommendation>, AdapterError> {
    let payload: AdvicePayload = decode(text)?;
    Ok(payload.recommendations)
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, AdapterError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AdapterError::EmptyResponse);
    }

    serde_json::from_str(body).map_err(|e| {
        if e.is_data() {
            AdapterError::Schema(e.to_string())
        } else {
            AdapterError::Parse(e.to_string())
        }
    })
}

/// Unwrap a Markdown code fence (```json ... ```) if the model added one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    // The body starts with `{` or `[`, so a leading word is the info string ("json").
    rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    const ANALYSIS: &str = r#"{
        "riskScore": 72,
        "summary": "Removable media used outside policy.",
        "keywords": ["usb", "insider-threat"],
        "detectedEntities": [],
        "complianceTags": ["NIST-800-53"]
    }"#;

    #[test]
    fn test_parse_analysis() {
        let analysis = parse_analysis(ANALYSIS).unwrap();
        assert_eq!(analysis.risk_score, 72);
        assert_eq!(analysis.keywords, vec!["usb", "insider-threat"]);
        assert!(analysis.detected_entities.is_empty());
        assert_eq!(analysis.compliance_tags, vec!["NIST-800-53"]);
    }

    #[test]
    fn test_parse_analysis_in_code_fence() {
        let fenced = format!("```json\n{ANALYSIS}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap().risk_score, 72);
    }

    #[test]
    fn test_parse_analysis_in_single_line_fence() {
        let fenced = r#"```{"riskScore":1,"summary":"s","keywords":[],"detectedEntities":[],"complianceTags":[]}```"#;
        assert_eq!(parse_analysis(fenced).unwrap().risk_score, 1);
    }

    #[test]
    fn test_parse_analysis_rejects_out_of_range_score() {
        let text = ANALYSIS.replace("72", "101");
        assert!(matches!(parse_analysis(&text), Err(AdapterError::Schema(_))));

        let text = ANALYSIS.replace("72", "-1");
        assert!(matches!(parse_analysis(&text), Err(AdapterError::Schema(_))));
    }

    #[test]
    fn test_parse_analysis_rejects_missing_field() {
        let text = r#"{"riskScore": 10, "summary": "x", "keywords": [], "detectedEntities": []}"#;
        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, AdapterError::Schema(ref msg) if msg.contains("complianceTags")));
    }

    #[test]
    fn test_parse_analysis_rejects_fractional_score() {
        let text = ANALYSIS.replace("72", "72.5");
        assert!(matches!(parse_analysis(&text), Err(AdapterError::Schema(_))));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(parse_analysis("I cannot help with that."), Err(AdapterError::Parse(_))));
        assert!(matches!(parse_analysis("   "), Err(AdapterError::EmptyResponse)));
    }

    #[test]
    fn test_parse_advice() {
        let text = r#"{"recommendations": [
            {"title": "Block USB storage", "description": "Apply device control.", "priority": "HIGH", "frameworkReference": "NIST SP 800-53 MP-7"},
            {"title": "Interview employee", "description": "HR follow-up.", "priority": "MEDIUM"}
        ]}"#;

        let advice = parse_advice(text).unwrap();
        assert_eq!(advice.len(), 2);
        assert_eq!(advice[0].priority, Priority::High);
        assert_eq!(advice[0].framework_reference.as_deref(), Some("NIST SP 800-53 MP-7"));
        assert_eq!(advice[1].framework_reference, None);
    }

    #[test]
    fn test_parse_advice_rejects_unknown_priority() {
        let text = r#"{"recommendations": [{"title": "t", "description": "d", "priority": "URGENT"}]}"#;
        assert!(matches!(parse_advice(text), Err(AdapterError::Schema(_))));
    }

    #[test]
    fn test_parse_advice_requires_wrapper() {
        let text = r#"[{"title": "t", "description": "d", "priority": "LOW"}]"#;
        assert!(matches!(parse_advice(text), Err(AdapterError::Schema(_))));
    }

    #[test]
    fn test_schemas_declare_required_fields() {
        let analysis = analysis_schema();
        assert_eq!(analysis["required"].as_array().unwrap().len(), 5);

        let advice = advice_schema();
        let item = &advice["properties"]["recommendations"]["items"];
        assert_eq!(item["required"], json!(["title", "description", "priority"]));
        assert_eq!(item["properties"]["priority"]["enum"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json {\"a\":1} ```"), "{\"a\":1}");
    }
}
