//! Immutable documentation record produced at the document stage.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{AnalysisResult, RetrievalData};

/// Author stamped on every record.
pub const RECORD_AUTHOR: &str = "SYSTEM_AUTONOMOUS_AGENT";

/// Prefix of the integrity hash.
pub const HASH_PREFIX: &str = "SHA256-";

/// Analysis and retrieval merged into one flat payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredData {
    #[serde(flatten)]
    pub analysis: AnalysisResult,

    #[serde(flatten)]
    pub retrieval: RetrievalData,
}

/// Identity of a record: identifier plus creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStamp {
    pub id: String,
    pub timestamp: String,
}

impl RecordStamp {
    /// Fresh identifier (first group of a v4 UUID, uppercased) stamped now.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self { id: uuid[..8].to_ascii_uppercase(), timestamp: super::now_iso8601() }
    }
}

/// Audit snapshot of an analyzed retrieval.
///
/// Fields are only readable; a record is never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationRecord {
    id: String,
    hash: String,
    timestamp: String,
    author: String,
    structured_data: StructuredData,
}

impl DocumentationRecord {
    /// Build a record from a stamp and the session's analysis and retrieval.
    ///
    /// The hash is a SHA-256 digest over id, timestamp, author and payload.
    pub fn create(stamp: RecordStamp, analysis: &AnalysisResult, retrieval: &RetrievalData) -> Self {
        let structured_data =
            StructuredData { analysis: analysis.clone(), retrieval: retrieval.clone() };
        let author = RECORD_AUTHOR.to_string();
        let hash = compute_hash(&stamp.id, &stamp.timestamp, &author, &structured_data);

        Self { id: stamp.id, hash, timestamp: stamp.timestamp, author, structured_data }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn structured_data(&self) -> &StructuredData {
        &self.structured_data
    }

    /// Recompute the digest and compare it with the stored hash.
    pub fn verify(&self) -> bool {
        compute_hash(&self.id, &self.timestamp, &self.author, &self.structured_data) == self.hash
    }

    /// Payload as indented JSON, the way the document view prints it.
    pub fn pretty_payload(&self) -> String {
        serde_json::to_string_pretty(&self.structured_data).unwrap_or_default()
    }
}

fn compute_hash(id: &str, timestamp: &str, author: &str, data: &StructuredData) -> String {
    let mut hasher = Sha256::new();

    // Length-prefixed so adjacent fields cannot run into each other.
    let mut field = |value: &str| {
        hasher.update((value.len() as u64).to_be_bytes());
        hasher.update(value.as_bytes());
    };

    field(id);
    field(timestamp);
    field(author);

    let analysis = &data.analysis;
    field(&analysis.risk_score.to_string());
    field(&analysis.summary);
    for list in [&analysis.keywords, &analysis.detected_entities, &analysis.compliance_tags] {
        field(&list.len().to_string());
        for item in list {
            field(item);
        }
    }

    let retrieval = &data.retrieval;
    field(&retrieval.content);
    field(&retrieval.source);
    field(&retrieval.timestamp);
    field(retrieval.classification.as_str());

    format!("{HASH_PREFIX}{:x}", hasher.finalize())
}
