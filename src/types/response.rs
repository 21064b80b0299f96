//! Response types for the HTTP surface and derived citations

use serde::{Deserialize, Serialize};

/// Response from `POST /ingest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Whether ingestion succeeded
    pub success: bool,
    /// Number of chunks written to the index
    pub chunks: usize,
}

impl IngestResponse {
    /// Successful ingestion of `chunks` chunks
    pub fn new(chunks: usize) -> Self {
        Self {
            success: true,
            chunks,
        }
    }
}

/// Response from `POST /notes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResponse {
    /// Whether the note was stored
    pub success: bool,
}

/// Response from `DELETE /ingest`
///
/// Always succeeds, even when no entries matched the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Response from `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Composed, grounded answer in Markdown
    pub answer: String,
    /// Structured source list, present only when the request asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceCitation>>,
}

/// Kind of a derived source citation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Web,
    Youtube,
    Pdf,
}

/// A citation derived from the answer text
///
/// Recomputed on every render of an answer; never persisted and never
/// written back to the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceCitation {
    /// Citation kind
    pub kind: SourceKind,
    /// Display name: link label, file name, or timestamp label
    pub name: String,
    /// URL, timestamp, or page reference depending on kind
    pub reference: String,
    /// 1-based ordinal, unique within one answer, assigned in
    /// first-occurrence order
    pub key: u32,
}
