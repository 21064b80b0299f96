//! Request types for the HTTP surface

use serde::{Deserialize, Serialize};

use super::SourceType;

/// Body of `POST /ingest` for URL-based sources
///
/// PDF uploads arrive as multipart instead; the handler branches on the
/// request content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Source type to ingest
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// URL for web and youtube sources
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /notes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRequest {
    /// Raw note text typed by the user
    pub content: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question to answer
    pub query: String,
    /// Number of chunks to retrieve (defaults to the configured top-k)
    #[serde(default)]
    pub top_k: Option<usize>,
    /// Also return the structured source list parsed from the answer
    #[serde(default)]
    pub include_sources: bool,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
            include_sources: false,
        }
    }

    /// Override the number of retrieved chunks
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Request the structured source list alongside the answer
    pub fn with_sources(mut self) -> Self {
        self.include_sources = true;
        self
    }
}
