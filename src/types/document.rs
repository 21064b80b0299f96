//! Document and chunk types with source tracking

use serde::{Deserialize, Serialize};

/// Origin of an ingested document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// PDF document (one document per page)
    Pdf,
    /// Rendered web page
    Web,
    /// YouTube transcript segment
    Youtube,
    /// Free-form note typed by the user
    Note,
}

impl SourceType {
    /// Display name used in logs and the info endpoint
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Web => "Web Page",
            Self::Youtube => "YouTube Transcript",
            Self::Note => "Note",
        }
    }
}

/// Provenance carried by every document and inherited by its chunks
///
/// `source_id` is the join key back to the originating ingestion request:
/// a file name for PDFs, the URL for web pages and videos, a synthetic id
/// for notes. Deletion filters on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceMetadata {
    /// Origin type
    pub source_type: SourceType,
    /// Stable identifier for the source (file name, URL, or synthetic id)
    pub source_id: String,
    /// Page number, 1-based (PDF only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Segment timestamp, "MM:SS" or "H:MM:SS" (YouTube only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Page or video title, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SourceMetadata {
    /// Metadata for one PDF page
    pub fn pdf(filename: impl Into<String>, page: u32) -> Self {
        Self {
            source_type: SourceType::Pdf,
            source_id: filename.into(),
            page: Some(page),
            timestamp: None,
            title: None,
        }
    }

    /// Metadata for a web page
    pub fn web(url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            source_type: SourceType::Web,
            source_id: url.into(),
            page: None,
            timestamp: None,
            title,
        }
    }

    /// Metadata for one transcript segment
    pub fn youtube(url: impl Into<String>, timestamp: String, title: Option<String>) -> Self {
        Self {
            source_type: SourceType::Youtube,
            source_id: url.into(),
            page: None,
            timestamp: Some(timestamp),
            title,
        }
    }

    /// Metadata for a note
    pub fn note(source_id: String) -> Self {
        Self {
            source_type: SourceType::Note,
            source_id,
            page: None,
            timestamp: None,
            title: None,
        }
    }

    /// Human-readable source label used when serializing chunks into the
    /// grounding context
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("{}: {}", self.source_type.display_name(), self.source_id)];

        if let Some(page) = self.page {
            parts.push(format!("page {}", page));
        }
        if let Some(ts) = &self.timestamp {
            parts.push(format!("at {}", ts));
        }
        if let Some(title) = &self.title {
            parts.push(format!("\"{}\"", title));
        }

        parts.join(", ")
    }
}

/// A normalized document produced by a loader
///
/// Immutable once produced; consumed by the chunker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Extracted text content
    pub text: String,
    /// Source provenance
    pub metadata: SourceMetadata,
}

impl Document {
    /// Create a new document
    pub fn new(text: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded-length span of text plus inherited provenance, the atomic unit
/// embedded and stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Text content, at most the configured chunk size
    pub text: String,
    /// Metadata inherited unmodified from the parent document
    pub metadata: SourceMetadata,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SourceType::Pdf).unwrap(), "\"pdf\"");
        assert_eq!(serde_json::to_string(&SourceType::Youtube).unwrap(), "\"youtube\"");
    }

    #[test]
    fn optional_fields_are_omitted() {
        let meta = SourceMetadata::note("note-abc123".to_string());
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("page").is_none());
        assert!(json.get("timestamp").is_none());
        assert_eq!(json["source_id"], "note-abc123");
    }

    #[test]
    fn describe_includes_page_and_timestamp() {
        let pdf = SourceMetadata::pdf("report.pdf", 4);
        assert!(pdf.describe().contains("page 4"));

        let yt = SourceMetadata::youtube("https://youtu.be/x", "12:34".into(), None);
        assert!(yt.describe().contains("at 12:34"));
    }
}
