//! Note loader: wrap user-typed text as a single document

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::{Document, SourceMetadata};

/// Length of the hash prefix used in synthetic note ids
const NOTE_ID_LEN: usize = 12;

/// Synthetic source id for a note, derived from its content
///
/// Content-addressed so re-adding identical text maps to the same id,
/// which makes deletion by id behave predictably.
pub fn note_source_id(content: &str) -> String {
    let digest = Sha256::digest(content.trim().as_bytes());
    format!("note-{}", &hex::encode(digest)[..NOTE_ID_LEN])
}

/// Wrap raw note text as a single document
pub fn load_note(content: &str) -> Result<Vec<Document>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyIngestion);
    }

    let metadata = SourceMetadata::note(note_source_id(content));
    Ok(vec![Document::new(trimmed, metadata)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;

    #[test]
    fn note_becomes_single_document() {
        let docs = load_note("The sky is blue.").unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "The sky is blue.");
        assert_eq!(docs[0].metadata.source_type, SourceType::Note);
        assert!(docs[0].metadata.source_id.starts_with("note-"));
    }

    #[test]
    fn identical_notes_share_a_source_id() {
        assert_eq!(note_source_id("same text"), note_source_id("same text"));
        assert_ne!(note_source_id("same text"), note_source_id("other text"));
    }

    #[test]
    fn blank_note_is_rejected() {
        assert!(matches!(load_note("   "), Err(Error::EmptyIngestion)));
    }
}
