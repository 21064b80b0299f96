//! Recursive text chunking with provenance inheritance

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Boundary levels tried in order, largest first
const PARAGRAPH: &str = "\n\n";
const LINE: &str = "\n";

/// Text chunker with configurable size and overlap
///
/// Splits on a recursive boundary strategy: paragraphs, then lines, then
/// sentences, then words, then characters, trying larger boundaries first.
/// Chunking is deterministic: the same document and parameters always yield
/// the same chunk sequence.
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks of the same document
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// The overlap must be smaller than the chunk size.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(
            overlap < chunk_size,
            "chunk overlap must be smaller than chunk size"
        );
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Chunk a batch of documents in order
    pub fn chunk_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        docs.iter().flat_map(|doc| self.chunk_document(doc)).collect()
    }

    /// Chunk a single document
    ///
    /// A document no longer than the chunk size yields exactly one chunk
    /// equal to the full text. Longer documents yield ordered, overlapping
    /// chunks that all inherit the document's metadata unmodified.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        if doc.text.trim().is_empty() {
            return Vec::new();
        }

        if doc.text.len() <= self.chunk_size {
            return vec![Chunk::new(doc.text.clone(), doc.metadata.clone())];
        }

        let fragments = self.fragments(&doc.text, 0);
        self.merge(fragments)
            .into_iter()
            .map(|text| Chunk::new(text, doc.metadata.clone()))
            .collect()
    }

    /// Split text into fragments no larger than the chunk size, trying the
    /// boundary at `level` first and recursing into smaller boundaries for
    /// oversized pieces
    fn fragments(&self, text: &str, level: usize) -> Vec<String> {
        if text.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let pieces: Vec<String> = match level {
            0 => split_keeping_separator(text, PARAGRAPH),
            1 => split_keeping_separator(text, LINE),
            2 => text.split_sentence_bounds().map(str::to_string).collect(),
            3 => text.split_word_bounds().map(str::to_string).collect(),
            _ => return self.char_slices(text),
        };

        // A boundary that produced a single piece made no progress; go finer.
        if pieces.len() <= 1 {
            return self.fragments(text, level + 1);
        }

        let mut fragments = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if piece.len() > self.chunk_size {
                fragments.extend(self.fragments(&piece, level + 1));
            } else {
                fragments.push(piece);
            }
        }
        fragments
    }

    /// Last-resort split at character boundaries
    fn char_slices(&self, text: &str) -> Vec<String> {
        let mut slices = Vec::new();
        let mut rest = text;
        while rest.len() > self.chunk_size {
            let mut cut = self.chunk_size;
            while !rest.is_char_boundary(cut) {
                cut -= 1;
            }
            slices.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        if !rest.is_empty() {
            slices.push(rest.to_string());
        }
        slices
    }

    /// Merge ordered fragments into chunks of at most the chunk size,
    /// carrying an overlap tail from each emitted chunk into the next
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for fragment in fragments {
            if !current.is_empty() && current.len() + fragment.len() > self.chunk_size {
                let tail = self.overlap_tail(&current);
                chunks.push(std::mem::take(&mut current));

                // The tail is dropped when it would push the next fragment
                // past the chunk size (boundary-snap exception).
                if tail.len() + fragment.len() <= self.chunk_size {
                    current = tail;
                }
            }
            current.push_str(&fragment);
        }

        if !current.trim().is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Overlap tail taken from the end of an emitted chunk, snapped to a
    /// word boundary at or under the configured width
    fn overlap_tail(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len() - self.overlap;
        while start < text.len() && !text.is_char_boundary(start) {
            start += 1;
        }
        let window = &text[start..];

        // Avoid starting the next chunk mid-word.
        match window.find(char::is_whitespace) {
            Some(pos) => {
                let trimmed = window[pos..].trim_start();
                trimmed.to_string()
            }
            None => window.to_string(),
        }
    }
}

/// Split on a separator, keeping the separator attached to the preceding
/// piece so the pieces concatenate back to the input
fn split_keeping_separator(text: &str, sep: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(sep) {
        let end = pos + sep.len();
        pieces.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceMetadata;

    fn note_doc(text: &str) -> Document {
        Document::new(text, SourceMetadata::note("note-test".to_string()))
    }

    #[test]
    fn short_document_yields_single_full_chunk() {
        let chunker = TextChunker::new(500, 50);
        let doc = note_doc("The sky is blue.");

        let chunks = chunker.chunk_document(&doc);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "The sky is blue.");
        assert_eq!(chunks[0].metadata, doc.metadata);
    }

    #[test]
    fn document_exactly_at_chunk_size_is_not_split() {
        let chunker = TextChunker::new(20, 5);
        let text = "a".repeat(20);
        let chunks = chunker.chunk_document(&note_doc(&text));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn long_document_respects_chunk_size() {
        let chunker = TextChunker::new(100, 20);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = chunker.chunk_document(&note_doc(&text));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.text.len() <= 100,
                "chunk of {} chars exceeds limit",
                chunk.text.len()
            );
        }
    }

    #[test]
    fn adjacent_chunks_overlap() {
        let chunker = TextChunker::new(100, 30);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = chunker.chunk_document(&note_doc(&text));

        for pair in chunks.windows(2) {
            let prev = &pair[0].text;
            let next = &pair[1].text;

            // The next chunk starts with some suffix of the previous chunk,
            // no wider than the configured overlap.
            let shared = (1..=30.min(prev.len()))
                .rev()
                .filter(|&n| prev.is_char_boundary(prev.len() - n))
                .find(|&n| next.starts_with(&prev[prev.len() - n..]));
            assert!(shared.is_some(), "chunks do not overlap: {:?} / {:?}", prev, next);
        }
    }

    #[test]
    fn chunking_is_deterministic() {
        let chunker = TextChunker::new(120, 25);
        let text = "Paragraph one with several sentences. Another sentence here.\n\n\
                    Paragraph two continues the document with more text to split. \
                    It keeps going for a while so multiple chunks are produced.\n\n\
                    Paragraph three closes things out with a final thought.";
        let doc = note_doc(text);

        let first = chunker.chunk_document(&doc);
        let second = chunker.chunk_document(&doc);

        assert_eq!(first, second);
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let chunker = TextChunker::new(60, 10);
        let text = "Short paragraph one.\n\nShort paragraph two.\n\nShort paragraph three.";
        let chunks = chunker.chunk_document(&note_doc(text));

        // Splits land on paragraph boundaries rather than mid-sentence.
        assert!(chunks[0].text.contains("paragraph one."));
        assert!(!chunks[0].text.contains("three"));
    }

    #[test]
    fn metadata_is_inherited_by_every_chunk() {
        let chunker = TextChunker::new(80, 10);
        let meta = SourceMetadata::pdf("report.pdf", 3);
        let doc = Document::new("word ".repeat(100), meta.clone());

        for chunk in chunker.chunk_document(&doc) {
            assert_eq!(chunk.metadata, meta);
        }
    }

    #[test]
    fn whitespace_only_document_yields_no_chunks() {
        let chunker = TextChunker::new(500, 50);
        assert!(chunker.chunk_document(&note_doc("   \n\n  ")).is_empty());
    }

    #[test]
    fn unbroken_text_falls_back_to_character_boundaries() {
        let chunker = TextChunker::new(50, 10);
        let text = "x".repeat(200);
        let chunks = chunker.chunk_document(&note_doc(&text));

        assert!(chunks.len() >= 4);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 50);
        }
    }
}
