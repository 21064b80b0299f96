//! Vector index provider trait

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Chunk, SourceMetadata};


/// One stored (vector, text, metadata) triple
#[derive(Debug, Clone)]
pub struct VectorEntry {
    /// Point id, assigned fresh at upsert time
    pub id: Uuid,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Chunk text
    pub text: String,
    /// Chunk provenance
    pub metadata: SourceMetadata,
}

impl VectorEntry {
    /// Build an entry from a chunk and its embedding, assigning a fresh id
    pub fn from_chunk(chunk: &Chunk, vector: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            text: chunk.text.clone(),
            metadata: chunk.metadata.clone(),
        }
    }
}

/// A search hit, ranked by similarity
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// Chunk text
    pub text: String,
    /// Chunk provenance
    pub metadata: SourceMetadata,
    /// Cosine similarity, higher is more similar
    pub score: f32,
}

/// Trait for the vector index
///
/// All entries live in a single flat collection shared across source types;
/// there is no per-user or per-notebook partitioning, so deletion filters
/// by metadata, never by a container key.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Write a batch of entries
    ///
    /// Best-effort all-or-nothing per call: either all entries are written
    /// or the call reports `Error::IndexWrite`. No cross-call atomicity.
    async fn upsert(&self, entries: &[VectorEntry]) -> Result<()>;

    /// Return the k nearest entries by cosine similarity, best first
    ///
    /// Returns fewer than k when the collection holds fewer entries, and an
    /// empty result (not an error) when the collection does not exist.
    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>>;

    /// Delete every entry whose metadata field `key` equals `value`
    ///
    /// Idempotent: deleting with a filter that matches nothing is a
    /// successful no-op.
    async fn delete_by_metadata(&self, key: &str, value: &str) -> Result<()>;

    /// Number of stored entries
    async fn count(&self) -> Result<usize>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
