//! In-process vector index
//!
//! Brute-force cosine search over a locked vec. Backs the test suite and
//! standalone runs without a Qdrant service; semantics match the remote
//! adapter (flat collection, delete-by-metadata, missing data is an empty
//! result).

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;

use super::vector_index::{ScoredEntry, VectorEntry, VectorIndexProvider};

/// In-memory vector index with cosine similarity
#[derive(Default)]
pub struct MemoryVectorIndex {
    entries: RwLock<Vec<VectorEntry>>,
}

impl MemoryVectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndexProvider for MemoryVectorIndex {
    async fn upsert(&self, entries: &[VectorEntry]) -> Result<()> {
        self.entries.write().extend_from_slice(entries);
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>> {
        let entries = self.entries.read();

        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|entry| ScoredEntry {
                text: entry.text.clone(),
                metadata: entry.metadata.clone(),
                score: cosine_similarity(vector, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    async fn delete_by_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().retain(|entry| {
            let field = match key {
                "source_id" => Some(entry.metadata.source_id.as_str()),
                "title" => entry.metadata.title.as_deref(),
                "timestamp" => entry.metadata.timestamp.as_deref(),
                _ => None,
            };
            field != Some(value)
        });
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
