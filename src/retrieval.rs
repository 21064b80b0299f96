//! Query-side retrieval

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, ScoredEntry, VectorIndexProvider};

/// Retriever over the vector index
///
/// Embeds the query and returns the index's k best matches verbatim, in
/// rank order. No re-ranking and no score thresholding: low-relevance
/// results are still returned when fewer than k better matches exist.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever with the default result count
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Retrieve the most relevant chunks for a query
    pub async fn retrieve(&self, query: &str, top_k: Option<usize>) -> Result<Vec<ScoredEntry>> {
        let k = top_k.unwrap_or(self.top_k);

        let query_vector = self.embedder.embed(query).await?;
        let hits = self.index.search(&query_vector, k).await?;

        tracing::debug!(query, hits = hits.len(), k, "retrieval complete");
        Ok(hits)
    }
}
