//! Ingestion pipeline: load, chunk, embed, index

use std::sync::Arc;

use crate::chunker::TextChunker;
use crate::error::{Error, Result};
use crate::loader::{DocumentLoader, IngestSource};
use crate::providers::{EmbeddingProvider, VectorEntry, VectorIndexProvider};

/// One request-scoped ingestion chain
///
/// The chain is strictly sequential: loader, chunker, embedding, index
/// write. Chunk order within a document is preserved in the written set.
/// Nothing reaches the index unless the loader produced at least one
/// document and the chunker at least one chunk.
pub struct IngestPipeline {
    loader: Arc<DocumentLoader>,
    chunker: Arc<TextChunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
}

impl IngestPipeline {
    /// Assemble a pipeline from shared collaborators
    pub fn new(
        loader: Arc<DocumentLoader>,
        chunker: Arc<TextChunker>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Self {
        Self {
            loader,
            chunker,
            embedder,
            index,
        }
    }

    /// Run the full chain for one source; returns the number of chunks
    /// written
    pub async fn ingest(&self, source: IngestSource) -> Result<usize> {
        let source_id = source.source_id();
        let documents = self.loader.load(source).await?;

        let chunks = self.chunker.chunk_documents(&documents);
        if chunks.is_empty() {
            return Err(Error::EmptyIngestion);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let entries: Vec<VectorEntry> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, vector)| VectorEntry::from_chunk(chunk, vector))
            .collect();

        self.index.upsert(&entries).await?;

        tracing::info!(
            source_id = %source_id,
            documents = documents.len(),
            chunks = entries.len(),
            index = self.index.name(),
            "ingestion complete"
        );

        Ok(entries.len())
    }

    /// Remove every indexed chunk belonging to a source
    ///
    /// Idempotent; removing an unknown id is a successful no-op.
    pub async fn delete_source(&self, source_id: &str) -> Result<()> {
        self.index.delete_by_metadata("source_id", source_id).await?;
        tracing::info!(source_id, "deleted source from index");
        Ok(())
    }
}
