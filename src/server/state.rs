//! Application state for the HTTP server

use std::sync::Arc;

use crate::chunker::TextChunker;
use crate::config::{IndexBackend, NotebookConfig};
use crate::error::Result;
use crate::generation::{AnswerComposer, CitationGrammar};
use crate::loader::DocumentLoader;
use crate::pipeline::IngestPipeline;
use crate::providers::{
    EmbeddingProvider, MemoryVectorIndex, OpenAiChat, OpenAiEmbedder, QdrantIndex,
    VectorIndexProvider,
};
use crate::retrieval::Retriever;

/// Shared application state
///
/// All provider handles are constructed once at startup and shared by
/// reference into each request-scoped pipeline invocation; nothing here is
/// built per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: NotebookConfig,
    pipeline: IngestPipeline,
    retriever: Retriever,
    composer: AnswerComposer,
    index: Arc<dyn VectorIndexProvider>,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Build the full collaborator graph from configuration
    pub fn new(config: NotebookConfig) -> Result<Self> {
        tracing::info!("initializing application state");

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbedder::new(&config.embeddings)?);
        tracing::info!(
            model = %config.embeddings.model,
            dimensions = config.embeddings.dimensions,
            "embedding provider ready"
        );

        let llm = Arc::new(OpenAiChat::new(&config.llm)?);
        tracing::info!(model = %config.llm.model, "llm provider ready");

        let index: Arc<dyn VectorIndexProvider> = match config.vector_index.backend {
            IndexBackend::Qdrant => Arc::new(QdrantIndex::new(
                &config.vector_index,
                config.embeddings.dimensions,
            )?),
            IndexBackend::Memory => Arc::new(MemoryVectorIndex::new()),
        };
        tracing::info!(
            backend = index.name(),
            collection = %config.vector_index.collection,
            "vector index ready"
        );

        let loader = Arc::new(DocumentLoader::new(&config.loader)?);
        let chunker = Arc::new(TextChunker::from_config(&config.chunking));

        let pipeline = IngestPipeline::new(
            loader,
            chunker,
            Arc::clone(&embedder),
            Arc::clone(&index),
        );
        let retriever = Retriever::new(
            Arc::clone(&embedder),
            Arc::clone(&index),
            config.retrieval.top_k,
        );
        let composer = AnswerComposer::new(llm, CitationGrammar::default());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                retriever,
                composer,
                index,
                started_at: chrono::Utc::now(),
            }),
        })
    }

    /// Configuration
    pub fn config(&self) -> &NotebookConfig {
        &self.inner.config
    }

    /// Ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Retriever
    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }

    /// Answer composer
    pub fn composer(&self) -> &AnswerComposer {
        &self.inner.composer
    }

    /// Vector index
    pub fn index(&self) -> &Arc<dyn VectorIndexProvider> {
        &self.inner.index
    }

    /// When this process built its state
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.inner.started_at
    }
}
