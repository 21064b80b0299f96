//! Provider abstractions for embeddings, answer generation, and vector
//! storage
//!
//! Trait-based seams so the pipeline never depends on a concrete vendor;
//! the embedding model, LLM, and vector index are pluggable collaborators.

pub mod embedding;
pub mod llm;
pub mod memory;
pub mod openai;
pub mod qdrant;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use memory::MemoryVectorIndex;
pub use openai::{OpenAiChat, OpenAiClient, OpenAiEmbedder};
pub use qdrant::QdrantIndex;
pub use vector_index::{ScoredEntry, VectorEntry, VectorIndexProvider};
