//! lucidnote: retrieval-augmented note assistant
//!
//! Ingests PDFs, web pages, YouTube transcripts, and free-form notes into a
//! vector index, and answers questions over that content with grounded,
//! citation-aware responses. The ingestion pipeline (loader, chunker,
//! embedding, index write) and the query pipeline (retrieval, answer
//! composition, source extraction) are the core; the HTTP surface is a
//! small axum server on top.

pub mod chunker;
pub mod config;
pub mod error;
pub mod generation;
pub mod loader;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::NotebookConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document, SourceMetadata, SourceType},
    request::{ChatRequest, IngestRequest, NoteRequest},
    response::{ChatResponse, IngestResponse, SourceCitation, SourceKind},
};
