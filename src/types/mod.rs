//! Core types for the note assistant

pub mod document;
pub mod request;
pub mod response;

pub use document::{Chunk, Document, SourceMetadata, SourceType};
pub use request::{ChatRequest, IngestRequest, NoteRequest};
pub use response::{ChatResponse, DeleteResponse, IngestResponse, NoteResponse, SourceCitation, SourceKind};
