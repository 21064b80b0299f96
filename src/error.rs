//! Error types for the note assistant

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the ingestion and query pipelines
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A loader produced zero documents
    #[error("no documents were produced from the input")]
    EmptyIngestion,

    /// PDF bytes could not be parsed
    #[error("unreadable PDF: {0}")]
    UnreadablePdf(String),

    /// Network failure or timeout while fetching a source
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Page render failure (WebDriver)
    #[error("render failed: {0}")]
    Render(String),

    /// Video has no available transcript
    #[error("no transcript available: {0}")]
    NoTranscript(String),

    /// Malformed or missing request fields
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Embedding endpoint failure
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Vector index write failure
    #[error("index write failed: {0}")]
    IndexWrite(String),

    /// Vector index read failure
    #[error("index read failed: {0}")]
    IndexRead(String),

    /// Model call failure or timeout
    #[error("generation failed: {0}")]
    Generation(String),

    /// Bad configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Catch-all internal error
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status for this error
    ///
    /// Loader-stage errors are user-correctable and map to 400; everything
    /// downstream (embedding, index, model) is an infrastructure fault.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyIngestion
            | Self::UnreadablePdf(_)
            | Self::Fetch(_)
            | Self::Render(_)
            | Self::NoTranscript(_)
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client
    ///
    /// 400-class errors carry enough detail to retry with corrected input.
    /// 500-class errors hide upstream provider detail behind a generic
    /// notice; the full error is logged server-side.
    pub fn client_message(&self) -> String {
        match self {
            Self::Embedding(_) => "embedding service failure".to_string(),
            Self::IndexWrite(_) | Self::IndexRead(_) => "vector index failure".to_string(),
            Self::Generation(_) => "answer generation failure".to_string(),
            Self::Config(_) | Self::Internal(_) | Self::Io(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}
