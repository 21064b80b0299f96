//! Route handlers for the HTTP surface

pub mod chat;
pub mod ingest;
pub mod notes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all routes
pub fn routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/ingest",
            post(ingest::ingest)
                .delete(ingest::delete_source)
                .layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/notes", post(notes::create_note))
        .route("/chat", post(chat::chat))
        .route("/info", get(info))
}

/// Service info endpoint
async fn info(state: axum::extract::State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "lucidnote",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Retrieval-augmented note assistant with grounded, citation-aware answers",
        "started_at": state.started_at().to_rfc3339(),
        "collection": state.config().vector_index.collection,
        "endpoints": {
            "POST /ingest": "Ingest a PDF (multipart), web page, or YouTube transcript",
            "DELETE /ingest?id=<sourceId>": "Remove everything indexed for a source",
            "POST /notes": "Store a free-form note",
            "POST /chat": "Ask a question over the ingested content"
        }
    }))
}
