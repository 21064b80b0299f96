//! Chat endpoint

use axum::extract::{FromRequest, Request, State};
use axum::Json;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /chat
///
/// Retrieves the most relevant chunks for the query and composes a
/// grounded answer. With nothing retrieved the composer still runs, so the
/// model answers that it does not know rather than fabricating.
pub async fn chat(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ChatResponse>> {
    let Json(body) = Json::<ChatRequest>::from_request(request, &())
        .await
        .map_err(|e| Error::InvalidRequest(format!("invalid JSON body: {}", e)))?;

    let query = body.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidRequest("query is empty".to_string()));
    }

    let start = Instant::now();
    tracing::info!(query, "chat request");

    let retrieved = state.retriever().retrieve(query, body.top_k).await?;
    let answer = state.composer().compose(query, &retrieved).await?;

    // Source extraction is derived from the answer text alone and is
    // recomputed per response; nothing is persisted.
    let sources = body
        .include_sources
        .then(|| crate::generation::extract_sources(&answer));

    tracing::info!(
        chunks = retrieved.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "chat request complete"
    );

    Ok(Json(ChatResponse { answer, sources }))
}
