//! Note endpoint

use axum::extract::{FromRequest, Request, State};
use axum::Json;

use crate::error::{Error, Result};
use crate::loader::IngestSource;
use crate::server::state::AppState;
use crate::types::{NoteRequest, NoteResponse};

/// POST /notes
///
/// Stores the raw note as a single document of source type `note`, run
/// through the same pipeline as every other source.
pub async fn create_note(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<NoteResponse>> {
    let Json(body) = Json::<NoteRequest>::from_request(request, &())
        .await
        .map_err(|e| Error::InvalidRequest(format!("invalid JSON body: {}", e)))?;

    if body.content.trim().is_empty() {
        return Err(Error::InvalidRequest("note content is empty".to_string()));
    }

    state
        .pipeline()
        .ingest(IngestSource::Note {
            content: body.content,
        })
        .await?;

    Ok(Json(NoteResponse { success: true }))
}
