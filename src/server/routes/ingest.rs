//! Ingestion endpoints

use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::loader::IngestSource;
use crate::server::state::AppState;
use crate::types::{DeleteResponse, IngestRequest, IngestResponse, SourceType};

/// POST /ingest
///
/// URL sources (web, youtube) arrive as JSON; PDF uploads arrive as
/// multipart with a `file` field. The handler branches on content type so
/// both share one route.
pub async fn ingest(State(state): State<AppState>, request: Request) -> Result<Json<IngestResponse>> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let source = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| Error::InvalidRequest(format!("invalid multipart body: {}", e)))?;
        source_from_multipart(multipart).await?
    } else {
        let Json(body) = Json::<IngestRequest>::from_request(request, &())
            .await
            .map_err(|e| Error::InvalidRequest(format!("invalid JSON body: {}", e)))?;
        source_from_json(body)?
    };

    let chunks = state.pipeline().ingest(source).await?;
    Ok(Json(IngestResponse::new(chunks)))
}

/// Build an ingestion source from a JSON body
fn source_from_json(body: IngestRequest) -> Result<IngestSource> {
    let url = body
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::InvalidRequest("missing 'url' field".to_string()))?
        .to_string();

    match body.source_type {
        SourceType::Web => Ok(IngestSource::Web { url }),
        SourceType::Youtube => Ok(IngestSource::Youtube { url }),
        SourceType::Pdf => Err(Error::InvalidRequest(
            "PDF ingestion requires a multipart file upload".to_string(),
        )),
        SourceType::Note => Err(Error::InvalidRequest(
            "notes are ingested through POST /notes".to_string(),
        )),
    }
}

/// Build an ingestion source from a multipart upload
async fn source_from_multipart(mut multipart: Multipart) -> Result<IngestSource> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("failed to read multipart field: {}", e)))?
    {
        // The file field carries a filename; metadata fields do not.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("failed to read file: {}", e)))?;

        tracing::info!(filename = %filename, bytes = data.len(), "received file upload");

        return Ok(IngestSource::Pdf {
            filename,
            data: data.to_vec(),
        });
    }

    Err(Error::InvalidRequest(
        "multipart body contained no file".to_string(),
    ))
}

/// Query parameters for DELETE /ingest
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// Source id to delete (file name or URL, urlencoded)
    pub id: String,
}

/// DELETE /ingest?id=<sourceId>
///
/// Removes every indexed chunk for the source. Succeeds even when nothing
/// matched.
pub async fn delete_source(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteResponse>> {
    state.pipeline().delete_source(&params.id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
