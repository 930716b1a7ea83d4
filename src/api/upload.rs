use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use super::{api_error, rebuild_index, ApiError};
use crate::ingest::{self, SourceFormat};
use crate::models::MessageResponse;
use crate::state::AppState;

/// POST /api/upload - Ingest one uploaded document (multipart field `file`).
///
/// Flow: extension dispatch → text extraction → chunking → append to the
/// store → full index rebuild.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::info!("Received file upload request");

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Malformed multipart body: {e}"),
        )
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Failed to read uploaded file: {e}"),
            )
        })?;
        file = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = file else {
        return Err(api_error(StatusCode::BAD_REQUEST, "No file part"));
    };
    if filename.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No selected file"));
    }

    let ext = ingest::file_extension(&filename);
    let Some(format) = SourceFormat::from_extension(&ext) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Unsupported file type: .{ext}"),
        ));
    };

    tracing::info!(file = %filename, format = ?format, "Processing upload");

    // PDF and OOXML extraction is CPU-bound; keep it off the async workers.
    let text = tokio::task::spawn_blocking(move || ingest::extract_file_text(&data, format))
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Extraction task failed: {e}"),
            )
        })?
        .map_err(|e| {
            tracing::error!(file = %filename, "Extraction failed: {e:#}");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred while processing the file: {e:#}"),
            )
        })?;

    let chunks = crate::chunking::split_text(
        &text,
        &filename,
        state.config.chunk_size,
        state.config.chunk_overlap,
    )
    .map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Chunking failed: {e:#}"),
        )
    })?;

    // One ingestion at a time; each one rebuilds the whole index.
    let _permit = state.ingest_semaphore.acquire().await.map_err(|_| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Ingestion is shutting down",
        )
    })?;

    state.store.append(chunks);
    rebuild_index(&state).await.map_err(|e| {
        tracing::error!("Index rebuild failed after upload: {e:#}");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Embedding failed: {e:#}"),
        )
    })?;

    tracing::info!(file = %filename, "Upload processed");
    Ok(Json(MessageResponse {
        message: "File processed successfully".to_string(),
    }))
}
