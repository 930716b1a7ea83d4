use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::rebuild_index;
use crate::models::{MessageResponse, ProcessUrlsRequest, UrlErrorsResponse};
use crate::state::AppState;

/// POST /api/urls - Fetch and ingest a batch of web pages.
///
/// Pages that fetch cleanly are ingested even when others in the batch
/// fail; the index is rebuilt once at the end and per-URL failures come
/// back as an error list.
pub async fn process_urls(
    State(state): State<AppState>,
    Json(req): Json<ProcessUrlsRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<UrlErrorsResponse>)> {
    let mut errors: Vec<String> = Vec::new();

    let _permit = state.ingest_semaphore.acquire().await.map_err(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UrlErrorsResponse {
                error: vec!["Ingestion is shutting down".to_string()],
            }),
        )
    })?;

    for url in &req.urls {
        match crate::ingest::fetch_url_text(
            &state.http_client,
            url,
            state.config.fetch_timeout_secs,
        )
        .await
        {
            Ok(text) => {
                match crate::chunking::split_text(
                    &text,
                    url,
                    state.config.chunk_size,
                    state.config.chunk_overlap,
                ) {
                    Ok(chunks) => {
                        tracing::info!(url = %url, chunks = chunks.len(), "URL ingested");
                        state.store.append(chunks);
                    }
                    Err(e) => errors.push(format!("Error processing URL '{url}': {e:#}")),
                }
            }
            // Fetch errors are already phrased per URL
            Err(e) => errors.push(format!("{e:#}")),
        }
    }

    if let Err(e) = rebuild_index(&state).await {
        tracing::error!("Index rebuild failed after URL ingestion: {e:#}");
        errors.push(format!("Error rebuilding index: {e:#}"));
    }

    if !errors.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(UrlErrorsResponse { error: errors }),
        ));
    }

    Ok(Json(MessageResponse {
        message: "URLs processed successfully.".to_string(),
    }))
}
