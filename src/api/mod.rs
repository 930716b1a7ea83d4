//! Axum HTTP handlers for the three service endpoints.

pub mod ask;
pub mod upload;
pub mod urls;

use axum::http::StatusCode;
use axum::Json;

use crate::index::FlatIndex;
use crate::models::ErrorResponse;
use crate::state::AppState;

/// JSON error tuple returned by handlers.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Re-embed every stored chunk and swap in a freshly built index,
/// discarding the previous one.
///
/// The store only grows, so a full rebuild keeps index positions aligned
/// with store positions. Callers hold the ingest permit.
pub(crate) async fn rebuild_index(state: &AppState) -> anyhow::Result<()> {
    let texts = state.store.contents();
    if texts.is_empty() {
        *state.index.write() = None;
        return Ok(());
    }

    let embeddings =
        crate::llm::embeddings::embed_batch(&state.http_client, &state.config.llm, &texts).await?;
    let index = FlatIndex::build(embeddings)?;

    if index.dim() != state.config.llm.embedding_dim {
        tracing::warn!(
            "Embedding dimension {} differs from configured {}",
            index.dim(),
            state.config.llm.embedding_dim
        );
    }
    tracing::info!(chunks = texts.len(), dim = index.dim(), "Vector index rebuilt");

    *state.index.write() = Some(index);
    Ok(())
}
