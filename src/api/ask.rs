use std::fmt::Write;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{api_error, ApiError};
use crate::llm::{chat, embeddings};
use crate::models::{AskRequest, AskResponse, ChatMessage, DocumentChunk};
use crate::state::AppState;

/// POST /api/ask - Answer a question from the ingested documents.
///
/// With nothing ingested the question goes straight to the chat model.
/// Otherwise the question is embedded, the top-k closest chunks are
/// retrieved, and their text is forwarded as context.
pub async fn ask_question(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No question provided"));
    }

    tracing::info!(question = %question, "Received question");

    if state.store.is_empty() {
        tracing::info!("No documents ingested, answering without context");
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: question.clone(),
        }];
        let answer = chat::complete(&state.http_client, &state.config.llm, messages)
            .await
            .map_err(|e| {
                api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("LLM error: {e:#}"))
            })?;
        return Ok(Json(AskResponse {
            answer,
            sources: Vec::new(),
        }));
    }

    let query_embedding = embeddings::embed_single(&state.http_client, &state.config.llm, &question)
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Embedding error: {e:#}"),
            )
        })?;

    let neighbors = {
        let index = state.index.read();
        match index.as_ref() {
            Some(index) => index
                .search(&query_embedding, state.config.retrieval_top_k)
                .map_err(|e| {
                    api_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Index lookup error: {e:#}"),
                    )
                })?,
            // Documents exist but no rebuild has succeeded yet
            None => Vec::new(),
        }
    };

    let positions: Vec<usize> = neighbors.iter().map(|n| n.position).collect();
    let relevant = state.store.get_many(&positions);
    let sources: Vec<String> = relevant.iter().map(|c| c.source.clone()).collect();

    let messages = build_messages(&relevant, &question);
    let answer = chat::complete(&state.http_client, &state.config.llm, messages)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("LLM error: {e:#}")))?;

    tracing::info!("Question answered");
    Ok(Json(AskResponse { answer, sources }))
}

// ─── Prompt assembly ─────────────────────────────────────

fn build_system_prompt() -> String {
    String::from(
        "You are a knowledgeable assistant answering questions about the user's documents.\n\
         Each question comes with context retrieved from uploaded files and web pages.\n\
         Use the context to answer accurately. If the context does not cover the question,\n\
         say so and answer from your own knowledge.\n\
         Name the sources you relied on.",
    )
}

fn build_context_block(chunks: &[DocumentChunk]) -> String {
    let mut ctx = String::from("Here is content retrieved from the user's documents:\n\n");

    if chunks.is_empty() {
        ctx.push_str("(No relevant content was found for this question.)\n");
    } else {
        for chunk in chunks {
            write!(ctx, "--- {} ---\n{}\n\n", chunk.source, chunk.content).unwrap();
        }
    }

    ctx
}

fn build_messages(chunks: &[DocumentChunk], question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: build_system_prompt(),
        },
        // Context goes in the user message so smaller models attend to it
        ChatMessage {
            role: "user".to_string(),
            content: format!("{}---\nQuestion: {question}", build_context_block(chunks)),
        },
    ]
}
