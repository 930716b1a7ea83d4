use serde::{Deserialize, Serialize};

/// A span of ingested text plus the document or URL it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Originating filename or URL
    pub source: String,
    /// Position of this chunk within its source, starting at 0
    pub chunk_index: usize,
    pub content: String,
}

/// URL ingestion request
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessUrlsRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Question request
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Answer response
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    /// Sources of the retrieved context, in retrieval order
    pub sources: Vec<String>,
}

/// Generic success response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Single-message error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Per-URL error list response
#[derive(Debug, Clone, Serialize)]
pub struct UrlErrorsResponse {
    pub error: Vec<String>,
}

/// A single chat turn sent to the hosted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
