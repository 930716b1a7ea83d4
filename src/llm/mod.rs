//! Hosted model clients: embeddings and chat completion over Ollama or
//! an OpenAI-compatible API.

pub mod chat;
pub mod embeddings;
