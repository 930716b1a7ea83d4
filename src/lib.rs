//! # docstalk
//!
//! A retrieval-augmented question-answering service: upload documents
//! (`.txt`, `.docx`, `.xlsx`, `.pptx`, `.pdf`) or submit web pages, then
//! ask questions about their contents.
//!
//! ## Pipeline
//!
//! ```text
//!   upload / URL                     question
//!        │                              │
//!        ▼                              ▼
//!  text extraction                embed question
//!  (per-format)                        │
//!        │                              ▼
//!        ▼                      flat L2 top-k lookup
//!  fixed-size chunking                 │
//!        │                              ▼
//!        ▼                      retrieved chunks
//!  append to store                     │
//!        │                              ▼
//!        ▼                      prompt assembly
//!  embed all chunks                    │
//!        │                              ▼
//!        ▼                      hosted chat model
//!  rebuild flat index                  │
//!                                      ▼
//!                                   answer
//! ```
//!
//! The chunk store and vector index live only in process memory and the
//! index is rebuilt from scratch on every ingestion event.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and LLM settings
//! - [`models`] - Shared data types: `DocumentChunk`, request/response types
//! - [`store`] - In-memory, append-only chunk store
//! - [`index`] - Flat squared-L2 nearest-neighbor index
//! - [`ingest`] - Per-format text extraction and URL fetching
//! - [`chunking`] - Fixed-size/fixed-overlap splitting via text-splitter
//! - [`llm`] - Embedding and chat clients for Ollama or OpenAI-compatible APIs
//! - [`api`] - Axum HTTP handlers for upload, URLs, and questions
//! - [`state`] - Shared application state

pub mod api;
pub mod chunking;
pub mod config;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod state;
pub mod store;
