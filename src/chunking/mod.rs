//! Fixed-size, fixed-overlap text chunking, delegated to the
//! text-splitter crate.

use anyhow::Result;
use text_splitter::{ChunkConfig, TextSplitter};

use crate::models::DocumentChunk;

/// Split extracted text into chunks tagged with their originating
/// filename or URL. Whitespace-only input produces no chunks.
pub fn split_text(
    text: &str,
    source: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<DocumentChunk>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let config = ChunkConfig::new(chunk_size).with_overlap(chunk_overlap)?;
    let splitter = TextSplitter::new(config);

    let chunks = splitter
        .chunks(text)
        .filter(|c| !c.trim().is_empty())
        .enumerate()
        .map(|(chunk_index, content)| DocumentChunk {
            source: source.to_string(),
            chunk_index,
            content: content.to_string(),
        })
        .collect();

    Ok(chunks)
}
