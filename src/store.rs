use parking_lot::RwLock;

use crate::models::DocumentChunk;

/// In-memory, append-only store of document chunks.
///
/// Chunks live only for the lifetime of the process. Every ingestion
/// appends a batch, after which the vector index is rebuilt from the
/// full contents; chunk positions in this store line up with vector
/// positions in the index.
#[derive(Default)]
pub struct DocumentStore {
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of chunks in order.
    pub fn append(&self, batch: Vec<DocumentChunk>) {
        self.chunks.write().extend(batch);
    }

    /// Snapshot of every chunk's text, in append order. The embedding
    /// pass runs over this copy so no lock is held across awaits.
    pub fn contents(&self) -> Vec<String> {
        self.chunks.read().iter().map(|c| c.content.clone()).collect()
    }

    /// Fetch chunks by store position, skipping out-of-range entries.
    pub fn get_many(&self, positions: &[usize]) -> Vec<DocumentChunk> {
        let chunks = self.chunks.read();
        positions.iter().filter_map(|&i| chunks.get(i).cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }
}
