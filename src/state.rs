use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::index::FlatIndex;
use crate::store::DocumentStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<DocumentStore>,
    /// None until the first successful ingestion; replaced wholesale on
    /// every rebuild.
    pub index: Arc<RwLock<Option<FlatIndex>>>,
    pub http_client: reqwest::Client,
    /// Single permit: one ingestion (and index rebuild) at a time.
    pub ingest_semaphore: Arc<tokio::sync::Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            config,
            store: Arc::new(DocumentStore::new()),
            index: Arc::new(RwLock::new(None)),
            http_client,
            ingest_semaphore: Arc::new(tokio::sync::Semaphore::new(1)),
        })
    }
}
