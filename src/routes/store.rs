//! External route store interface.
//!
//! The store is a collaborator, not part of the engine: all the gateway needs
//! is a filtered read returning the enabled records in store order. The
//! production implementation reads a JSON document from disk; tests provide
//! an in-memory store.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::routes::record::StoredRoute;

/// Errors from the backing route store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read route table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse route table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A key/value table of route records supporting a filtered read.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Read all enabled records, in store order.
    async fn fetch_enabled(&self) -> Result<Vec<StoredRoute>, StoreError>;
}

/// Route store backed by a JSON file holding an array of records.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteStore for JsonFileStore {
    async fn fetch_enabled(&self) -> Result<Vec<StoredRoute>, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<StoredRoute> = serde_json::from_str(&raw)?;
        Ok(records.into_iter().filter(|r| r.enabled).collect())
    }
}
