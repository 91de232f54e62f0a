//! Persistent scalar store.
//!
//! A tiny string key/value store that survives restarts. The provider uses
//! exactly one key, [`TRANSACTION_COUNT_KEY`].

pub mod file;
pub mod memory;

use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::StoreConfig;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the on-chain transaction count is cached.
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Get/set access to string scalars.
pub trait ScalarStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Open the store described by `config`: file-backed when a path is set,
/// in-memory otherwise.
pub fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn ScalarStore>> {
    match &config.path {
        Some(path) => Ok(Arc::new(FileStore::open(path)?)),
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
