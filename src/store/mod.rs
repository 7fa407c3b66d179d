//! Durable storage for the plant collection
//!
//! The registry persists through the `PlantStore` trait so backends can
//! be swapped: `FileStore` for real use, `MemoryStore` for tests. Both
//! use whole-collection semantics: `save` replaces everything that was
//! stored before, `load` returns everything or nothing.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Plant;

/// Storage failures, separated so callers can tell corrupt data from io
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem-level failure (permissions, disk full, ...)
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data exists but is not a valid plant collection
    #[error("corrupt plant data: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Backend refused the operation (used by injected test failures)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for the plant collection
#[async_trait]
pub trait PlantStore: Send + Sync {
    /// Load the full collection. Nothing stored yet is an empty
    /// collection, not an error; unreadable or corrupt data is.
    async fn load(&self) -> Result<Vec<Plant>, StoreError>;

    /// Replace the entire persisted collection.
    async fn save(&self, plants: &[Plant]) -> Result<(), StoreError>;
}
