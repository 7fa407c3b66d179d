//! JSON file backend
//!
//! The whole collection lives in one pretty-printed JSON document. Saves
//! go through a temp file and rename so a crash mid-write can never leave
//! a half-written collection behind.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{PlantStore, StoreError};
use crate::model::Plant;

/// File-backed plant store
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform's local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("greenhouse")
            .join("plants.json")
    }

    /// Path this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlantStore for FileStore {
    async fn load(&self) -> Result<Vec<Plant>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let plants: Vec<Plant> = serde_json::from_slice(&bytes)?;
                debug!(path = %self.path.display(), count = plants.len(), "loaded plant collection");
                Ok(plants)
            }
            // First launch: nothing stored yet
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, plants: &[Plant]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(plants)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = plants.len(), "saved plant collection");
        Ok(())
    }
}
