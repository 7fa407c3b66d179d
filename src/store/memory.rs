//! In-memory backend
//!
//! Used by tests and ephemeral setups. `fail_next_save` arms a one-shot
//! save failure so rollback paths can be exercised deterministically;
//! `saved` and `save_calls` let tests assert exactly what was persisted.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::{PlantStore, StoreError};
use crate::model::Plant;

/// Memory-backed plant store
#[derive(Default)]
pub struct MemoryStore {
    plants: Mutex<Vec<Plant>>,
    fail_next_save: AtomicBool,
    fail_next_load: AtomicBool,
    save_calls: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a collection
    pub fn with_plants(plants: Vec<Plant>) -> Self {
        Self {
            plants: Mutex::new(plants),
            ..Self::default()
        }
    }

    /// Make the next `save` call fail, once
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Make the next `load` call fail, once
    pub fn fail_next_load(&self) {
        self.fail_next_load.store(true, Ordering::SeqCst);
    }

    /// Last successfully persisted collection
    pub async fn saved(&self) -> Vec<Plant> {
        self.plants.lock().await.clone()
    }

    /// Number of `save` attempts (including failed ones)
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlantStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Plant>, StoreError> {
        if self.fail_next_load.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected load failure".to_string()));
        }
        Ok(self.plants.lock().await.clone())
    }

    async fn save(&self, plants: &[Plant]) -> Result<(), StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected save failure".to_string()));
        }
        *self.plants.lock().await = plants.to_vec();
        Ok(())
    }
}
