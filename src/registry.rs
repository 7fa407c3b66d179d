//! Plant registry - optimistic mutations with rollback
//!
//! The registry owns the in-memory plant collection and is the single
//! source of truth for anything displaying it. Every mutation follows
//! the same cycle: snapshot the current collection, apply the change in
//! memory (immediately visible to readers), persist the whole collection,
//! and on persistence failure restore the snapshot and surface the error.
//! Readers never observe state that diverges from storage for longer than
//! one failed save.
//!
//! ## Ordering
//!
//! Mutations serialize through a single async mutex held across the
//! persist await. Two overlapping whole-collection saves could otherwise
//! race: a slow earlier save (or its rollback) would clobber a later
//! successful one. Reads take a shared lock only and never wait on
//! persistence.
//!
//! ## Lifecycle
//!
//! `load` runs once per registry lifetime before any mutation. A failed
//! load leaves the collection empty and is surfaced once; the loading
//! flag drops regardless so callers are never stuck waiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::model::{CareUpdate, Plant, SpeciesSummary};
use crate::sprites;
use crate::store::{PlantStore, StoreError};

/// Registry failures
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A mutation was attempted before `load` ran
    #[error("plant collection has not been loaded yet")]
    NotLoaded,

    /// Nickname was empty after trimming
    #[error("nickname must not be empty")]
    EmptyNickname,

    /// No plant with the given id
    #[error("no plant with id {0}")]
    UnknownPlant(String),

    /// Sprite key is not in the catalog
    #[error("unknown sprite key: {0}")]
    UnknownSprite(String),

    /// Initial load from the store failed; the collection starts empty
    #[error("failed to load plant collection: {0}")]
    Load(#[source] StoreError),

    /// Persisting a mutation failed; the collection was rolled back
    #[error("failed to save plant collection: {0}")]
    Save(#[source] StoreError),
}

/// Owns the plant collection and persists every mutation
pub struct PlantRegistry {
    store: Arc<dyn PlantStore>,
    plants: RwLock<Vec<Plant>>,
    /// Serializes mutations across their persist await
    write: Mutex<()>,
    loading: AtomicBool,
    loaded: AtomicBool,
}

impl PlantRegistry {
    /// Create a registry backed by the given store. Call `load` before
    /// mutating.
    pub fn new(store: Arc<dyn PlantStore>) -> Self {
        Self {
            store,
            plants: RwLock::new(Vec::new()),
            write: Mutex::new(()),
            loading: AtomicBool::new(true),
            loaded: AtomicBool::new(false),
        }
    }

    /// Populate the collection from the store, once per lifetime
    ///
    /// Repeat calls are no-ops. On failure the collection stays empty and
    /// the error is returned; the registry remains usable either way.
    pub async fn load(&self) -> Result<(), RegistryError> {
        let _guard = self.write.lock().await;
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }

        let result = self.store.load().await;
        self.loaded.store(true, Ordering::Release);
        self.loading.store(false, Ordering::Release);

        match result {
            Ok(plants) => {
                info!(count = plants.len(), "plant collection loaded");
                *self.plants.write().await = plants;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "plant collection failed to load, starting empty");
                Err(RegistryError::Load(err))
            }
        }
    }

    /// Whether the initial load is still in progress
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Snapshot of the current collection, in display order
    pub async fn plants(&self) -> Vec<Plant> {
        self.plants.read().await.clone()
    }

    /// Current collection size
    pub async fn count(&self) -> usize {
        self.plants.read().await.len()
    }

    /// Add a plant to the end of the collection
    ///
    /// The nickname is trimmed and must be non-empty. `sprite` falls back
    /// to the catalog default; a non-catalog key is rejected. Returns the
    /// stored record.
    pub async fn add_plant(
        &self,
        nickname: &str,
        species: Option<SpeciesSummary>,
        sprite: Option<&str>,
    ) -> Result<Plant, RegistryError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(RegistryError::EmptyNickname);
        }
        let sprite = match sprite {
            Some(key) if !sprites::is_known(key) => {
                return Err(RegistryError::UnknownSprite(key.to_string()));
            }
            Some(key) => key,
            None => sprites::DEFAULT_SPRITE,
        };

        let record = Plant::new(nickname, species, sprite);
        let stored = record.clone();
        self.transact(move |plants| {
            plants.push(record);
            Ok(Some(()))
        })
        .await?;

        debug!(id = %stored.id, nickname = %stored.nickname, "plant added");
        Ok(stored)
    }

    /// Remove a plant. An unknown id is a silent no-op: nothing changes
    /// and nothing is persisted.
    pub async fn delete_plant(&self, id: &str) -> Result<(), RegistryError> {
        let removed = self
            .transact(|plants| {
                let before = plants.len();
                plants.retain(|p| p.id != id);
                if plants.len() == before {
                    Ok(None)
                } else {
                    Ok(Some(()))
                }
            })
            .await?;

        if removed.is_some() {
            debug!(id = %id, "plant deleted");
        }
        Ok(())
    }

    /// Apply one care-field change to a plant
    ///
    /// Setting a timestamp to `None` clears it back to never recorded.
    pub async fn update_care(&self, id: &str, update: CareUpdate) -> Result<(), RegistryError> {
        if let CareUpdate::Sprite(key) = &update {
            if !sprites::is_known(key) {
                return Err(RegistryError::UnknownSprite(key.clone()));
            }
        }

        self.transact(|plants| {
            let plant = plants
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| RegistryError::UnknownPlant(id.to_string()))?;
            match update {
                CareUpdate::LastWatered(ts) => plant.last_watered = ts,
                CareUpdate::LastPestTreatment(ts) => plant.last_pest_treatment = ts,
                CareUpdate::Sprite(key) => plant.sprite = key,
            }
            Ok(Some(()))
        })
        .await?;

        debug!(id = %id, "care updated");
        Ok(())
    }

    /// Rename a plant. A nickname that is empty after trimming keeps the
    /// old name: no mutation, no persistence, no error.
    pub async fn rename_plant(&self, id: &str, nickname: &str) -> Result<(), RegistryError> {
        let trimmed = nickname.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        self.transact(|plants| {
            let plant = plants
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| RegistryError::UnknownPlant(id.to_string()))?;
            plant.nickname = trimmed.to_string();
            Ok(Some(()))
        })
        .await?;

        debug!(id = %id, nickname = %trimmed, "plant renamed");
        Ok(())
    }

    /// Snapshot, apply, persist, and roll back on failure
    ///
    /// `mutate` runs against the live collection under the write lock and
    /// must only change it when returning `Ok(Some(..))`. `Ok(None)`
    /// means nothing changed and nothing needs persisting; `Err` rejects
    /// the mutation before it happens.
    async fn transact<T, F>(&self, mutate: F) -> Result<Option<T>, RegistryError>
    where
        F: FnOnce(&mut Vec<Plant>) -> Result<Option<T>, RegistryError>,
    {
        let _guard = self.write.lock().await;
        if !self.loaded.load(Ordering::Acquire) {
            return Err(RegistryError::NotLoaded);
        }

        let (snapshot, next, value) = {
            let mut plants = self.plants.write().await;
            let snapshot = plants.clone();
            match mutate(&mut plants) {
                Ok(Some(value)) => (snapshot, plants.clone(), value),
                Ok(None) => return Ok(None),
                Err(err) => return Err(err),
            }
        };

        // Readers now see the new state; storage catches up here
        if let Err(err) = self.store.save(&next).await {
            warn!(error = %err, "save failed, restored previous collection");
            *self.plants.write().await = snapshot;
            return Err(RegistryError::Save(err));
        }
        Ok(Some(value))
    }
}
