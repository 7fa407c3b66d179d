//! Registry lifecycle integration tests
//!
//! Exercises full add/update/rename/delete sequences against the
//! in-memory store and checks that the persisted collection tracks the
//! in-memory one after every successful step.

use std::sync::Arc;

use greenhouse::{CareUpdate, MemoryStore, Plant, PlantRegistry, RegistryError};

/// Registry over a fresh in-memory store, already loaded
async fn fresh_registry() -> (PlantRegistry, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let registry = PlantRegistry::new(store.clone());
    registry.load().await.expect("empty store loads");
    (registry, store)
}

/// After every successful mutation the store holds exactly the
/// in-memory collection.
#[tokio::test]
async fn test_store_tracks_every_successful_mutation() {
    let (registry, store) = fresh_registry().await;

    let fern = registry
        .add_plant("Kitchen fern", None, None)
        .await
        .expect("add succeeds");
    assert_eq!(store.saved().await, registry.plants().await);

    registry
        .add_plant("Monstera", None, Some("tree"))
        .await
        .expect("second add succeeds");
    assert_eq!(store.saved().await, registry.plants().await);

    registry
        .update_care(
            &fern.id,
            CareUpdate::LastWatered(Some("2024-03-01".to_string())),
        )
        .await
        .expect("care update succeeds");
    assert_eq!(store.saved().await, registry.plants().await);

    registry
        .rename_plant(&fern.id, "Fern")
        .await
        .expect("rename succeeds");
    assert_eq!(store.saved().await, registry.plants().await);

    registry
        .delete_plant(&fern.id)
        .await
        .expect("delete succeeds");
    assert_eq!(store.saved().await, registry.plants().await);
    assert_eq!(registry.plants().await.len(), 1);
}

/// The full lifecycle scenario: add, record care, rename, delete.
#[tokio::test]
async fn test_add_care_rename_delete_scenario() {
    let (registry, _store) = fresh_registry().await;
    assert!(registry.plants().await.is_empty());

    let added = registry
        .add_plant("Kitchen fern", None, None)
        .await
        .expect("add succeeds");
    let plants = registry.plants().await;
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0].nickname, "Kitchen fern");
    assert_eq!(plants[0].last_watered, None);
    assert_eq!(plants[0].last_pest_treatment, None);

    registry
        .update_care(
            &added.id,
            CareUpdate::LastWatered(Some("2024-03-01".to_string())),
        )
        .await
        .expect("care update succeeds");
    let plants = registry.plants().await;
    assert_eq!(plants[0].last_watered.as_deref(), Some("2024-03-01"));
    assert_eq!(plants[0].last_pest_treatment, None);
    assert_eq!(plants[0].nickname, "Kitchen fern");

    registry
        .rename_plant(&added.id, "Fern")
        .await
        .expect("rename succeeds");
    assert_eq!(registry.plants().await[0].nickname, "Fern");

    registry
        .delete_plant(&added.id)
        .await
        .expect("delete succeeds");
    assert!(registry.plants().await.is_empty());
}

/// Insertion order is display order and survives unrelated mutations.
#[tokio::test]
async fn test_collection_keeps_insertion_order() {
    let (registry, _store) = fresh_registry().await;

    for name in ["First", "Second", "Third"] {
        registry
            .add_plant(name, None, None)
            .await
            .expect("add succeeds");
    }
    let second_id = registry.plants().await[1].id.clone();
    registry
        .update_care(
            &second_id,
            CareUpdate::LastPestTreatment(Some("2024-04-01T09:30:00.000Z".to_string())),
        )
        .await
        .expect("care update succeeds");

    let names: Vec<String> = registry
        .plants()
        .await
        .into_iter()
        .map(|p| p.nickname)
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

/// A failed save leaves memory and storage exactly as they were, and
/// later mutations still work.
#[tokio::test]
async fn test_failed_save_then_recovery() {
    let (registry, store) = fresh_registry().await;
    registry
        .add_plant("Monstera", None, None)
        .await
        .expect("add succeeds");
    let before = registry.plants().await;

    store.fail_next_save();
    let err = registry
        .add_plant("Fern", None, None)
        .await
        .expect_err("armed save fails");
    assert!(matches!(err, RegistryError::Save(_)));
    assert_eq!(registry.plants().await, before);
    assert_eq!(store.saved().await, before);

    // The failure was one-shot; the registry is not wedged
    registry
        .add_plant("Fern", None, None)
        .await
        .expect("retry succeeds");
    assert_eq!(registry.plants().await.len(), 2);
    assert_eq!(store.saved().await, registry.plants().await);
}

/// Rollback applies to update and rename the same way it does to add.
#[tokio::test]
async fn test_update_and_rename_roll_back() {
    let (registry, store) = fresh_registry().await;
    let plant = registry
        .add_plant("Fern", None, None)
        .await
        .expect("add succeeds");
    registry
        .update_care(
            &plant.id,
            CareUpdate::LastWatered(Some("2024-03-01".to_string())),
        )
        .await
        .expect("care update succeeds");
    let before = registry.plants().await;

    store.fail_next_save();
    let err = registry
        .update_care(&plant.id, CareUpdate::LastWatered(None))
        .await
        .expect_err("armed save fails");
    assert!(matches!(err, RegistryError::Save(_)));
    assert_eq!(registry.plants().await, before);

    store.fail_next_save();
    let err = registry
        .rename_plant(&plant.id, "Bathroom fern")
        .await
        .expect_err("armed save fails");
    assert!(matches!(err, RegistryError::Save(_)));
    assert_eq!(registry.plants().await, before);
}

/// A pre-populated store comes back intact through load.
#[tokio::test]
async fn test_load_restores_previous_session() {
    let seeded = vec![
        Plant::new("Fern", None, "sprout"),
        Plant::new("Monstera", None, "tree"),
    ];
    let store = Arc::new(MemoryStore::with_plants(seeded.clone()));
    let registry = PlantRegistry::new(store);

    assert!(registry.is_loading());
    registry.load().await.expect("seeded store loads");
    assert!(!registry.is_loading());
    assert_eq!(registry.plants().await, seeded);
}
