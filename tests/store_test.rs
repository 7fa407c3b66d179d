//! File store integration tests
//!
//! Round-trips real JSON files through a temp directory and checks the
//! first-launch, corrupt-data, and overwrite behaviors.

use std::sync::Arc;

use greenhouse::{FileStore, Plant, PlantRegistry, PlantStore, SpeciesSummary, StoreError};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> FileStore {
    FileStore::new(dir.path().join("plants.json"))
}

fn sample_collection() -> Vec<Plant> {
    let species = SpeciesSummary {
        species_id: Some(425),
        common_name: Some("Monstera".to_string()),
        scientific_name: Some("Monstera deliciosa".to_string()),
        watering: Some("Average".to_string()),
        sunlight: vec!["part shade".to_string()],
        cycle: Some("Perennial".to_string()),
        thumbnail: Some("https://img.example/s/425.jpg".to_string()),
    };
    let mut monstera = Plant::new("Monty", Some(species), "tree");
    monstera.last_watered = Some("2024-03-01".to_string());
    monstera.last_pest_treatment = Some("2024-02-11T08:15:00.000Z".to_string());
    vec![Plant::new("Fern", None, "sprout"), monstera]
}

/// Loading before anything was saved is an empty collection, no error.
#[tokio::test]
async fn test_missing_file_loads_empty() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    let plants = store.load().await.expect("missing file is not an error");
    assert!(plants.is_empty());
}

/// Save then load returns the identical collection, field for field.
#[tokio::test]
async fn test_round_trip_preserves_every_field() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    let collection = sample_collection();

    store.save(&collection).await.expect("save succeeds");
    let loaded = store.load().await.expect("load succeeds");
    assert_eq!(loaded, collection);
}

/// Saving replaces the whole collection; nothing from the previous save
/// leaks through.
#[tokio::test]
async fn test_save_replaces_previous_collection() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);

    store
        .save(&sample_collection())
        .await
        .expect("first save succeeds");
    let smaller = vec![Plant::new("Only one", None, "sprout")];
    store.save(&smaller).await.expect("second save succeeds");

    let loaded = store.load().await.expect("load succeeds");
    assert_eq!(loaded, smaller);
}

/// Corrupt JSON is a load error, not a silent empty collection.
#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("plants.json");
    tokio::fs::write(&path, b"{not json")
        .await
        .expect("corrupt write succeeds");

    let store = FileStore::new(&path);
    let err = store.load().await.expect_err("corrupt data is an error");
    assert!(matches!(err, StoreError::Corrupt(_)));
}

/// Parent directories are created on demand.
#[tokio::test]
async fn test_save_creates_parent_directories() {
    let dir = TempDir::new().expect("temp dir");
    let nested = dir.path().join("data").join("greenhouse").join("plants.json");
    let store = FileStore::new(&nested);

    store
        .save(&sample_collection())
        .await
        .expect("save creates parents");
    assert!(nested.exists());
}

/// No temp file is left behind after a save.
#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    store
        .save(&sample_collection())
        .await
        .expect("save succeeds");

    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .expect("dir lists")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["plants.json".to_string()]);
}

/// The default path lands under a greenhouse data directory.
#[test]
fn test_default_path_shape() {
    let path = FileStore::default_path();
    assert!(path.ends_with("greenhouse/plants.json"));
}

/// On-disk key names stay camelCase so older collections keep working.
#[tokio::test]
async fn test_on_disk_format_is_camel_case() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    store
        .save(&sample_collection())
        .await
        .expect("save succeeds");

    let raw = tokio::fs::read_to_string(store.path())
        .await
        .expect("file reads");
    assert!(raw.contains("\"speciesId\""));
    assert!(raw.contains("\"lastWatered\""));
    assert!(raw.contains("\"lastPestTreatment\""));
    assert!(!raw.contains("\"species_id\""));
}

/// A registry over a file store picks up a previous session's data.
#[tokio::test]
async fn test_registry_round_trip_through_file_store() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("plants.json");

    {
        let registry = PlantRegistry::new(Arc::new(FileStore::new(&path)));
        registry.load().await.expect("empty file loads");
        registry
            .add_plant("Fern", None, None)
            .await
            .expect("add succeeds");
    }

    let registry = PlantRegistry::new(Arc::new(FileStore::new(&path)));
    registry.load().await.expect("existing file loads");
    let plants = registry.plants().await;
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0].nickname, "Fern");
}
