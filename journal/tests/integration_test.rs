//! Integration tests for the trip journal
//!
//! These tests verify end-to-end functionality including:
//! - Setup against both storage backends
//! - Persistence across restarts
//! - Loading documents written by earlier app builds
//! - Concurrent edits through different services

use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tripjournal::config::{AppConfig, StorageBackendKind};
use tripjournal::models::{NoteDraft, PhotoCategory, PhotoDraft, TripDraft, TripPatch};
use tripjournal::services::CategoryFilter;
use tripjournal::{setup, AppError, AppState};

fn config_for(dir: &Path, backend: StorageBackendKind) -> AppConfig {
    AppConfig {
        data_dir: dir.to_path_buf(),
        backend,
        storage_timeout: Duration::from_secs(5),
    }
}

/// Helper to open app state in a fresh data directory
async fn create_test_state(backend: StorageBackendKind) -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = setup(config_for(temp_dir.path(), backend)).await.unwrap();

    (state, temp_dir)
}

fn lisbon() -> TripDraft {
    TripDraft {
        destination: "Lisbon, Portugal".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 5, 5),
        ..TripDraft::default()
    }
}

fn photo(uri: &str, category: Option<PhotoCategory>) -> PhotoDraft {
    PhotoDraft {
        uri: uri.to_string(),
        category,
        ..PhotoDraft::default()
    }
}

async fn exercise_trip_lifecycle(backend: StorageBackendKind) {
    let temp_dir = TempDir::new().unwrap();
    let trip_id;

    {
        let state = setup(config_for(temp_dir.path(), backend)).await.unwrap();
        assert!(state.trips.initialize().await.unwrap());

        let trip = state.trips.create_trip(lisbon()).await.unwrap();
        assert_eq!(trip.days, 5);
        trip_id = trip.id.clone();

        state
            .photos
            .add_item(&trip.id, photo("file:///tram.jpg", Some(PhotoCategory::Street)))
            .await
            .unwrap();
        state
            .notes
            .add_item(
                &trip.id,
                NoteDraft {
                    title: "Day 1".to_string(),
                    content: "Pastéis de nata".to_string(),
                    ..NoteDraft::default()
                },
            )
            .await
            .unwrap();
    }

    // Reopen: everything must come back from storage
    let state = setup(config_for(temp_dir.path(), backend)).await.unwrap();
    assert!(!state.trips.initialize().await.unwrap());

    let trips = state.trips.list_trips().await.unwrap();
    assert_eq!(trips.len(), 6);
    assert_eq!(trips[5].id, trip_id);

    let trip = state.trips.get_trip(&trip_id).await.unwrap();
    assert_eq!(trip.photos.len(), 1);
    assert_eq!(trip.photos[0].caption, "Untitled");
    assert_eq!(trip.notes.len(), 1);
    assert_eq!(trip.notes[0].mood, "📝");

    assert!(state.trips.delete_trip(&trip_id).await.unwrap());
    assert!(state.trips.get_trip(&trip_id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_trip_lifecycle_file_backend() {
    exercise_trip_lifecycle(StorageBackendKind::File).await;
}

#[tokio::test]
async fn test_trip_lifecycle_sqlite_backend() {
    exercise_trip_lifecycle(StorageBackendKind::Sqlite).await;
}

#[tokio::test]
async fn test_legacy_document_loads_and_upgrades() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().join("storage");
    std::fs::create_dir_all(&storage_dir).unwrap();

    // Shape written by earlier builds: bare array, `image` instead of
    // `emoji`, timestamp dates and the trip form's text saved in `notes`
    let legacy = r##"[
        {
            "id": "1700000000000",
            "destination": "Tokyo, Japan",
            "date": "Mar 10, 2024 - Mar 20, 2024",
            "startDate": "2024-03-10T09:00:00.000Z",
            "endDate": "2024-03-20T09:00:00.000Z",
            "image": "🗾",
            "memories": 24,
            "gradient": ["#4E65FF", "#92EFFD"],
            "days": 10,
            "photos": [{"id": "p1", "uri": "file:///fuji.jpg", "caption": "Fuji"}, null],
            "notes": "Ramen every night"
        }
    ]"##;
    std::fs::write(storage_dir.join("trips.json"), legacy).unwrap();

    let state = setup(config_for(temp_dir.path(), StorageBackendKind::File))
        .await
        .unwrap();
    assert!(!state.trips.initialize().await.unwrap());

    let trip = state.trips.get_trip("1700000000000").await.unwrap();
    assert_eq!(trip.emoji, "🗾");
    assert_eq!(trip.start_date, NaiveDate::from_ymd_opt(2024, 3, 10));
    assert_eq!(trip.photos.len(), 1);
    assert!(trip.notes.is_empty());
    assert_eq!(trip.description, "Ramen every night");

    state
        .trips
        .update_trip(
            &trip.id,
            TripPatch {
                memories: Some(25),
                ..TripPatch::default()
            },
        )
        .await
        .unwrap();

    let raw = std::fs::read(storage_dir.join("trips.json")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(value["schemaVersion"], 1);
    assert_eq!(value["trips"][0]["startDate"], "2024-03-10");
    assert_eq!(value["trips"][0]["emoji"], "🗾");
    assert_eq!(value["trips"][0]["description"], "Ramen every night");
    assert_eq!(value["trips"][0]["notes"], serde_json::json!([]));
}

#[tokio::test]
async fn test_corrupt_document_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().join("storage");
    std::fs::create_dir_all(&storage_dir).unwrap();
    std::fs::write(storage_dir.join("trips.json"), b"{ not json").unwrap();

    let state = setup(config_for(temp_dir.path(), StorageBackendKind::File))
        .await
        .unwrap();

    let err = state.trips.list_trips().await.unwrap_err();
    assert!(matches!(err, AppError::CorruptData(_)));

    // Never overwrite data that could not be read
    assert!(state.trips.create_trip(lisbon()).await.is_err());
    assert_eq!(
        std::fs::read(storage_dir.join("trips.json")).unwrap(),
        b"{ not json"
    );
}

#[tokio::test]
async fn test_concurrent_edits_across_services() {
    let (state, _temp) = create_test_state(StorageBackendKind::Sqlite).await;
    let trip = state.trips.create_trip(lisbon()).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..5 {
        let photos = state.photos.clone();
        let id = trip.id.clone();
        tasks.spawn(async move {
            photos
                .add_item(&id, photo(&format!("file:///{}.jpg", i), None))
                .await
        });

        let trips = state.trips.clone();
        let id = trip.id.clone();
        tasks.spawn(async move {
            trips
                .update_trip(
                    &id,
                    TripPatch {
                        memories: Some(i),
                        ..TripPatch::default()
                    },
                )
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let stored = state.trips.get_trip(&trip.id).await.unwrap();
    assert_eq!(stored.photos.len(), 5);
}

#[tokio::test]
async fn test_gallery_over_seeded_and_new_photos() {
    let (state, _temp) = create_test_state(StorageBackendKind::File).await;
    state.trips.initialize().await.unwrap();

    let trips = state.trips.list_trips().await.unwrap();
    let paris = &trips[0];
    let tokyo = &trips[1];
    let bali = &trips[2];

    state
        .photos
        .add_item(&paris.id, photo("file:///eiffel.jpg", Some(PhotoCategory::Landmarks)))
        .await
        .unwrap();
    state
        .photos
        .add_item(&tokyo.id, photo("file:///ramen.jpg", Some(PhotoCategory::Food)))
        .await
        .unwrap();
    state
        .photos
        .add_item(&bali.id, photo("file:///rice.jpg", None))
        .await
        .unwrap();

    let all = state.gallery.load(CategoryFilter::All, "2024").await.unwrap();
    assert_eq!(all.photos.len(), 3);
    assert_eq!(all.stats.total, 3);
    assert_eq!(all.stats.distinct_trips, 3);
    // Paris and Tokyo are 2024 trips, Bali is 2023
    assert_eq!(all.stats.recent_count, 2);

    let food = state
        .gallery
        .load("Food".parse().unwrap(), "2024")
        .await
        .unwrap();
    assert_eq!(food.photos.len(), 1);
    assert_eq!(food.photos[0].trip_destination, "Tokyo, Japan");
    assert_eq!(food.stats, all.stats);
}
