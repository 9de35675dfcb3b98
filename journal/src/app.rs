//! Application state and initialization
//!
//! This module builds the storage backend from configuration and wires one
//! repository into every service. All services share its write queue.

use crate::config::{AppConfig, StorageBackendKind, FILE_STORE_DIRNAME, TRIPS_STORAGE_KEY};
use crate::database::open_journal_pool;
use crate::dates::{Clock, SystemClock};
use crate::error::Result;
use crate::ids::UuidGenerator;
use crate::repository::TripRepository;
use crate::services::{GalleryService, NoteEditor, PhotoEditor, TripsService};
use crate::storage::{FileStore, KeyValueStore, SqliteStore, StorageGateway};
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repository: TripRepository,
    pub trips: TripsService,
    pub photos: PhotoEditor,
    pub notes: NoteEditor,
    pub gallery: GalleryService,
}

impl AppState {
    pub fn new(config: AppConfig, repository: TripRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            trips: TripsService::new(repository.clone()),
            photos: PhotoEditor::new(repository.clone(), Arc::clone(&clock)),
            notes: NoteEditor::new(repository.clone(), clock),
            gallery: GalleryService::new(repository.clone()),
            repository,
            config,
        }
    }
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackendKind::File => {
            let store = FileStore::new(config.data_dir.join(FILE_STORE_DIRNAME));
            store.initialize().await?;
            Ok(Arc::new(store))
        }
        StorageBackendKind::Sqlite => {
            let pool = open_journal_pool(config).await?;
            Ok(Arc::new(SqliteStore::new(pool)))
        }
    }
}

/// Application setup - called once on startup
pub async fn setup(config: AppConfig) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("Data directory: {:?}", config.data_dir);

    tokio::fs::create_dir_all(&config.data_dir).await?;

    let store = open_store(&config).await?;
    tracing::info!("Using {:?} storage backend", config.backend);

    let gateway = StorageGateway::new(store, TRIPS_STORAGE_KEY, config.storage_timeout);
    let repository = TripRepository::new(gateway, Arc::new(UuidGenerator));
    let state = AppState::new(config, repository, Arc::new(SystemClock));

    tracing::info!("Application initialized successfully");

    Ok(state)
}
