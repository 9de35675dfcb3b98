//! Database module
//!
//! The SQLite file behind the sqlite storage backend. It lives in the data
//! directory, waits on a locked database no longer than the configured storage
//! timeout and carries the `kv_store` schema before any pooled connection sees it.

pub mod schema;

pub use schema::initialize_database;

use crate::config::{AppConfig, SQLITE_DB_FILENAME, SQLITE_POOL_SIZE};
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;

/// Location of the journal database inside the data directory
pub fn database_path(config: &AppConfig) -> PathBuf {
    config.data_dir.join(SQLITE_DB_FILENAME)
}

fn journal_connect_options(config: &AppConfig) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(database_path(config))
        .create_if_missing(true)
        .busy_timeout(config.storage_timeout)
        .journal_mode(SqliteJournalMode::Wal)
}

/// Open the journal database, migrating it first.
///
/// Migrations run on a single connection that is closed before the shared
/// pool opens, so no pooled connection starts on an older schema.
pub async fn open_journal_pool(config: &AppConfig) -> Result<SqlitePool> {
    let options = journal_connect_options(config);
    tracing::info!("Opening journal database at: {:?}", database_path(config));

    tokio::fs::create_dir_all(&config.data_dir).await?;

    let migrator = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options.clone())
        .await?;
    initialize_database(&migrator).await?;
    migrator.close().await;

    let pool = SqlitePoolOptions::new()
        .max_connections(SQLITE_POOL_SIZE)
        .connect_with(options)
        .await?;

    tracing::info!(
        "Journal database ready (busy timeout {:?})",
        config.storage_timeout
    );

    Ok(pool)
}
