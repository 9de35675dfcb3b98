//! Database schema and migrations
//!
//! This module handles database initialization and schema migrations.
//! The only table the journal needs is a key-value table holding the
//! serialized trip collection, one row per storage key.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Initialize database with schema
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Initializing database schema");

    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version: i32 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(pool)
            .await?;

    tracing::debug!("Current schema version: {}", current_version);

    apply_migrations(pool, current_version).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn apply_migrations(pool: &SqlitePool, current_version: i32) -> Result<()> {
    let pending = MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > current_version);

    for (version, sql) in pending {
        tracing::info!("Applying migration {}", version);

        // Each migration commits or rolls back as a whole
        let mut tx = pool.begin().await?;

        for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
    }

    Ok(())
}

const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("migrations/001_kv_store.sql"))];
