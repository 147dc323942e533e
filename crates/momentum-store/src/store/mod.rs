//! SQLite-backed entity store.
//!
//! Split into focused submodules, one per entity kind:
//! - `habits` — habit CRUD, per-day progress, streak updates
//! - `tasks` — task CRUD and priority-ordered listing
//! - `notes` — note CRUD with category filtering
//! - `moods` — append-only mood log with trailing-window queries
//! - `achievements` — idempotent achievement unlocks
//! - `admin` — cross-user aggregates, full reset, export/import
//!
//! Failure semantics: unknown ids yield `Ok(false)` / `Ok(None)` / empty
//! collections; database failures surface as `MomentumError::Store` so
//! callers can tell "no data" from "storage unavailable".

mod achievements;
mod admin;
mod habits;
mod moods;
mod notes;
mod tasks;

pub use admin::{Snapshot, Totals};

use momentum_core::{config::StoreConfig, error::MomentumError, shellexpand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Entity store backed by SQLite. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a new store, running migrations on first use.
    pub async fn new(config: &StoreConfig) -> Result<Self, MomentumError> {
        let db_path = shellexpand(&config.db_path);

        // Ensure parent directory exists.
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MomentumError::Store(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| MomentumError::Store(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .map_err(|e| MomentumError::Store(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Store initialized at {db_path}");

        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file size in bytes.
    pub async fn db_size(&self) -> Result<u64, MomentumError> {
        let (page_count,): (i64,) = sqlx::query_as("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("pragma failed: {e}")))?;

        let (page_size,): (i64,) = sqlx::query_as("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("pragma failed: {e}")))?;

        Ok((page_count * page_size) as u64)
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), MomentumError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| MomentumError::Store(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] =
            &[("001_init", include_str!("../../migrations/001_init.sql"))];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        MomentumError::Store(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| MomentumError::Store(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    MomentumError::Store(format!("failed to record migration {name}: {e}"))
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
