// crates/db/src/lib.rs
//! Persistent catalog for proman: a bucketed record store in a single
//! SQLite file, plus the reconciliation pass that keeps the `projects`
//! bucket in step with the filesystem.

mod migrations;
mod queries;
pub mod store;
pub mod sync;

pub use store::{Bucket, Record, UpsertOutcome};
pub use sync::{sync_projects, SyncError, SyncReport};

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqliteLockingMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to determine config directory")]
    NoConfigDir,

    #[error("Failed to create database directory: {0}")]
    CreateDir(#[from] std::io::Error),

    #[error("Unable to decode {bucket} record {key}: {source}")]
    Decode {
        bucket: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to encode {bucket} record {key}: {source}")]
    Encode {
        bucket: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no records found in {bucket}")]
    NoRecords { bucket: &'static str },

    #[error("{field} is required to upsert into {bucket}")]
    MissingRequiredField {
        bucket: &'static str,
        field: &'static str,
    },
}

impl DbError {
    /// `NoRecords` is an expected outcome callers branch on, not a failure.
    pub fn is_no_records(&self) -> bool {
        matches!(self, Self::NoRecords { .. })
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Main database handle wrapping a single-connection SQLite pool.
///
/// The one connection serializes every store operation, and the file is
/// held in exclusive locking mode so no other process can open the store
/// while this handle is alive.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl Database {
    /// Open (or create) the store at the given path and run migrations.
    pub async fn new(path: &Path) -> DbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .locking_mode(SqliteLockingMode::Exclusive)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = Self::single_connection_pool()
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            db_path: path.to_owned(),
        };
        db.run_migrations().await?;

        info!("Store opened at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory store (for testing).
    pub async fn new_in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = Self::single_connection_pool()
            .connect_with(options)
            .await?;
        let db = Self {
            pool,
            db_path: PathBuf::new(),
        };
        db.run_migrations().await?;
        Ok(db)
    }

    // The connection must never be recycled: an in-memory store would be
    // lost with it, and a file store would drop its exclusive lock.
    fn single_connection_pool() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    }

    /// Run all inline migrations.
    ///
    /// Uses a `_migrations` table to track which migrations have already been
    /// applied, so each statement is only executed once.
    async fn run_migrations(&self) -> DbResult<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS _migrations (version INTEGER PRIMARY KEY)")
            .execute(&self.pool)
            .await?;

        let row: (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM _migrations")
            .fetch_one(&self.pool)
            .await?;
        let current_version = row.0 as usize;

        for (i, migration) in migrations::MIGRATIONS.iter().enumerate() {
            let version = i + 1; // 1-based
            if version > current_version {
                let mut tx = self.pool.begin().await?;
                sqlx::query(migration).execute(&mut *tx).await?;
                sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
                    .bind(version as i64)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
            }
        }

        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the path to the database file.
    /// Returns an empty path for in-memory databases.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Close the pool, releasing the file lock. Clones of this handle stop
    /// working as well.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Store closed");
    }
}

/// Returns the default store path: `<config_dir>/proman/store.db`
pub fn default_db_path() -> DbResult<PathBuf> {
    proman_core::paths::store_path().ok_or(DbError::NoConfigDir)
}
