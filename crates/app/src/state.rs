// crates/app/src/state.rs
//! Application state: one store handle and one configuration file, shared by
//! both catalogs for the lifetime of the process.

use crate::catalog::{EditorCatalog, ProjectCatalog};
use crate::error::AppResult;
use proman_core::ConfigFile;
use proman_db::Database;
use std::path::Path;
use tracing::info;

pub struct AppState {
    pub config: ConfigFile,
    pub db: Database,
    pub projects: ProjectCatalog,
    pub editors: EditorCatalog,
}

impl AppState {
    /// Create the configuration file if missing, open the store at
    /// `db_path` and preload the editor list.
    pub async fn open(config: ConfigFile, db_path: &Path) -> AppResult<Self> {
        config.ensure_exists()?;
        let db = Database::new(db_path).await?;
        Self::with_database(config, db).await
    }

    /// Build the state around an already opened store.
    pub async fn with_database(config: ConfigFile, db: Database) -> AppResult<Self> {
        let state = Self {
            projects: ProjectCatalog::new(db.clone(), config.clone()),
            editors: EditorCatalog::new(db.clone()),
            config,
            db,
        };

        let editors = state.editors.get_all(true).await?;
        info!(editors = editors.len(), "Loaded editors");
        Ok(state)
    }

    /// Close the store, releasing its file lock.
    pub async fn shutdown(self) {
        self.db.close().await;
    }
}
