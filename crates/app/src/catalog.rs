// crates/app/src/catalog.rs
//! Request/response services the presentation layer talks to.
//!
//! Each catalog keeps the last list it produced so that `get_all(false)` can
//! answer without touching disk or the store.

use crate::error::AppResult;
use proman_core::ConfigFile;
use proman_db::{sync_projects, Database, DbError, SyncReport, UpsertOutcome};
use proman_types::{Editor, EditorPatch, Project};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Projects under the configured root, kept in step with the filesystem.
pub struct ProjectCatalog {
    db: Database,
    config: ConfigFile,
    /// Held for the whole of a sync so passes never overlap.
    sync_lock: Mutex<()>,
    cache: RwLock<Vec<Project>>,
}

impl ProjectCatalog {
    pub fn new(db: Database, config: ConfigFile) -> Self {
        Self {
            db,
            config,
            sync_lock: Mutex::new(()),
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Re-read the configuration, reconcile the project root with the store
    /// and replace the cached list.
    ///
    /// On error the cache keeps its previous contents.
    pub async fn sync(&self) -> AppResult<SyncReport> {
        let _guard = self.sync_lock.lock().await;

        let config = self.config.load()?;
        let normalizer = config.url_normalizer();
        debug!(root = %config.project_directory, hosts = ?normalizer, "Syncing projects");

        let report = sync_projects(&self.db, &config.project_directory, &normalizer).await?;
        *self.cache.write().await = report.projects.clone();
        Ok(report)
    }

    /// Current projects. With `refresh` a sync runs first; without it the
    /// cached list from the last sync is returned.
    pub async fn get_all(&self, refresh: bool) -> AppResult<Vec<Project>> {
        if refresh {
            return Ok(self.sync().await?.projects);
        }
        Ok(self.cache.read().await.clone())
    }

    pub async fn get_project(&self, path: &str) -> AppResult<Option<Project>> {
        Ok(self.db.get_project(path).await?)
    }
}

/// Editors the user can open projects with.
pub struct EditorCatalog {
    db: Database,
    cache: RwLock<Vec<Editor>>,
}

impl EditorCatalog {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Current editors. With `refresh` the list is reloaded from the store;
    /// an empty bucket yields an empty list.
    pub async fn get_all(&self, refresh: bool) -> AppResult<Vec<Editor>> {
        if refresh {
            let editors = load_editors(&self.db).await?;
            *self.cache.write().await = editors.clone();
            return Ok(editors);
        }
        Ok(self.cache.read().await.clone())
    }

    pub async fn get_editor(&self, name: &str) -> AppResult<Option<Editor>> {
        Ok(self.db.get_editor(name).await?)
    }

    /// Create or merge an editor, then reload the cached list.
    ///
    /// # Errors
    /// `DbError::MissingRequiredField` if the patch lacks `path` or `name`.
    pub async fn upsert_editor(&self, patch: &EditorPatch) -> AppResult<UpsertOutcome> {
        let outcome = self.db.upsert_editor(patch).await?;
        self.get_all(true).await?;
        Ok(outcome)
    }

    /// Remove an editor by name, then reload the cached list. Removing an
    /// unknown editor is not an error.
    pub async fn delete_editor(&self, name: &str) -> AppResult<bool> {
        let removed = self.db.delete_editor(name).await?;
        self.get_all(true).await?;
        Ok(removed)
    }
}

async fn load_editors(db: &Database) -> Result<Vec<Editor>, DbError> {
    match db.get_all_editors().await {
        Ok(editors) => Ok(editors),
        Err(e) if e.is_no_records() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
