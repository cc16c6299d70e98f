// crates/db/src/sync.rs
//! Reconciliation between the project root on disk and the `projects`
//! bucket.
//!
//! A sync scans the root, writing each discovered project through to the
//! store as soon as it is inspected, then deletes every stored project
//! whose directory was not seen by the scan.

use crate::{Database, DbError, UpsertOutcome};
use async_trait::async_trait;
use proman_core::{scan_projects, DiscoveryError, RepositoryUrlNormalizer, ScanEntry, ScanObserver};
use proman_types::{Project, ProjectPatch};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Project discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Project store failed: {0}")]
    Database(#[from] DbError),
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// The resolved project root that was scanned.
    pub root: PathBuf,
    /// Stored projects still present on disk, in scan order.
    pub projects: Vec<Project>,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub upsert_failures: usize,
    /// Retained projects whose stored record could not be decoded.
    pub unreadable: usize,
    pub deleted: usize,
    pub delete_failures: usize,
}

/// Upserts every scanned entry as it arrives. Failures are counted, never
/// propagated.
struct WriteThrough<'a> {
    db: &'a Database,
    created: AtomicUsize,
    updated: AtomicUsize,
    unchanged: AtomicUsize,
    failed: AtomicUsize,
}

impl<'a> WriteThrough<'a> {
    fn new(db: &'a Database) -> Self {
        Self {
            db,
            created: AtomicUsize::new(0),
            updated: AtomicUsize::new(0),
            unchanged: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ScanObserver for WriteThrough<'_> {
    async fn entry_discovered(&self, entry: &ScanEntry) {
        let patch = ProjectPatch::scanned(
            entry.path.clone(),
            entry.remotes.clone(),
            entry.repository_urls.clone(),
        );
        let counter = match self.db.upsert_project(&patch).await {
            Ok(UpsertOutcome::Created) => &self.created,
            Ok(UpsertOutcome::Updated) => &self.updated,
            Ok(UpsertOutcome::Unchanged) => &self.unchanged,
            Err(e) => {
                warn!(path = %entry.path, error = %e, "Failed to save project");
                &self.failed
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Scan `root` and bring the `projects` bucket in line with what is on disk.
///
/// User-owned fields (`open_with`, `hide`) of surviving projects are never
/// touched. A failed upsert or delete is logged and left for the next sync.
///
/// Stale projects are found by key, so a record that can no longer be
/// decoded is still removed once its directory is gone. A retained record
/// that cannot be decoded is logged, counted and left out of the report.
///
/// # Errors
/// - `SyncError::Discovery` if the root is invalid or a project's VCS
///   metadata cannot be read; projects already written stay written
/// - `SyncError::Database` if the stored project keys cannot be listed
pub async fn sync_projects(
    db: &Database,
    root: &str,
    normalizer: &RepositoryUrlNormalizer,
) -> Result<SyncReport, SyncError> {
    let writer = WriteThrough::new(db);
    let outcome = scan_projects(root, normalizer, &writer).await?;

    // Keys only: a record that no longer decodes must still be deletable.
    let stored: BTreeSet<String> = db.keys::<Project>().await?.into_iter().collect();
    let scanned: HashSet<&str> = outcome.paths().collect();

    let mut projects = Vec::with_capacity(scanned.len());
    let mut unreadable = 0;
    for path in outcome.paths().filter(|p| stored.contains(*p)) {
        match db.get_project(path).await {
            Ok(Some(project)) => projects.push(project),
            Ok(None) => {}
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to read project");
                unreadable += 1;
            }
        }
    }

    let mut deleted = 0;
    let mut delete_failures = 0;
    for key in stored.iter().filter(|k| !scanned.contains(k.as_str())) {
        match db.delete_project(key).await {
            Ok(_) => deleted += 1,
            Err(e) => {
                warn!(path = %key, error = %e, "Failed to delete stale project");
                delete_failures += 1;
            }
        }
    }

    let report = SyncReport {
        root: outcome.root,
        projects,
        created: writer.created.into_inner(),
        updated: writer.updated.into_inner(),
        unchanged: writer.unchanged.into_inner(),
        upsert_failures: writer.failed.into_inner(),
        unreadable,
        deleted,
        delete_failures,
    };

    info!(
        root = %report.root.display(),
        projects = report.projects.len(),
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        failures = report.upsert_failures + report.unreadable + report.delete_failures,
        "Project sync complete"
    );

    Ok(report)
}
