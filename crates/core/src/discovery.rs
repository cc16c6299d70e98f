// crates/core/src/discovery.rs
//! Project discovery under the configured project root.
//!
//! Every immediate subdirectory of the root is a project candidate. Each one
//! is inspected for git remotes, the remotes are canonicalized, and the
//! resulting [`ScanEntry`] is handed to a [`ScanObserver`] before the next
//! candidate is looked at, so callers can persist results as they arrive.

use crate::error::DiscoveryError;
use crate::repo_url::RepositoryUrlNormalizer;
use crate::resolve::resolve_directory;
use crate::vcs::inspect_remotes;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// What a scan learned about one project directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanEntry {
    /// Directory name, relative to the project root.
    pub path: String,
    pub remotes: Vec<String>,
    pub repository_urls: Vec<String>,
}

/// Result of scanning a project root.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// The absolute, resolved project root.
    pub root: PathBuf,
    /// Entries in listing order.
    pub entries: Vec<ScanEntry>,
}

impl ScanOutcome {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }
}

/// Receives each entry as soon as it has been inspected.
///
/// Implementations own their failure handling; nothing they do can abort
/// the scan.
#[async_trait]
pub trait ScanObserver: Send + Sync {
    async fn entry_discovered(&self, entry: &ScanEntry);
}

#[async_trait]
impl ScanObserver for () {
    async fn entry_discovered(&self, _entry: &ScanEntry) {}
}

/// Scan `root` without side effects.
pub async fn scan_directory(
    root: &str,
    normalizer: &RepositoryUrlNormalizer,
) -> Result<ScanOutcome, DiscoveryError> {
    scan_projects(root, normalizer, &()).await
}

/// Scan `root`, reporting each entry to `observer` as it is produced.
///
/// # Errors
/// - `DiscoveryError::InvalidRoot` if `root` does not resolve to a directory
/// - `DiscoveryError::Vcs` if any candidate has unreadable git metadata;
///   the scan stops at that candidate
pub async fn scan_projects(
    root: &str,
    normalizer: &RepositoryUrlNormalizer,
    observer: &dyn ScanObserver,
) -> Result<ScanOutcome, DiscoveryError> {
    let root = resolve_blocking(root).await?;
    let candidates = list_candidates(&root).await?;

    let mut entries = Vec::with_capacity(candidates.len());
    for name in candidates {
        let dir = root.join(&name);
        debug!(path = %dir.display(), "Searching repository git path");

        let remotes = inspect_blocking(dir).await?;
        let repository_urls = normalizer.canonicalize(&remotes);
        let entry = ScanEntry {
            path: name,
            remotes,
            repository_urls,
        };
        debug!(
            name = %entry.path,
            remotes = ?entry.remotes,
            urls = ?entry.repository_urls,
            "Found project"
        );

        observer.entry_discovered(&entry).await;
        entries.push(entry);
    }

    Ok(ScanOutcome { root, entries })
}

/// Names of the immediate subdirectories of `root`, sorted.
///
/// Symlinks are not followed and non-UTF-8 names are skipped.
pub async fn list_candidates(root: &Path) -> Result<Vec<String>, DiscoveryError> {
    let mut dir = fs::read_dir(root)
        .await
        .map_err(|e| DiscoveryError::io(root, e))?;

    let mut names = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| DiscoveryError::io(root, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| DiscoveryError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                warn!(name = ?raw, "Skipping project directory with non UTF-8 name");
            }
        }
    }

    names.sort();
    Ok(names)
}

async fn resolve_blocking(raw: &str) -> Result<PathBuf, DiscoveryError> {
    let task_raw = raw.to_owned();
    let result = tokio::task::spawn_blocking(move || resolve_directory(&task_raw))
        .await
        .map_err(|e| DiscoveryError::TaskFailed {
            path: PathBuf::from(raw),
            message: e.to_string(),
        })?;
    Ok(result?)
}

async fn inspect_blocking(dir: PathBuf) -> Result<Vec<String>, DiscoveryError> {
    let task_dir = dir.clone();
    let result = tokio::task::spawn_blocking(move || inspect_remotes(&task_dir))
        .await
        .map_err(|e| DiscoveryError::TaskFailed {
            path: dir,
            message: e.to_string(),
        })?;
    Ok(result?)
}
