// crates/core/src/vcs.rs
//! Version-control remote detection.
//!
//! Only git is understood today. A directory is a repository when it holds
//! git metadata itself; parents are never searched, so a plain folder nested
//! inside someone else's checkout is reported as having no VCS.

use crate::error::VcsError;
use git2::{ConfigLevel, ErrorCode, Repository};
use std::path::Path;
use tracing::debug;

/// List every configured remote URL of the repository at `dir`.
///
/// URLs are flattened across remotes in the order they are declared in the
/// repository config; duplicates are kept.
///
/// # Errors
/// Returns `VcsError::Read` when git metadata exists but cannot be read.
/// A directory without git metadata yields `Ok(vec![])`.
pub fn inspect_remotes(dir: &Path) -> Result<Vec<String>, VcsError> {
    let repo = match Repository::open(dir) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => {
            debug!(path = %dir.display(), "Git repository not detected");
            return Ok(Vec::new());
        }
        Err(e) => return Err(VcsError::read(dir, e)),
    };

    debug!(path = %dir.display(), "Git repository detected");
    remote_urls(&repo).map_err(|e| VcsError::read(dir, e))
}

fn remote_urls(repo: &Repository) -> Result<Vec<String>, git2::Error> {
    let config = repo.config()?;
    let local = match config.open_level(ConfigLevel::Local) {
        Ok(local) => local,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut urls = Vec::new();
    local
        .entries(Some(r"^remote\..+\.url$"))?
        .for_each(|entry| {
            if let Some(url) = entry.value() {
                urls.push(url.to_string());
            }
        })?;
    Ok(urls)
}
