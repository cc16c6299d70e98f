// crates/core/src/resolve.rs
//! User-supplied directory resolution.
//!
//! Expands `~`, makes the path absolute against the working directory,
//! collapses `.`/`..` lexically and checks that a directory is there.

use crate::error::ResolveError;
use std::path::{Component, Path, PathBuf};

/// Resolve `raw` into an absolute path to an existing directory.
///
/// Only a bare `~` or a leading `~/` is expanded; `~user` forms and `~`
/// elsewhere in the path are taken literally.
///
/// # Errors
/// - `ResolveError::Blank` for an empty string
/// - `ResolveError::NotFound` if nothing exists at the resolved path
/// - `ResolveError::NotADirectory` if something other than a directory does
pub fn resolve_directory(raw: &str) -> Result<PathBuf, ResolveError> {
    if raw.is_empty() {
        return Err(ResolveError::Blank);
    }

    let expanded = expand_home(raw)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map_err(ResolveError::WorkingDir)?
            .join(expanded)
    };
    let resolved = normalize_lexically(&absolute);

    let metadata = std::fs::metadata(&resolved).map_err(|e| ResolveError::io(&resolved, e))?;
    if !metadata.is_dir() {
        return Err(ResolveError::NotADirectory { path: resolved });
    }

    Ok(resolved)
}

fn expand_home(raw: &str) -> Result<PathBuf, ResolveError> {
    if raw == "~" {
        return dirs::home_dir().ok_or(ResolveError::HomeDirNotFound);
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ResolveError::HomeDirNotFound)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Collapse `.` and `..` without touching the filesystem (symlinks are not
/// followed). `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
