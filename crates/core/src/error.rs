// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when resolving a user-supplied directory
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("target cannot be blank")]
    Blank,

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("target directory does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("target is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading version-control metadata.
///
/// A directory without any VCS metadata is not an error.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Unreadable git metadata in {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
}

/// Errors that can occur while scanning a project root
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid project directory: {0}")]
    InvalidRoot(#[from] ResolveError),

    #[error("Cannot access project directory: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error("Inspection task for {path} failed: {message}")]
    TaskFailed { path: PathBuf, message: String },
}

/// Errors that can occur when reading the configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine configuration directory")]
    NoConfigDir,

    #[error("IO error accessing config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ResolveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

impl VcsError {
    pub fn read(path: impl Into<PathBuf>, source: git2::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

impl DiscoveryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
