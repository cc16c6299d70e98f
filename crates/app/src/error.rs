// crates/app/src/error.rs
use proman_core::ConfigError;
use proman_db::{DbError, SyncError};
use thiserror::Error;

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type AppResult<T> = Result<T, AppError>;
