use rusqlite;
use std::env;
use std::io;
use thiserror::Error;

/// Fatal, local-side failures. Remote-side failures are represented by
/// [`crate::core::remote::RemoteError`] and never escalate to this type.
#[derive(Error, Debug)]
pub enum PromptSyncError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to initialize database: {0}")]
    DatabaseInitializationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] env::VarError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
