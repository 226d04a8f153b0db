//! Configuration store errors

use thiserror::Error;

/// Errors that can occur while saving, loading or deleting configurations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Name was empty after trimming
    #[error("Configuration name must not be empty")]
    EmptyName,

    /// No configuration with this id
    #[error("Configuration not found: {0}")]
    NotFound(String),

    /// Id already taken in the store
    #[error("A configuration with id '{0}' already exists")]
    DuplicateId(String),

    /// Store file could not be read or written
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Store file is not valid JSON for the expected shape
    #[error("Invalid configuration data: {0}")]
    InvalidData(#[from] serde_json::Error),
}
