use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the persistence adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode entries for user {key}: {source}")]
    EncodeEntries {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Raised by `MemoryStorage` when a write failure has been injected.
    #[error("write to {0} rejected")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("task {0} not found")]
    TaskNotFound(u32),

    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

pub type Result<T> = std::result::Result<T, TaskError>;
