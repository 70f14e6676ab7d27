/// Error types for the storage layer
use thiserror::Error;

/// Storage failure. Cache callers never see these; artifact callers decide.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite operation failed
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem operation failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes were not the expected JSON
    #[error("failed to decode stored json: {0}")]
    Json(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer
    #[error("store lock poisoned")]
    Poisoned,

    /// Identifier cannot be used as a file name
    #[error("invalid artifact id: {0}")]
    InvalidId(String),
}

/// Type alias for Results using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
