//! Error types for storage access

use thiserror::Error;

/// Failure talking to the key-value store.
///
/// Callers above the storage layer log these and carry on: a lost write only
/// costs persistence, never the running game.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend (private browsing, storage disabled, no window)
    #[error("storage unavailable")]
    Unavailable,

    /// The backend rejected the write (quota exceeded, security error)
    #[error("failed to write key `{key}`: {reason}")]
    Write { key: String, reason: String },

    /// Value could not be encoded
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}
