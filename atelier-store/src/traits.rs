// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Interface for the string-keyed local store all collections persist into.
///
/// Keys hold JSON-encoded blobs; absence of a key is equivalent to an empty collection. Writes
/// are synchronous from the caller's perspective but fallible, a store may refuse a write once
/// its capacity is exhausted.
pub trait LocalStore {
    /// Get the blob stored under a key.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a blob under a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key.
    ///
    /// Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refused a write because its capacity is exhausted. Non-fatal: callers keep
    /// their in-memory state as the source of truth for the session.
    #[error("storage quota exceeded while writing key \"{0}\"")]
    QuotaExceeded(String),

    /// Error raised by the backing store implementation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A blob could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
