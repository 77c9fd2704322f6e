//! Storage traits and error types
//!
//! This module defines the trait interface for durable handle stores and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Handle store lock was poisoned by a panicking writer")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only durable record of discovered handles
///
/// Implementations are not required to deduplicate; the `DedupSink` is the
/// only writer and never appends a handle twice.
pub trait HandleStore: Send {
    /// Reads every handle recorded so far, in storage order
    fn load_handles(&self) -> StorageResult<Vec<String>>;

    /// Durably appends one handle
    ///
    /// The record must be flushed to the underlying storage before this
    /// returns.
    fn append_handle(&mut self, handle: &str) -> StorageResult<()>;

    /// Number of handles recorded
    fn count_handles(&self) -> StorageResult<u64>;

    /// Human-readable description used in log lines
    fn describe(&self) -> String;
}
