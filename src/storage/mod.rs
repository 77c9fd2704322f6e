//! Storage module for persisting discovered handles
//!
//! This module handles the durable side of the crawler:
//! - The `HandleStore` trait and its file and SQLite backends
//! - The `DedupSink`, the only writer, which guarantees each handle is
//!   appended at most once across concurrent producers and across runs

mod file;
mod schema;
mod sink;
mod sqlite;
mod traits;

pub use file::FileHandleStore;
pub use sink::DedupSink;
pub use sqlite::SqliteHandleStore;
pub use traits::{HandleStore, StorageError, StorageResult};

use crate::config::{OutputConfig, StoreBackend};
use std::path::Path;

/// Opens the configured handle store
///
/// # Arguments
///
/// * `config` - Output configuration naming the backend and path
///
/// # Returns
///
/// * `Ok(Box<dyn HandleStore>)` - Store ready for appends
/// * `Err(StorageError)` - The store could not be opened for writing
pub fn open_store(config: &OutputConfig) -> StorageResult<Box<dyn HandleStore>> {
    let path = Path::new(&config.handles_path);
    let store: Box<dyn HandleStore> = match config.backend {
        StoreBackend::Csv => Box::new(FileHandleStore::open(path)?),
        StoreBackend::Sqlite => Box::new(SqliteHandleStore::open(path)?),
    };
    Ok(store)
}
