//! Deduplicating sink for discovered handles
//!
//! The sink owns the in-memory set of known handles together with the
//! durable store. Both live behind one mutex, so the membership check, the
//! durable append and the set insertion form a single critical section.

use crate::storage::traits::{HandleStore, StorageError, StorageResult};
use crate::url::Handle;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

struct SinkState {
    known: HashSet<Handle>,
    store: Box<dyn HandleStore>,
}

/// Concurrency-safe, durable record of every handle ever seen
pub struct DedupSink {
    state: Mutex<SinkState>,
}

impl DedupSink {
    /// Wraps a store, preloading every handle it already holds
    ///
    /// Stored lines that are not valid handles are skipped with a warning.
    pub fn open(store: Box<dyn HandleStore>) -> StorageResult<Self> {
        let mut known = HashSet::new();
        for raw in store.load_handles()? {
            match Handle::new(&raw) {
                Some(handle) => {
                    known.insert(handle);
                }
                None => tracing::warn!("Ignoring malformed stored handle '{}'", raw),
            }
        }

        tracing::info!(
            "Loaded {} known handles from {}",
            known.len(),
            store.describe()
        );

        Ok(Self {
            state: Mutex::new(SinkState { known, store }),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, SinkState>> {
        self.state.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Records a handle unless it is already known
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The handle was new and has been durably appended
    /// * `Ok(false)` - The handle was already known; nothing was written
    /// * `Err(StorageError)` - The append failed; the handle stays unknown
    pub fn record_if_new(&self, handle: &Handle) -> StorageResult<bool> {
        let mut state = self.lock()?;

        if state.known.contains(handle) {
            return Ok(false);
        }

        state.store.append_handle(handle.as_str())?;
        state.known.insert(handle.clone());
        tracing::debug!("Added new user: {}", handle);

        Ok(true)
    }

    pub fn contains(&self, handle: &Handle) -> StorageResult<bool> {
        Ok(self.lock()?.known.contains(handle))
    }

    /// Number of known handles, including those loaded at startup
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.lock()?.known.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}
