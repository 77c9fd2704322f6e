//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the `HandleStore`
//! trait. Every append runs in autocommit mode, so a recorded handle is
//! durable as soon as `append_handle` returns.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{HandleStore, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQLite handle store
pub struct SqliteHandleStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteHandleStore {
    /// Opens or creates the database at the given path
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Timestamp at which a handle was recorded
    pub fn discovered_at(&self, handle: &str) -> StorageResult<Option<String>> {
        use rusqlite::OptionalExtension;

        let at = self
            .conn
            .query_row(
                "SELECT discovered_at FROM handles WHERE handle = ?1",
                params![handle],
                |row| row.get(0),
            )
            .optional()?;
        Ok(at)
    }
}

impl HandleStore for SqliteHandleStore {
    fn load_handles(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT handle FROM handles ORDER BY id")?;
        let handles = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(handles)
    }

    fn append_handle(&mut self, handle: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO handles (handle, discovered_at) VALUES (?1, ?2)",
            params![handle, now],
        )?;
        Ok(())
    }

    fn count_handles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM handles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite {}", path.display()),
            None => "sqlite :memory:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_in_memory() {
        let store = SqliteHandleStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_append_and_load_preserves_order() {
        let mut store = SqliteHandleStore::open_in_memory().unwrap();
        store.append_handle("carol").unwrap();
        store.append_handle("alice").unwrap();
        store.append_handle("bob").unwrap();

        assert_eq!(store.load_handles().unwrap(), vec!["carol", "alice", "bob"]);
        assert_eq!(store.count_handles().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_append_keeps_single_row() {
        let mut store = SqliteHandleStore::open_in_memory().unwrap();
        store.append_handle("alice").unwrap();
        store.append_handle("alice").unwrap();
        assert_eq!(store.count_handles().unwrap(), 1);
    }

    #[test]
    fn test_discovered_at_is_recorded() {
        let mut store = SqliteHandleStore::open_in_memory().unwrap();
        store.append_handle("alice").unwrap();

        let at = store.discovered_at("alice").unwrap().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&at).is_ok());
        assert!(store.discovered_at("nobody").unwrap().is_none());
    }

    #[test]
    fn test_file_database_syncs_every_commit() {
        let dir = TempDir::new().unwrap();
        let store = SqliteHandleStore::open(&dir.path().join("users.db")).unwrap();

        let synchronous: i64 = store
            .conn
            .query_row("PRAGMA synchronous", [], |row| row.get(0))
            .unwrap();
        // 2 = FULL
        assert_eq!(synchronous, 2);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.db");

        {
            let mut store = SqliteHandleStore::open(&path).unwrap();
            store.append_handle("alice").unwrap();
        }

        let store = SqliteHandleStore::open(&path).unwrap();
        assert_eq!(store.load_handles().unwrap(), vec!["alice"]);
        assert!(store.describe().starts_with("sqlite "));
    }
}
