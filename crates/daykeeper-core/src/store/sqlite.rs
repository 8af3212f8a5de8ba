//! SQLite-backed document store.
//!
//! One table of JSON documents keyed by path, with a revision counter
//! bumped on every write. The connection sits behind an async mutex;
//! queries are short-lived local I/O.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use tokio::sync::Mutex;

use super::{data_dir, DocPath, DocumentStore, VersionedDoc, WriteExpectation};
use crate::error::StoreError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `~/.config/daykeeper/daykeeper.db`, creating the
    /// file and schema if needed.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("daykeeper.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn migrate(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                path     TEXT PRIMARY KEY,
                body     TEXT NOT NULL,
                revision INTEGER NOT NULL DEFAULT 1
            );",
        )?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, path: &DocPath) -> Result<Option<VersionedDoc>, StoreError> {
        let conn = self.conn.lock().await;
        let row: Option<(String, u64)> = conn
            .query_row(
                "SELECT body, revision FROM documents WHERE path = ?1",
                params![path.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((body, revision)) => {
                let body: Value = serde_json::from_str(&body)?;
                Ok(Some(VersionedDoc { body, revision }))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        path: &DocPath,
        body: Value,
        expect: WriteExpectation,
    ) -> Result<u64, StoreError> {
        let conn = self.conn.lock().await;
        let current: Option<u64> = conn
            .query_row(
                "SELECT revision FROM documents WHERE path = ?1",
                params![path.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let conflict = || StoreError::RevisionConflict {
            path: path.as_str().to_string(),
        };
        let new_revision = match (expect, current) {
            (WriteExpectation::Any, current) => current.unwrap_or(0) + 1,
            (WriteExpectation::Absent, None) => 1,
            (WriteExpectation::Absent, Some(_)) => return Err(conflict()),
            (WriteExpectation::Revision(expected), Some(current)) if current == expected => {
                current + 1
            }
            (WriteExpectation::Revision(_), _) => return Err(conflict()),
        };

        let body = serde_json::to_string(&body)?;
        conn.execute(
            "INSERT OR REPLACE INTO documents (path, body, revision) VALUES (?1, ?2, ?3)",
            params![path.as_str(), body, new_revision],
        )?;
        Ok(new_revision)
    }
}
