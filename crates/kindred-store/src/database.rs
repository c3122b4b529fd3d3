//! Database connection management and the raw key/value primitives.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees
//! that migrations are run before any other operation.  Higher layers never
//! touch SQL; they go through the typed helpers in [`crate::threads`] and
//! [`crate::cache`], which in turn use the namespaced `get`/`put`/`remove`
//! primitives defined here.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Namespace for per-thread chat records and the conversation list.
pub const NS_CHAT: &str = "chat";
/// Namespace for cached fallback copies of remote state.
pub const NS_CACHE: &str = "cache";

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data
    /// directory, e.g. `~/.local/share/kindred/kindred.db` on Linux.
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("io", "kindred", "kindred").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("kindred.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.  Used by tests and as a scratch store
    /// when no durable directory is available.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Recommended SQLite settings.
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    // -- key/value primitives ------------------------------------------------

    /// Read and decode the record at `(ns, key)`, if present.
    pub fn get<T: DeserializeOwned>(&self, ns: &str, key: &str) -> Result<Option<T>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT json FROM kv WHERE ns = ?1 AND key = ?2",
                params![ns, key],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Encode and write `value` at `(ns, key)`, replacing any prior record.
    pub fn put<T: Serialize>(&self, ns: &str, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (ns, key, json) VALUES (?1, ?2, ?3)",
            params![ns, key, json],
        )?;
        Ok(())
    }

    /// Remove the record at `(ns, key)`.  Returns whether one existed.
    pub fn remove(&self, ns: &str, key: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM kv WHERE ns = ?1 AND key = ?2",
            params![ns, key],
        )?;
        Ok(affected > 0)
    }

    /// Wipe every record.  Logout teardown.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM kv", [])?;
        tracing::info!("local store cleared");
        Ok(())
    }
}
