use crate::{
    error::{Result, TrellisError},
    storage::Storage,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex};

/// SQLite-backed key-value slot, one row per key
pub struct SqliteStorage {
    connection: Mutex<Connection>,
}

impl SqliteStorage {
    const SCHEMA: &'static str =
        "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)";

    /// Opens (or creates) a database file
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(database_path).map_err(sqlite_error)?;
        Self::with_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(sqlite_error)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        connection
            .execute(Self::SCHEMA, [])
            .map_err(sqlite_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| TrellisError::StorageError("sqlite connection poisoned".to_string()))
    }
}

fn sqlite_error(e: rusqlite::Error) -> TrellisError {
    TrellisError::StorageError(e.to_string())
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(sqlite_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.connection()?
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(sqlite_error)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.connection()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(sqlite_error)?;
        Ok(())
    }
}
