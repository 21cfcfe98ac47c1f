use super::{KeyValueStore, StoreError};
use rusqlite::OptionalExtension;
use std::fs;
use std::path::{Path, PathBuf};

const DB_FILE: &str = "anianglia.db";

/// Native durable store: one `settings` table of JSON strings keyed by name.
pub struct SqliteStore {
    conn: rusqlite::Connection,
}

impl SqliteStore {
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = data_dir().ok_or_else(|| {
            StoreError::Unavailable("could not resolve a data directory".to_string())
        })?;
        Self::open(dir.join(DB_FILE))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open(path.as_ref()).map_err(|e| {
            StoreError::Unavailable(format!("Failed to open database: {}", e))
        })?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: rusqlite::Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [key],
                |row: &rusqlite::Row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Read {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                [key, value],
            )
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", [key])
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

fn data_dir() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("anianglia");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get_item("guiSettings").unwrap(), None);
    }

    #[test]
    fn set_item_replaces_previous_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_item("endpointUrl", "\"api.anixart.app\"").unwrap();
        store.set_item("endpointUrl", "\"api-s.anixsekai.com\"").unwrap();
        assert_eq!(
            store.get_item("endpointUrl").unwrap().as_deref(),
            Some("\"api-s.anixsekai.com\"")
        );
    }

    #[test]
    fn remove_item_deletes_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_item("first_run", "true").unwrap();
        store.remove_item("first_run").unwrap();
        assert_eq!(store.get_item("first_run").unwrap(), None);
    }
}
