//! SQLite-backed key-value storage.
//!
//! The snapshot document lives under a single key in the `kv` table of
//! `focus-engine.db` inside the data directory.

use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use super::data_dir;
use super::snapshot::{Snapshot, SnapshotStore, SNAPSHOT_KEY};
use crate::error::{DatabaseError, Result};

/// SQLite database holding the persisted snapshot.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/focus-engine.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focus-engine.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SnapshotStore for Database {
    fn load(&self) -> Result<Option<Snapshot>> {
        match self.kv_get(SNAPSHOT_KEY)? {
            Some(raw) => Snapshot::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let raw = snapshot.to_json()?;
        self.kv_set(SNAPSHOT_KEY, &raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.kv_delete(SNAPSHOT_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focus-engine.db");

        {
            let db = Database::open_at(&path).unwrap();
            let mut snapshot = Snapshot::default();
            let day = snapshot
                .plan
                .add_day("Mon", NaiveDate::from_ymd_opt(2026, 3, 30))
                .unwrap();
            snapshot.plan.add_task(&day.id, "Quant", "Ratios", 30).unwrap();
            db.save(&snapshot).unwrap();
        }

        let db = Database::open_at(&path).unwrap();
        let loaded = db.load().unwrap().unwrap();
        assert_eq!(loaded.plan.days().len(), 1);
        assert_eq!(loaded.plan.tasks()[0].topic, "Ratios");
    }

    #[test]
    fn clear_forgets_snapshot() {
        let db = Database::open_memory().unwrap();
        db.save(&Snapshot::default()).unwrap();
        db.clear().unwrap();
        assert!(db.load().unwrap().is_none());
    }
}
