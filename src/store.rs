use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

use crate::error::StoreError;
use crate::workout::{Workout, WorkoutRecord};

/// Key the workout collection is stored under.
pub const WORKOUTS_KEY: &str = "workouts";

/// String-keyed storage medium for the workout collection.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed key-value table
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional();

        match value {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, err = %e, "failed to read stored value");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// In-memory store, used by tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Saves and loads the whole workout collection under [`WORKOUTS_KEY`].
#[derive(Debug)]
pub struct WorkoutRepository<S> {
    store: S,
}

impl<S: KeyValueStore> WorkoutRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replace the stored collection with `workouts`, in order.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), StoreError> {
        let records: Vec<WorkoutRecord> = workouts.iter().map(Workout::to_record).collect();
        let json = serde_json::to_string(&records)?;
        self.store.set(WORKOUTS_KEY, &json)?;
        tracing::debug!(count = records.len(), "saved workouts");
        Ok(())
    }

    /// Stored records, or `None` when nothing is stored or the value is not a
    /// JSON array. Elements that do not deserialize are skipped one by one.
    pub fn load(&self) -> Option<Vec<WorkoutRecord>> {
        let raw = self.store.get(WORKOUTS_KEY)?;
        let values = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(err = %e, "stored workouts are unreadable; starting empty");
                return None;
            }
        };
        let total = values.len();
        let records: Vec<WorkoutRecord> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(index, err = %e, "skipping unreadable stored workout");
                    None
                }
            })
            .collect();
        tracing::debug!(count = records.len(), skipped = total - records.len(), "loaded workouts");
        Some(records)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(WORKOUTS_KEY)?;
        tracing::info!("cleared stored workouts");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Coords;
    use tempfile::tempdir;

    fn sample() -> Vec<Workout> {
        vec![
            Workout::running(Coords::new(39.0, -12.0), 5.2, 24.0, 178.0).unwrap(),
            Workout::cycling(Coords::new(39.1, -12.1), 27.0, 95.0, 523.0).unwrap(),
            Workout::cycling(Coords::new(39.2, -12.2), 10.0, 30.0, 0.0).unwrap(),
        ]
    }

    #[test]
    fn load_reproduces_saved_records_in_order() {
        let workouts = sample();
        let mut repo = WorkoutRepository::new(MemoryStore::new());

        repo.save(&workouts).unwrap();
        let loaded = repo.load().unwrap();

        let expected: Vec<WorkoutRecord> = workouts.iter().map(Workout::to_record).collect();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn save_replaces_previous_value() {
        let workouts = sample();
        let mut repo = WorkoutRepository::new(MemoryStore::new());

        repo.save(&workouts).unwrap();
        repo.save(&workouts[..1]).unwrap();

        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[test]
    fn load_absent_is_none() {
        let repo = WorkoutRepository::new(MemoryStore::new());
        assert!(repo.load().is_none());
    }

    #[test]
    fn load_corrupt_is_none() {
        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, "{not json").unwrap();
        let repo = WorkoutRepository::new(store);

        assert!(repo.load().is_none());
    }

    #[test]
    fn load_non_array_is_none() {
        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, r#"{"id":"1"}"#).unwrap();
        let repo = WorkoutRepository::new(store);

        assert!(repo.load().is_none());
    }

    #[test]
    fn load_skips_only_the_unreadable_elements() {
        let mut store = MemoryStore::new();
        let raw = r#"[
            {"id":"0000000001","date":"2024-03-05T10:00:00+00:00","coords":[39.0,-12.0],
             "distance":5.2,"duration":24,"type":"running","description":"Running on March 5",
             "cadence":178,"pace":4.62},
            {"id":"0000000002","date":"2024-03-06T10:00:00+00:00","coords":[39.1,-12.1],
             "distance":3,"duration":40,"type":"walking","description":"Walking on March 6"},
            "not a workout"
        ]"#;
        store.set(WORKOUTS_KEY, raw).unwrap();
        let repo = WorkoutRepository::new(store);

        let records = repo.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "0000000001");
    }

    #[test]
    fn clear_removes_value() {
        let mut repo = WorkoutRepository::new(MemoryStore::new());
        repo.save(&sample()).unwrap();
        repo.clear().unwrap();

        assert!(repo.load().is_none());
        assert!(repo.store().get(WORKOUTS_KEY).is_none());
    }

    #[test]
    fn sqlite_store_persists_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("mapty.db");
        let workouts = sample();

        {
            let mut repo = WorkoutRepository::new(SqliteStore::open(&path).unwrap());
            repo.save(&workouts).unwrap();
        }

        let repo = WorkoutRepository::new(SqliteStore::open(&path).unwrap());
        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].id, workouts[0].id());
    }

    #[test]
    fn sqlite_store_set_get_remove() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("k"), None);

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k"), Some("two".to_string()));

        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }
}
