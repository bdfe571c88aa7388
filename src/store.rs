use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::row::Row;

/// Durable keyed collection of named tables.
///
/// The executor works entirely through this trait: every operation loads a
/// whole table, mutates it in memory, and saves the whole table back. There
/// is no locking and no partial write; two concurrent writers to the same
/// table can silently lose one side's changes, an inherited limitation of
/// the load/mutate/save cycle.
pub trait TableStore {
    /// Returns the full contents of `name`, or [Error::TableNotFound].
    fn load(&self, name: &str) -> Result<Vec<Row>>;

    /// Replaces the full contents of `name`, creating the table if absent.
    fn save(&mut self, name: &str, rows: &[Row]) -> Result<()>;

    fn exists(&self, name: &str) -> bool;

    /// All table names, sorted for deterministic output.
    fn list(&self) -> Vec<String>;

    /// Removes `name`; `true` if something was actually removed.
    fn delete(&mut self, name: &str) -> Result<bool>;
}

/// File-backed store: one JSON document per table, `<dir>/<name>.json`,
/// each an array of flat row objects.
///
/// The directory is created lazily on the first save, so a freshly
/// constructed store over a missing directory simply has no tables.
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl TableStore for JsonDirStore {
    fn load(&self, name: &str) -> Result<Vec<Row>> {
        let text = match fs::read_to_string(self.table_path(name)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::TableNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&mut self, name: &str, rows: &[Row]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let document = serde_json::to_string_pretty(rows)?;
        fs::write(self.table_path(name), document)?;
        debug!(table = name, rows = rows.len(), "table saved");
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.table_path(name).is_file()
    }

    fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    Some(path.file_stem()?.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        match fs::remove_file(self.table_path(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, used by the test suite and as a throwaway scratch
/// database. Same contract as [JsonDirStore], nothing touches disk.
#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Vec<Row>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    fn save(&mut self, name: &str, rows: &[Row]) -> Result<()> {
        self.tables.insert(name.to_string(), rows.to_vec());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        Ok(self.tables.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::from_iter([
                ("id".to_string(), Value::Int(1)),
                ("name".to_string(), Value::Text("Alice".into())),
            ]),
            Row::from_iter([("id".to_string(), Value::Int(2))]),
        ]
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(!store.exists("users"));
        assert!(matches!(
            store.load("users"),
            Err(Error::TableNotFound(name)) if name == "users"
        ));

        store.save("users", &sample_rows()).unwrap();
        assert!(store.exists("users"));
        assert_eq!(store.load("users").unwrap(), sample_rows());
        assert_eq!(store.list(), vec!["users"]);

        assert!(store.delete("users").unwrap());
        assert!(!store.delete("users").unwrap());
        assert!(!store.exists("users"));
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path());

        assert_eq!(store.list(), Vec::<String>::new());
        assert!(matches!(
            store.load("users"),
            Err(Error::TableNotFound(_))
        ));

        store.save("users", &sample_rows()).unwrap();
        store.save("empty", &[]).unwrap();

        assert!(store.exists("users"));
        assert_eq!(store.load("users").unwrap(), sample_rows());
        assert_eq!(store.load("empty").unwrap(), Vec::<Row>::new());
        assert_eq!(store.list(), vec!["empty", "users"]);
    }

    #[test]
    fn test_json_store_save_replaces_whole_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path());

        store.save("t", &sample_rows()).unwrap();
        store.save("t", &[]).unwrap();
        assert_eq!(store.load("t").unwrap(), Vec::<Row>::new());
    }

    #[test]
    fn test_json_store_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path());

        store.save("t", &[]).unwrap();
        assert!(store.delete("t").unwrap());
        assert!(!store.delete("t").unwrap());
        assert_eq!(store.list(), Vec::<String>::new());
    }

    #[test]
    fn test_json_store_document_is_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path());
        store.save("users", &sample_rows()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["name"], serde_json::json!("Alice"));
        assert_eq!(parsed[1]["id"], serde_json::json!(2));
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let store = JsonDirStore::new("/nonexistent/minisql-test-dir");
        assert_eq!(store.list(), Vec::<String>::new());
        assert!(!store.exists("t"));
    }
}
