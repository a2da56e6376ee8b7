//! Directory-backed [`KeyValueStore`]: one file per key under `store/`.

use std::path::{Path, PathBuf};

use achtester_core::{Error as CoreError, KeyValueStore, Result as CoreResult};

use super::atomic::write_bytes_atomic;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CoreResult<PathBuf> {
        if !is_valid_key(key) {
            return Err(CoreError::Store(format!(
                "invalid key '{key}': use letters, digits, '_' or '-'"
            )));
        }
        Ok(self.dir.join(key))
    }
}

/// Keys double as file names, so they are limited to `[A-Za-z0-9_-]`.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CoreError::Store(format!("read {key}: {err}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let path = self.path_for(key)?;
        write_bytes_atomic(&path, value.as_bytes())
            .map_err(|err| CoreError::Store(format!("write {key}: {err}")))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CoreError::Store(format!("remove {key}: {err}"))),
        }
    }

    fn list_keys(&self) -> CoreResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CoreError::Store(format!("list: {err}"))),
        };
        let mut keys: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_valid_key(name))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use achtester_core::{ImportOutcome, SchemaCatalog};

    fn temp_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("achtester-store-{}", uuid::Uuid::new_v4())))
    }

    #[test]
    fn round_trips_values_and_lists_keys() {
        let store = temp_store();
        assert!(store.list_keys().expect("empty list").is_empty());

        store.set("tableNames", "[\"checks\"]").expect("set");
        store.set("schema_checks", "CREATE TABLE checks (id INT)").expect("set");
        assert_eq!(
            store.get("tableNames").expect("get").as_deref(),
            Some("[\"checks\"]")
        );
        assert_eq!(store.list_keys().expect("list"), vec!["schema_checks", "tableNames"]);

        store.remove("tableNames").expect("remove");
        store.remove("tableNames").expect("remove twice");
        assert_eq!(store.get("tableNames").expect("get"), None);

        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn rejects_keys_that_are_not_plain_names() {
        let store = temp_store();
        assert!(matches!(store.set("../escape", "x"), Err(CoreError::Store(_))));
        assert!(matches!(store.get("a.b"), Err(CoreError::Store(_))));
    }

    #[test]
    fn catalog_persists_through_files() {
        let store = temp_store();
        let dir = store.dir().to_path_buf();
        let catalog = SchemaCatalog::new(store);
        let outcome = catalog
            .import_schema("CREATE TABLE checks (check_number INT)", false)
            .expect("import");
        assert!(matches!(outcome, ImportOutcome::Saved { .. }));

        let reopened = SchemaCatalog::new(FileStore::new(&dir));
        assert_eq!(reopened.list_schemas().expect("list"), vec!["checks"]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
