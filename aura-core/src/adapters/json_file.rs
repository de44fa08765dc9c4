//! JSON file storage - one file per key in the data directory
//!
//! Values are written to a temp file and renamed over the old one, so a
//! crash mid-write never leaves a truncated document. A `.lock` file
//! serializes writers across processes (CLI invocations racing each other).

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

const LOCK_FILE: &str = ".lock";
const EXTENSION: &str = "json";

/// Key/value store backed by `<dir>/<key>.json` files
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store in `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::validation(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }

    fn open_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        Ok(file)
    }

    fn with_exclusive<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = f();
        lock.unlock()?;
        result
    }

    fn read(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace `path` atomically; caller holds the exclusive lock
    fn write(&self, path: &Path, value: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let result = Self::read(&path);
        lock.unlock()?;
        result
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.with_exclusive(|| self.write(&path, value))
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let path = self.path_for(key)?;
        self.with_exclusive(|| {
            let next = f(Self::read(&path)?)?;
            self.write(&path, &next)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.with_exclusive(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = JsonFileStore::new(dir.path()).unwrap();
            store.set("aura_view", "\"admin\"").unwrap();
        }
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(store.get("aura_view").unwrap().as_deref(), Some("\"admin\""));
        assert_eq!(store.keys().unwrap(), vec!["aura_view".to_string()]);
    }

    #[test]
    fn test_missing_and_removed_keys() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.get("nothing").unwrap().is_none());

        store.set("k", "1").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.set("../escape", "1").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_update_is_atomic_across_instances() {
        let dir = tempdir().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dir = dir.path().to_path_buf();
                std::thread::spawn(move || {
                    let store = JsonFileStore::new(&dir).unwrap();
                    for _ in 0..10 {
                        store
                            .update("counter", &mut |raw| {
                                let n: u32 = raw.map_or(Ok(0), |r| r.parse()).unwrap();
                                Ok((n + 1).to_string())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(store.get("counter").unwrap().as_deref(), Some("40"));
    }

    #[test]
    fn test_failed_update_leaves_value() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.set("k", "old").unwrap();
        let result = store.update("k", &mut |_| Err(Error::validation("rejected")));
        assert!(result.is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
    }
}
