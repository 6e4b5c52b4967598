//! Raw string storage backends.
//!
//! Backends store serialized JSON text by key and report failures as
//! `io::Error`; the `Storage` front end decides what to do with them.

use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// A string-keyed, string-valued durable store.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
    fn delete(&self, key: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
    fn keys(&self) -> io::Result<Vec<String>>;
}

/// In-memory backend, optionally bounded to a byte quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that rejects writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::other("storage lock poisoned"))
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.lock()?;
        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(io::Error::new(
                    io::ErrorKind::StorageFull,
                    format!("quota of {quota} bytes exceeded"),
                ));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> io::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// Backend persisting every key into one JSON document on disk.
///
/// Writes go to a sibling temp file and are renamed into place while an
/// exclusive lock is held on a `.lock` file, so concurrent CLI invocations
/// never observe a half-written document.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileBackend {
    /// Store data in `dir/storage.json`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("storage.json"),
            lock_path: dir.join("storage.lock"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }

    fn locked<T>(&self, f: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock: File = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        lock.lock_exclusive()?;
        let result = f();
        // Releasing explicitly surfaces unlock errors; dropping would swallow them.
        FileExt::unlock(&lock)?;
        result
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> io::Result<()> {
        self.locked(|| {
            let mut entries = match self.load() {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!(path = %self.path.display(), error = %e, "Discarding unreadable storage document");
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            f(&mut entries);
            self.save(&entries)
        })
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> io::Result<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> io::Result<()> {
        self.locked(|| self.save(&BTreeMap::new()))
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_backend_round_trips() {
        let backend = MemoryBackend::new();
        backend.write("a", "1").unwrap();
        assert_eq!(backend.read("a").unwrap().as_deref(), Some("1"));
        backend.delete("a").unwrap();
        assert_eq!(backend.read("a").unwrap(), None);
    }

    #[test]
    fn memory_backend_enforces_quota() {
        let backend = MemoryBackend::with_quota(10);
        backend.write("k", "12345").unwrap();
        let err = backend.write("big", "0123456789").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
        // Overwriting an existing key only counts the new value.
        backend.write("k", "123456789").unwrap();
    }

    #[test]
    fn file_backend_persists_across_instances() {
        let dir = tempdir().unwrap();
        FileBackend::new(dir.path()).write("token", "\"abc\"").unwrap();

        let reopened = FileBackend::new(dir.path());
        assert_eq!(reopened.read("token").unwrap().as_deref(), Some("\"abc\""));
        assert_eq!(reopened.keys().unwrap(), vec!["token".to_string()]);
    }

    #[test]
    fn file_backend_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(&dir.path().join("nested"));
        assert_eq!(backend.read("x").unwrap(), None);
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn file_backend_clear_removes_everything() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.write("a", "1").unwrap();
        backend.write("b", "2").unwrap();
        backend.clear().unwrap();
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn file_backend_reports_corrupt_document() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        fs::write(backend.path(), "{not json").unwrap();
        let err = backend.read("a").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn file_backend_recovers_from_corrupt_document() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        fs::write(backend.path(), "{not json").unwrap();
        backend.clear().unwrap();
        assert!(backend.keys().unwrap().is_empty());

        fs::write(backend.path(), "{not json").unwrap();
        backend.write("token", "\"abc\"").unwrap();
        assert_eq!(backend.read("token").unwrap().as_deref(), Some("\"abc\""));
    }
}
