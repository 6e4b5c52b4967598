//! Persistent key-value store.
//!
//! Values are serialized to JSON text and handed to a [`StorageBackend`].
//! Persistence is a best-effort cache of session state: every backend or
//! serialization failure is logged and swallowed, never raised to callers.

pub mod backend;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

/// Well-known storage keys.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const CURRENT_USER: &str = "current_user";
    pub const REMEMBER_ME: &str = "remember_me";
    pub const THEME: &str = "theme";
    pub const LANGUAGE: &str = "language";

    /// Keys that together make up a persisted session.
    pub const SESSION: [&str; 3] = [AUTH_TOKEN, CURRENT_USER, REMEMBER_ME];
}

/// JSON front end over a storage backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Storage kept only for the life of the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize value for storage");
                return;
            }
        };
        if let Err(e) = self.backend.write(key, &text) {
            warn!(key, error = %e, "Failed to write to storage");
        }
    }

    /// Stored value for `key`; `None` when absent, unreadable, or of the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.backend.read(key) {
            Ok(text) => text?,
            Err(e) => {
                warn!(key, error = %e, "Failed to read from storage");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Failed to parse stored value");
                None
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            warn!(key, error = %e, "Failed to remove from storage");
        }
    }

    /// Wipe every key. Not used on normal logout.
    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            warn!(error = %e, "Failed to clear storage");
        }
    }

    pub fn has(&self, key: &str) -> bool {
        match self.backend.read(key) {
            Ok(value) => value.is_some(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read from storage");
                false
            }
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list storage keys");
            Vec::new()
        })
    }
}

/// Typed access to the display preferences kept alongside the session.
#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn theme(&self) -> Option<String> {
        self.storage.get(keys::THEME)
    }

    pub fn set_theme(&self, theme: &str) {
        self.storage.set(keys::THEME, theme);
    }

    pub fn language(&self) -> Option<String> {
        self.storage.get(keys::LANGUAGE)
    }

    pub fn set_language(&self, language: &str) {
        self.storage.set(keys::LANGUAGE, language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        id: String,
        roles: Vec<String>,
    }

    /// Backend where every operation fails, like disabled browser storage.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn read(&self, _: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("disabled"))
        }
        fn write(&self, _: &str, _: &str) -> io::Result<()> {
            Err(io::Error::other("disabled"))
        }
        fn delete(&self, _: &str) -> io::Result<()> {
            Err(io::Error::other("disabled"))
        }
        fn clear(&self) -> io::Result<()> {
            Err(io::Error::other("disabled"))
        }
        fn keys(&self) -> io::Result<Vec<String>> {
            Err(io::Error::other("disabled"))
        }
    }

    #[test]
    fn set_then_get_structured_value() {
        let storage = Storage::in_memory();
        let snap = Snapshot {
            id: "u1".into(),
            roles: vec!["User".into()],
        };
        storage.set(keys::CURRENT_USER, &snap);
        assert_eq!(storage.get::<Snapshot>(keys::CURRENT_USER), Some(snap));
        assert!(storage.has(keys::CURRENT_USER));
    }

    #[test]
    fn get_missing_key_is_none() {
        assert_eq!(Storage::in_memory().get::<String>("nope"), None);
    }

    #[test]
    fn get_with_wrong_shape_is_none() {
        let storage = Storage::in_memory();
        storage.set("n", &42);
        assert_eq!(storage.get::<Snapshot>("n"), None);
    }

    #[test]
    fn get_unparseable_text_is_none() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write("raw", "{oops").unwrap();
        let storage = Storage::new(backend);
        assert_eq!(storage.get::<String>("raw"), None);
    }

    #[test]
    fn failures_are_swallowed() {
        let storage = Storage::new(Arc::new(BrokenBackend));
        storage.set("k", "v");
        storage.remove("k");
        storage.clear();
        assert_eq!(storage.get::<String>("k"), None);
        assert!(!storage.has("k"));
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn quota_exceeded_write_is_swallowed() {
        let storage = Storage::new(Arc::new(MemoryBackend::with_quota(16)));
        storage.set("a", "short");
        storage.set("b", &"x".repeat(64));
        assert_eq!(storage.get::<String>("a").as_deref(), Some("short"));
        assert!(!storage.has("b"));
    }

    #[test]
    fn remove_and_clear() {
        let storage = Storage::in_memory();
        for key in keys::SESSION {
            storage.set(key, "x");
        }
        storage.set(keys::THEME, "dark");
        storage.remove(keys::AUTH_TOKEN);
        assert!(!storage.has(keys::AUTH_TOKEN));
        assert_eq!(storage.keys().len(), 3);
        storage.clear();
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn preferences_round_trip() {
        let prefs = Preferences::new(Storage::in_memory());
        assert_eq!(prefs.theme(), None);
        prefs.set_theme("dark");
        prefs.set_language("es");
        assert_eq!(prefs.theme().as_deref(), Some("dark"));
        assert_eq!(prefs.language().as_deref(), Some("es"));
    }
}
