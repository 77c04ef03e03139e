//! Persistent Selection Store - durable key-value state.
//!
//! The currently selected storefront and the resolved tokens survive process
//! restarts through this port. `get`/`set` are infallible by contract (the
//! browser-storage model): a file-backed store that cannot persist logs the
//! failure and keeps serving the in-memory view rather than failing the flow.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Well-known store keys.
pub mod keys {
    use vitrine_core::CompanyId;

    /// Currently selected storefront's company id.
    pub const SELECTED_COMPANY_ID: &str = "selected_company_id";
    /// Cached brand-scope access token.
    pub const BRAND_TOKEN: &str = "brand_token";
    /// Site token that produced the cached brand token.
    pub const BRAND_TOKEN_SOURCE: &str = "brand_token_source";

    /// Cache key for the affiliate token of one storefront.
    #[must_use]
    pub fn affiliate_token(company_id: CompanyId) -> String {
        format!("affiliate_token:{company_id}")
    }

    /// Prefix shared by all affiliate-token keys.
    pub const AFFILIATE_TOKEN_PREFIX: &str = "affiliate_token:";
}

/// Callback invoked after a key changes. Receives the key and the new value
/// (`None` on removal).
pub type StoreListener = Box<dyn Fn(&str, Option<&str>) + Send + Sync>;

/// Durable key-value store for selection state and cached tokens.
pub trait SelectionStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value and notify subscribers.
    fn set(&self, key: &str, value: &str);

    /// Remove a value and notify subscribers.
    fn remove(&self, key: &str);

    /// All currently present keys.
    fn keys(&self) -> Vec<String>;

    /// Register a listener for subsequent changes.
    fn subscribe(&self, listener: StoreListener);
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store; state is lost on drop. Used in tests and as the base
/// for the file-backed store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    listeners: Mutex<Vec<StoreListener>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, key: &str, value: Option<&str>) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(key, value);
            }
        }
    }
}

impl SelectionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self.notify(key, Some(value));
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        self.notify(key, None);
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn subscribe(&self, listener: StoreListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// JSON-file-backed store. The whole map is rewritten on every change; state
/// files stay tiny (a selection id and a handful of tokens).
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open a store at `path`, loading existing state when the file exists.
    ///
    /// A missing file yields an empty store; an unreadable or corrupt file is
    /// logged and treated as empty rather than failing startup.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let inner = MemoryStore::new();

        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => {
                    if let Ok(mut map) = inner.entries.lock() {
                        *map = entries;
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "state file is corrupt, starting empty");
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "state file unreadable, starting empty");
            }
        }

        Self { path, inner }
    }

    fn persist(&self) {
        let Ok(entries) = self.inner.entries.lock() else {
            return;
        };
        let serialized = match serde_json::to_string_pretty(&*entries) {
            Ok(s) => s,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize state");
                return;
            }
        };
        drop(entries);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(error) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %self.path.display(), %error, "failed to create state directory");
            return;
        }
        if let Err(error) = std::fs::write(&self.path, serialized) {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist state");
        }
    }
}

impl SelectionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.set(key, value);
        self.persist();
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
        self.persist();
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn subscribe(&self, listener: StoreListener) {
        self.inner.subscribe(listener);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_memory_store_keys() {
        let store = MemoryStore::new();
        store.set("a", "1");
        store.set("b", "2");
        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_subscribe_fires_on_set_and_remove() {
        let store = MemoryStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        store.subscribe(Box::new(move |_key, _value| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        store.set("k", "v");
        store.remove("k");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("vitrine-store-{}", std::process::id()));
        let path = dir.join("state.json");
        let _ = std::fs::remove_file(&path);

        {
            let store = FileStore::open(&path);
            store.set(keys::SELECTED_COMPANY_ID, "42");
        }

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.get(keys::SELECTED_COMPANY_ID),
            Some("42".to_string())
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = std::env::temp_dir().join(format!("vitrine-store-bad-{}", std::process::id()));
        let path = dir.join("state.json");
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(&path, "not json").expect("write");

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_affiliate_token_key() {
        use vitrine_core::CompanyId;
        assert_eq!(
            keys::affiliate_token(CompanyId::new(7)),
            "affiliate_token:7"
        );
        assert!(keys::affiliate_token(CompanyId::new(7)).starts_with(keys::AFFILIATE_TOKEN_PREFIX));
    }
}
