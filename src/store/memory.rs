//! In-memory progress store.

use std::collections::BTreeMap;
use std::convert::Infallible;
use parking_lot::RwLock;

use super::ProgressStore;

/// In-memory progress store for tests and embedding hosts.
///
/// Uses a BTreeMap for deterministic iteration order.
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryProgressStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.write().insert(key.into(), value.into());
        store
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove a key, returning its blob.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().remove(key)
    }
}

impl ProgressStore for InMemoryProgressStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_and_set() {
        let store = InMemoryProgressStore::new();
        assert_eq!(store.get("progress").unwrap(), None);

        store.set("progress", "{\"nodes\":[]}").unwrap();
        assert_eq!(store.get("progress").unwrap().as_deref(), Some("{\"nodes\":[]}"));

        store.set("progress", "{}").unwrap();
        assert_eq!(store.get("progress").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryProgressStore::with_entry("a", "1");
        assert_eq!(store.remove("a").as_deref(), Some("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_shared_through_arc() {
        let store = Arc::new(InMemoryProgressStore::new());
        let handle = Arc::clone(&store);

        std::thread::spawn(move || handle.set("k", "v").unwrap())
            .join()
            .unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
