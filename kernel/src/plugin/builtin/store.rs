//! Plugin-local key-value storage.
//!
//! Built-in plugins keep their private state behind this trait instead of
//! bare `HashMap`s so unit tests can inject a fake store, and so a durable
//! backend can replace the in-memory one without touching handler code.
//! Durable storage itself is a plugin-local concern outside the kernel.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Minimal key-value interface for plugin state.
pub trait KeyValueStore<T: Clone>: Send + Sync {
    fn get(&self, key: &str) -> Option<T>;
    fn put(&self, key: String, value: T);
    fn remove(&self, key: &str) -> Option<T>;
    /// All entries, in unspecified order.
    fn entries(&self) -> Vec<(String, T)>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime in-memory store.
pub struct MemoryStore<T> {
    inner: RwLock<HashMap<String, T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> KeyValueStore<T> for MemoryStore<T> {
    fn get(&self, key: &str) -> Option<T> {
        self.inner.read().get(key).cloned()
    }

    fn put(&self, key: String, value: T) {
        self.inner.write().insert(key, value);
    }

    fn remove(&self, key: &str) -> Option<T> {
        self.inner.write().remove(key)
    }

    fn entries(&self) -> Vec<(String, T)> {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.put("a".into(), 1);
        store.put("b".into(), 2);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove("a"), Some(1));
        assert_eq!(store.get("a"), None);
        assert_eq!(store.len(), 1);
    }
}
