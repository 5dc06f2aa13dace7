//! Small string key-value persistence, modelled on `window.localStorage`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Durable string storage. Writes are best-effort: a full or disabled
/// storage must not break the app, so nothing here returns an error.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and native builds.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let kv = MemoryKv::new();
        let other = kv.clone();
        kv.set("a", "1");
        assert_eq!(other.get("a").as_deref(), Some("1"));
        other.remove("a");
        assert!(kv.get("a").is_none());
    }
}
