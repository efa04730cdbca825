use std::collections::HashMap;

use crate::application::ports::SessionStore;

/// Session storage for one client held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_delete() {
        let mut store = MemorySessionStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v1".to_string());
        store.set("k", "v2".to_string());
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.delete("k");
        assert!(store.is_empty());
        store.delete("k");
    }

    #[test]
    fn test_hash_map_is_a_session_store() {
        let mut map: HashMap<String, String> = HashMap::new();
        SessionStore::set(&mut map, "a", "1".to_string());
        assert_eq!(SessionStore::get(&map, "a").as_deref(), Some("1"));
        SessionStore::delete(&mut map, "a");
        assert!(map.is_empty());
    }
}
