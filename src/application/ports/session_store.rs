#[cfg(test)]
use mockall::automock;

/// Per-client key/value session storage
#[cfg_attr(test, automock)]
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);

    fn delete(&mut self, key: &str);
}

impl SessionStore for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.remove(key);
    }
}
