use super::{KeyValueStore, StoreError};
use std::cell::RefCell;
use std::collections::HashMap;

/// Process-local store. Used for headless runs and as a stand-in when the
/// durable store holds data we refuse to touch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RefCell::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_latest_value() {
        let store = MemoryStore::new();
        store.set_item("first_run", "true").unwrap();
        store.set_item("first_run", "false").unwrap();
        assert_eq!(store.get_item("first_run").unwrap().as_deref(), Some("false"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_clears_key() {
        let store = MemoryStore::with_entries([("user_token", "null")]);
        store.remove_item("user_token").unwrap();
        assert!(store.get_item("user_token").unwrap().is_none());
        assert!(store.is_empty());
    }
}
