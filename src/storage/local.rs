use super::{require_backend, KeyValueStore, StoreError};

/// `window.localStorage`, accessed raw so parse failures stay with the caller.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn new() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = require_backend("localStorage", window.local_storage())?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|err| StoreError::Read {
            key: key.to_string(),
            message: format!("{err:?}"),
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Write {
                key: key.to_string(),
                message: format!("{err:?}"),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StoreError::Write {
                key: key.to_string(),
                message: format!("{err:?}"),
            })
    }
}
