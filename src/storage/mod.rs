//! Durable key-value storage behind the settings registry.
//!
//! The web build keeps values in `localStorage`; native builds keep them in a
//! small SQLite table in the platform data directory. Values are opaque
//! strings here, serialization is the registry's concern.

mod memory;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(not(target_arch = "wasm32"))]
mod sqlite;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::SqliteStore;

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },
    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },
}

/// Synchronous string store. Writes are visible to the next read on the same
/// thread, there is no partially written state.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Turns a browser storage lookup, which may throw or come back empty when
/// storage is blocked, into a backend or [`StoreError::Unavailable`].
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn require_backend<S, E: fmt::Debug>(
    name: &str,
    lookup: Result<Option<S>, E>,
) -> Result<S, StoreError> {
    match lookup {
        Ok(Some(backend)) => Ok(backend),
        Ok(None) => Err(StoreError::Unavailable(format!("{name} is disabled"))),
        Err(err) => Err(StoreError::Unavailable(format!("{name}: {err:?}"))),
    }
}

/// Opens the durable store for the current platform.
#[cfg(target_arch = "wasm32")]
pub fn open_default_store() -> Result<Rc<dyn KeyValueStore>, StoreError> {
    Ok(Rc::new(LocalStore::new()?))
}

/// Opens the durable store for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_default_store() -> Result<Rc<dyn KeyValueStore>, StoreError> {
    Ok(Rc::new(SqliteStore::open_default()?))
}
