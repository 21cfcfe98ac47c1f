use super::{Cache, CacheStorage, Request, Response, WorkerError};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

type Entries = Rc<RefCell<HashMap<String, Response>>>;

/// In-process cache namespaces, used off the web and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStorage {
    caches: Rc<RefCell<BTreeMap<String, Entries>>>,
}

#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Entries,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_count(&self, name: &str) -> usize {
        self.caches
            .borrow()
            .get(name)
            .map(|entries| entries.borrow().len())
            .unwrap_or(0)
    }
}

impl MemoryCache {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl CacheStorage for MemoryCacheStorage {
    type Cache = MemoryCache;

    async fn open(&self, name: &str) -> Result<MemoryCache, WorkerError> {
        let entries = self
            .caches
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(MemoryCache { entries })
    }

    async fn keys(&self) -> Result<Vec<String>, WorkerError> {
        Ok(self.caches.borrow().keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        Ok(self.caches.borrow_mut().remove(name).is_some())
    }
}

impl Cache for MemoryCache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, WorkerError> {
        Ok(self.entries.borrow().get(request.cache_key()).cloned())
    }

    async fn put(&self, request: &Request, response: &Response) -> Result<(), WorkerError> {
        self.entries
            .borrow_mut()
            .insert(request.cache_key().to_string(), response.clone());
        Ok(())
    }
}
