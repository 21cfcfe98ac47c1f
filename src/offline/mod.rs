//! Offline cache worker.
//!
//! Runs as the service worker of the web build. Build assets are precached
//! into a namespace named after the app version on install, stale namespaces
//! are dropped on activate, and GET requests are answered network first with
//! the cache as fallback.

mod manifest;
mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;
mod worker;

pub use manifest::AssetManifest;
pub use memory::{MemoryCache, MemoryCacheStorage};
pub use worker::OfflineWorker;

use reqwest::{Method, Url};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("cache operation failed: {0}")]
    Cache(String),
    #[error("invalid url `{0}`")]
    InvalidUrl(String),
    #[error("precaching {url} failed with HTTP {status}")]
    AssetFetch { url: String, status: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Result<Self, WorkerError> {
        let url = Url::parse(url).map_err(|_| WorkerError::InvalidUrl(url.to_string()))?;
        Ok(Self { method, url })
    }

    pub fn get(url: &str) -> Result<Self, WorkerError> {
        Self::new(Method::GET, url)
    }

    /// Cache entries are keyed by the full request URL.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }

    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// What the worker answers when neither network nor cache can.
    pub fn offline() -> Self {
        Self::new(503, "Offline").with_header("content-type", "text/plain")
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// One named cache namespace.
#[allow(async_fn_in_trait)]
pub trait Cache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, WorkerError>;
    async fn put(&self, request: &Request, response: &Response) -> Result<(), WorkerError>;
}

/// The set of cache namespaces visible to the worker.
#[allow(async_fn_in_trait)]
pub trait CacheStorage {
    type Cache: Cache;

    async fn open(&self, name: &str) -> Result<Self::Cache, WorkerError>;
    async fn keys(&self) -> Result<Vec<String>, WorkerError>;
    async fn delete(&self, name: &str) -> Result<bool, WorkerError>;
}

#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_response_is_503_with_text_body() {
        let response = Response::offline();
        assert_eq!(response.status, 503);
        assert_eq!(response.body, b"Offline");
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert!(!response.is_ok());
    }

    #[test]
    fn request_scheme_check() {
        assert!(Request::get("https://anianglia.app/app.js").unwrap().is_http());
        assert!(!Request::get("chrome-extension://abc/script.js").unwrap().is_http());
        assert_eq!(
            Request::get("not a url"),
            Err(WorkerError::InvalidUrl("not a url".to_string()))
        );
    }
}
