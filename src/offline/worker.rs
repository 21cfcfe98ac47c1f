use super::{AssetManifest, Cache, CacheStorage, Fetcher, Request, Response, WorkerError};
use futures_util::future::try_join_all;
use reqwest::{Method, Url};

pub struct OfflineWorker<S, F> {
    origin: Url,
    cache_name: String,
    manifest: AssetManifest,
    storage: S,
    network: F,
}

impl<S, F> OfflineWorker<S, F>
where
    S: CacheStorage,
    F: Fetcher,
{
    pub fn new(origin: Url, version: &str, manifest: AssetManifest, storage: S, network: F) -> Self {
        Self {
            origin,
            cache_name: format!("cache-{version}"),
            manifest,
            storage,
            network,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Precaches every manifest asset. Either all of them land in the cache
    /// or none do.
    pub async fn install(&self) -> Result<(), WorkerError> {
        let cache = self.storage.open(&self.cache_name).await?;

        let requests = self
            .manifest
            .iter()
            .map(|path| -> Result<Request, WorkerError> {
                let url = self
                    .origin
                    .join(path)
                    .map_err(|_| WorkerError::InvalidUrl(path.to_string()))?;
                Ok(Request {
                    method: Method::GET,
                    url,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let responses = try_join_all(requests.iter().map(|request| async move {
            let response = self.network.fetch(request).await?;
            if !response.is_ok() {
                return Err(WorkerError::AssetFetch {
                    url: request.url.to_string(),
                    status: response.status,
                });
            }
            Ok::<_, WorkerError>(response)
        }))
        .await?;

        for (request, response) in requests.iter().zip(responses.iter()) {
            cache.put(request, response).await?;
        }

        tracing::info!(
            cache = %self.cache_name,
            assets = requests.len(),
            "offline cache installed"
        );
        Ok(())
    }

    /// Drops every cache generation except the current one and returns the
    /// names that were deleted.
    pub async fn activate(&self) -> Result<Vec<String>, WorkerError> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await? {
            if name != self.cache_name && self.storage.delete(&name).await? {
                deleted.push(name);
            }
        }

        if !deleted.is_empty() {
            tracing::info!(?deleted, "stale offline caches removed");
        }
        Ok(deleted)
    }

    /// Answers an intercepted request. `None` means the request is not ours
    /// and goes to the network untouched.
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        if request.method != Method::GET {
            return None;
        }
        Some(self.respond(request).await)
    }

    async fn respond(&self, request: &Request) -> Response {
        let cache = match self.storage.open(&self.cache_name).await {
            Ok(cache) => Some(cache),
            Err(err) => {
                tracing::warn!(%err, "offline cache unavailable");
                None
            }
        };

        if let Some(cache) = &cache {
            if self.manifest.contains(request.url.path()) {
                if let Some(cached) = lookup(cache, request).await {
                    return cached;
                }
            }
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if let Some(cache) = &cache {
                    if request.is_http() && response.status == 200 {
                        if let Err(err) = cache.put(request, &response).await {
                            tracing::warn!(%err, url = %request.url, "failed to cache response");
                        }
                    }
                }
                response
            }
            Err(err) => {
                tracing::debug!(%err, url = %request.url, "network failed, trying cache");
                if let Some(cache) = &cache {
                    if let Some(cached) = lookup(cache, request).await {
                        return cached;
                    }
                }
                Response::offline()
            }
        }
    }
}

async fn lookup<C: Cache>(cache: &C, request: &Request) -> Option<Response> {
    match cache.match_request(request).await {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(%err, url = %request.url, "cache lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::MemoryCacheStorage;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    const ORIGIN: &str = "https://anianglia.app";

    #[derive(Default)]
    struct FakeNetwork {
        responses: RefCell<HashMap<String, Response>>,
        offline: Cell<bool>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeNetwork {
        fn serve(&self, path: &str, response: Response) {
            self.responses
                .borrow_mut()
                .insert(format!("{ORIGIN}{path}"), response);
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Fetcher for &FakeNetwork {
        async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
            self.calls.borrow_mut().push(request.url.to_string());
            if self.offline.get() {
                return Err(WorkerError::Network("Failed to fetch".to_string()));
            }
            Ok(self
                .responses
                .borrow()
                .get(request.url.as_str())
                .cloned()
                .unwrap_or_else(|| Response::new(404, "Not Found")))
        }
    }

    fn worker<'a>(
        version: &str,
        manifest: AssetManifest,
        storage: &MemoryCacheStorage,
        network: &'a FakeNetwork,
    ) -> OfflineWorker<MemoryCacheStorage, &'a FakeNetwork> {
        OfflineWorker::new(
            Url::parse(ORIGIN).unwrap(),
            version,
            manifest,
            storage.clone(),
            network,
        )
    }

    fn get(path: &str) -> Request {
        Request::get(&format!("{ORIGIN}{path}")).unwrap()
    }

    #[tokio::test]
    async fn install_precaches_manifest() {
        let network = FakeNetwork::default();
        network.serve("/app.js", Response::new(200, "js"));
        network.serve("/favicon.ico", Response::new(200, "ico"));
        let storage = MemoryCacheStorage::new();
        let sw = worker(
            "v1",
            AssetManifest::new(["/app.js"], ["/favicon.ico"]),
            &storage,
            &network,
        );

        sw.install().await.unwrap();

        assert_eq!(sw.cache_name(), "cache-v1");
        assert_eq!(storage.entry_count("cache-v1"), 2);
    }

    #[tokio::test]
    async fn install_is_all_or_nothing() {
        let network = FakeNetwork::default();
        network.serve("/app.js", Response::new(200, "js"));
        let storage = MemoryCacheStorage::new();
        let sw = worker(
            "v1",
            AssetManifest::new(["/app.js", "/missing.css"], Vec::<String>::new()),
            &storage,
            &network,
        );

        let err = sw.install().await.unwrap_err();

        assert_eq!(
            err,
            WorkerError::AssetFetch {
                url: format!("{ORIGIN}/missing.css"),
                status: 404
            }
        );
        assert_eq!(storage.entry_count("cache-v1"), 0);
    }

    #[tokio::test]
    async fn manifest_asset_is_served_from_cache_without_network() {
        let network = FakeNetwork::default();
        network.serve("/app.js", Response::new(200, "js"));
        let storage = MemoryCacheStorage::new();
        let sw = worker(
            "v1",
            AssetManifest::new(["/app.js"], Vec::<String>::new()),
            &storage,
            &network,
        );
        sw.install().await.unwrap();
        let calls_after_install = network.call_count();

        let response = sw.handle_fetch(&get("/app.js")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"js");
        assert_eq!(network.call_count(), calls_after_install);
    }

    #[tokio::test]
    async fn uncached_request_while_offline_gets_503() {
        let network = FakeNetwork::default();
        network.offline.set(true);
        let storage = MemoryCacheStorage::new();
        let sw = worker(
            "v1",
            AssetManifest::new(["/app.js"], Vec::<String>::new()),
            &storage,
            &network,
        );

        let response = sw.handle_fetch(&get("/anime/42")).await.unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(response.body, b"Offline");
    }

    #[tokio::test]
    async fn successful_response_is_cached_for_offline_use() {
        let network = FakeNetwork::default();
        network.serve("/anime/42", Response::new(200, "page"));
        let storage = MemoryCacheStorage::new();
        let sw = worker("v1", AssetManifest::default(), &storage, &network);

        let online = sw.handle_fetch(&get("/anime/42")).await.unwrap();
        assert_eq!(online.body, b"page");

        network.offline.set(true);
        let offline = sw.handle_fetch(&get("/anime/42")).await.unwrap();
        assert_eq!(offline, online);
    }

    #[tokio::test]
    async fn non_200_responses_are_returned_but_not_cached() {
        let network = FakeNetwork::default();
        network.serve("/profile", Response::new(302, ""));
        let storage = MemoryCacheStorage::new();
        let sw = worker("v1", AssetManifest::default(), &storage, &network);

        let response = sw.handle_fetch(&get("/profile")).await.unwrap();
        assert_eq!(response.status, 302);

        let missing = sw.handle_fetch(&get("/nowhere")).await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(storage.entry_count("cache-v1"), 0);
    }

    #[tokio::test]
    async fn network_is_preferred_over_cache_for_non_assets() {
        let network = FakeNetwork::default();
        network.serve("/feed", Response::new(200, "old"));
        let storage = MemoryCacheStorage::new();
        let sw = worker("v1", AssetManifest::default(), &storage, &network);
        sw.handle_fetch(&get("/feed")).await.unwrap();

        network.serve("/feed", Response::new(200, "new"));
        let response = sw.handle_fetch(&get("/feed")).await.unwrap();
        assert_eq!(response.body, b"new");
    }

    #[tokio::test]
    async fn non_http_schemes_are_not_cached() {
        let network = FakeNetwork::default();
        let storage = MemoryCacheStorage::new();
        let sw = worker("v1", AssetManifest::default(), &storage, &network);
        network
            .responses
            .borrow_mut()
            .insert("chrome-extension://abc/x.js".to_string(), Response::new(200, "x"));

        let request = Request::get("chrome-extension://abc/x.js").unwrap();
        let response = sw.handle_fetch(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(storage.entry_count("cache-v1"), 0);
    }

    #[tokio::test]
    async fn non_get_requests_pass_through() {
        let network = FakeNetwork::default();
        let storage = MemoryCacheStorage::new();
        let sw = worker("v1", AssetManifest::default(), &storage, &network);
        let request = Request::new(Method::POST, &format!("{ORIGIN}/auth/signIn")).unwrap();

        assert!(sw.handle_fetch(&request).await.is_none());
        assert_eq!(network.call_count(), 0);
    }

    #[tokio::test]
    async fn activate_deletes_only_stale_generations() {
        let network = FakeNetwork::default();
        let storage = MemoryCacheStorage::new();
        storage.open("cache-v1").await.unwrap();
        storage.open("cache-v2").await.unwrap();
        let sw = worker("v2", AssetManifest::default(), &storage, &network);

        let deleted = sw.activate().await.unwrap();

        assert_eq!(deleted, vec!["cache-v1".to_string()]);
        assert_eq!(storage.keys().await.unwrap(), vec!["cache-v2".to_string()]);
    }
}
