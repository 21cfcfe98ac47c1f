//! Browser bindings: the Cache Storage API, `fetch`, and the service worker
//! lifecycle events.

use super::{
    AssetManifest, Cache, CacheStorage, Fetcher, OfflineWorker, Request, Response, WorkerError,
};
use reqwest::{Method, Url};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{ExtendableEvent, FetchEvent, ServiceWorkerGlobalScope};

fn js_error(err: JsValue) -> WorkerError {
    WorkerError::Cache(format!("{err:?}"))
}

pub struct WebCacheStorage {
    inner: web_sys::CacheStorage,
}

pub struct WebCache {
    inner: web_sys::Cache,
}

impl WebCacheStorage {
    pub fn new(inner: web_sys::CacheStorage) -> Self {
        Self { inner }
    }
}

impl CacheStorage for WebCacheStorage {
    type Cache = WebCache;

    async fn open(&self, name: &str) -> Result<WebCache, WorkerError> {
        let cache = JsFuture::from(self.inner.open(name))
            .await
            .map_err(js_error)?
            .dyn_into::<web_sys::Cache>()
            .map_err(js_error)?;
        Ok(WebCache { inner: cache })
    }

    async fn keys(&self) -> Result<Vec<String>, WorkerError> {
        let keys = JsFuture::from(self.inner.keys()).await.map_err(js_error)?;
        Ok(js_sys::Array::from(&keys)
            .iter()
            .filter_map(|key| key.as_string())
            .collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        let deleted = JsFuture::from(self.inner.delete(name))
            .await
            .map_err(js_error)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }
}

impl Cache for WebCache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, WorkerError> {
        let found = JsFuture::from(self.inner.match_with_str(request.cache_key()))
            .await
            .map_err(js_error)?;
        if found.is_undefined() || found.is_null() {
            return Ok(None);
        }
        let response = found.dyn_into::<web_sys::Response>().map_err(js_error)?;
        Ok(Some(from_web_response(&response).await?))
    }

    async fn put(&self, request: &Request, response: &Response) -> Result<(), WorkerError> {
        let response = to_web_response(response).map_err(js_error)?;
        JsFuture::from(self.inner.put_with_str(request.cache_key(), &response))
            .await
            .map_err(js_error)?;
        Ok(())
    }
}

/// Plain `fetch` through gloo-net.
pub struct WebFetcher;

impl Fetcher for WebFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        let response = gloo_net::http::Request::get(request.url.as_str())
            .send()
            .await
            .map_err(|err| WorkerError::Network(err.to_string()))?;
        let body = response
            .binary()
            .await
            .map_err(|err| WorkerError::Network(err.to_string()))?;

        let mut converted = Response::new(response.status(), body);
        if let Some(content_type) = response.headers().get("content-type") {
            converted = converted.with_header("content-type", content_type);
        }
        Ok(converted)
    }
}

async fn from_web_response(response: &web_sys::Response) -> Result<Response, WorkerError> {
    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    let body = js_sys::Uint8Array::new(&buffer).to_vec();

    let mut converted = Response::new(response.status(), body);
    if let Ok(Some(content_type)) = response.headers().get("content-type") {
        converted = converted.with_header("content-type", content_type);
    }
    Ok(converted)
}

fn to_web_response(response: &Response) -> Result<web_sys::Response, JsValue> {
    let headers = web_sys::Headers::new()?;
    for (name, value) in &response.headers {
        headers.set(name, value)?;
    }

    let init = web_sys::ResponseInit::new();
    init.set_status(response.status);
    init.set_headers(&headers);

    let body = js_sys::Uint8Array::from(response.body.as_slice());
    web_sys::Response::new_with_opt_buffer_source_and_init(Some(&body), &init)
}

fn to_request(event: &FetchEvent) -> Result<Request, WorkerError> {
    let request = event.request();
    let method = Method::from_bytes(request.method().as_bytes())
        .map_err(|_| WorkerError::InvalidUrl(request.url()))?;
    Request::new(method, &request.url())
}

type WebWorker = OfflineWorker<WebCacheStorage, WebFetcher>;

/// Builds the worker for the current scope and hooks it to the lifecycle
/// events. Must run inside a `ServiceWorkerGlobalScope`.
pub fn register() -> Result<(), WorkerError> {
    let scope: ServiceWorkerGlobalScope = js_sys::global().unchecked_into();
    let origin = Url::parse(&scope.location().origin())
        .map_err(|err| WorkerError::InvalidUrl(err.to_string()))?;
    let caches = scope.caches().map_err(js_error)?;

    let worker: Rc<WebWorker> = Rc::new(OfflineWorker::new(
        origin,
        env!("CARGO_PKG_VERSION"),
        AssetManifest::bundled(),
        WebCacheStorage::new(caches),
        WebFetcher,
    ));

    let on_install = {
        let worker = Rc::clone(&worker);
        Closure::<dyn FnMut(ExtendableEvent)>::new(move |event: ExtendableEvent| {
            let worker = Rc::clone(&worker);
            let promise = future_to_promise(async move {
                worker
                    .install()
                    .await
                    .map(|_| JsValue::UNDEFINED)
                    .map_err(|err| JsValue::from_str(&err.to_string()))
            });
            if let Err(err) = event.wait_until(&promise) {
                tracing::error!(?err, "install waitUntil rejected");
            }
        })
    };

    let on_activate = {
        let worker = Rc::clone(&worker);
        Closure::<dyn FnMut(ExtendableEvent)>::new(move |event: ExtendableEvent| {
            let worker = Rc::clone(&worker);
            let promise = future_to_promise(async move {
                worker
                    .activate()
                    .await
                    .map(|_| JsValue::UNDEFINED)
                    .map_err(|err| JsValue::from_str(&err.to_string()))
            });
            if let Err(err) = event.wait_until(&promise) {
                tracing::error!(?err, "activate waitUntil rejected");
            }
        })
    };

    let on_fetch = {
        let worker = Rc::clone(&worker);
        Closure::<dyn FnMut(FetchEvent)>::new(move |event: FetchEvent| {
            let request = match to_request(&event) {
                Ok(request) if request.method == Method::GET => request,
                Ok(_) => return,
                Err(err) => {
                    tracing::debug!(%err, "ignoring request");
                    return;
                }
            };

            let worker = Rc::clone(&worker);
            let promise = future_to_promise(async move {
                let response = worker
                    .handle_fetch(&request)
                    .await
                    .unwrap_or_else(Response::offline);
                to_web_response(&response).map(JsValue::from)
            });
            if let Err(err) = event.respond_with(&promise) {
                tracing::error!(?err, "respondWith rejected");
            }
        })
    };

    for (name, callback) in [
        ("install", on_install.as_ref()),
        ("activate", on_activate.as_ref()),
        ("fetch", on_fetch.as_ref()),
    ] {
        scope
            .add_event_listener_with_callback(name, callback.unchecked_ref())
            .map_err(js_error)?;
    }

    // The listeners live as long as the worker scope.
    on_install.forget();
    on_activate.forget();
    on_fetch.forget();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "offline worker registered");
    Ok(())
}
