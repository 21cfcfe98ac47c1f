//! Small platform shims shared by the web and native builds.

use std::time::Duration;

/// Whether the code runs where a user can interact with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Interactive,
    Headless,
}

impl Environment {
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        if web_sys::window().is_some() {
            Self::Interactive
        } else {
            Self::Headless
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::Interactive
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::TimeoutFuture::new(duration.as_millis().min(u32::MAX as u128) as u32)
        .await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// True when the binary was started as a service worker script.
#[cfg(target_arch = "wasm32")]
pub fn in_service_worker_scope() -> bool {
    use wasm_bindgen::JsCast;
    js_sys::global()
        .dyn_into::<web_sys::ServiceWorkerGlobalScope>()
        .is_ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn in_service_worker_scope() -> bool {
    false
}
