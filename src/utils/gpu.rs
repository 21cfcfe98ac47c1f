//! WebGPU capability probe, used to decide whether upscaling can be offered.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpuError {
    #[error("WebGPU is not supported in this environment")]
    MissingInterface,
    #[error("adapter request failed: {0}")]
    AdapterRequest(String),
    #[error("no suitable GPU adapter")]
    NoAdapter,
}

/// The `navigator.gpu` surface the probe needs.
#[allow(async_fn_in_trait)]
pub trait GpuInterface {
    /// Resolves to whether an adapter was granted.
    async fn request_adapter(&self) -> Result<bool, String>;
}

/// One adapter negotiation, no retry.
pub async fn probe_gpu<G: GpuInterface>(gpu: Option<&G>) -> Result<(), GpuError> {
    let gpu = gpu.ok_or(GpuError::MissingInterface)?;
    match gpu.request_adapter().await {
        Ok(true) => Ok(()),
        Ok(false) => Err(GpuError::NoAdapter),
        Err(message) => Err(GpuError::AdapterRequest(message)),
    }
}

/// `true` when upscaling can run on this device.
pub async fn check_gpu_support() -> bool {
    let gpu = platform_gpu();
    match probe_gpu(gpu.as_ref()).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "GPU upscaling unavailable");
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub struct NavigatorGpu {
    gpu: wasm_bindgen::JsValue,
}

#[cfg(target_arch = "wasm32")]
impl GpuInterface for NavigatorGpu {
    async fn request_adapter(&self) -> Result<bool, String> {
        use wasm_bindgen::JsCast;

        let request = js_sys::Reflect::get(&self.gpu, &"requestAdapter".into())
            .map_err(|err| format!("{err:?}"))?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| "requestAdapter is not a function".to_string())?;
        let promise = request
            .call0(&self.gpu)
            .map_err(|err| format!("{err:?}"))?
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| "requestAdapter did not return a promise".to_string())?;

        let adapter = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|err| format!("{err:?}"))?;
        Ok(!adapter.is_null() && !adapter.is_undefined())
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_gpu() -> Option<NavigatorGpu> {
    let navigator = web_sys::window()?.navigator();
    let gpu = js_sys::Reflect::get(&navigator, &"gpu".into()).ok()?;
    if gpu.is_null() || gpu.is_undefined() {
        return None;
    }
    Some(NavigatorGpu { gpu })
}

// Native builds have no WebGPU surface to negotiate with, so the probe target
// is uninhabited.
#[cfg(not(target_arch = "wasm32"))]
impl GpuInterface for std::convert::Infallible {
    async fn request_adapter(&self) -> Result<bool, String> {
        match *self {}
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_gpu() -> Option<std::convert::Infallible> {
    None
}
