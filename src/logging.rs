//! Tracing setup. Native builds log to stderr filtered by `RUST_LOG`, the web
//! build logs to the browser console.

use std::sync::Once;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FILTER: &str = "anianglia=info";

static INIT: Once = Once::new();

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging() {
    INIT.call_once(install);
}

#[cfg(not(target_arch = "wasm32"))]
fn install() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();

    if let Err(err) = result {
        eprintln!("[logging] subscriber already installed: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn install() {
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
}
