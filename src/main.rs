use anianglia::components::App;
use anianglia::logging::init_logging;
use anianglia::platform::in_service_worker_scope;

fn main() {
    init_logging();

    if in_service_worker_scope() {
        start_offline_worker();
        return;
    }

    dioxus::launch(App);
}

#[cfg(target_arch = "wasm32")]
fn start_offline_worker() {
    if let Err(err) = anianglia::offline::web::register() {
        tracing::error!(%err, "failed to register offline worker");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn start_offline_worker() {}
