use crate::bootstrap::AppServices;
use crate::components::{use_observable, use_persisted, SettingsView};
use crate::utils::numeric_word;
use dioxus::prelude::*;

#[component]
pub fn App() -> Element {
    let services = use_hook(|| AppServices::bootstrap().map_err(|err| err.to_string()));

    match services {
        Ok(services) => rsx! {
            AppShell { services }
        },
        Err(message) => rsx! {
            div { class: "p-6 text-red-400",
                h1 { class: "text-lg font-semibold", "Не удалось загрузить настройки" }
                p { class: "text-sm", "{message}" }
            }
        },
    }
}

#[component]
fn AppShell(services: AppServices) -> Element {
    use_context_provider(|| services.settings.clone());
    use_context_provider(|| services.ui.clone());
    use_context_provider(|| services.api.clone());

    let gui = use_persisted(&services.settings.gui);
    let first_run = use_persisted(&services.settings.first_run);
    let notifications = use_observable(&services.ui.notification_count);

    let on_start = {
        let settings = services.settings.clone();
        move |_| {
            if let Err(err) = settings.first_run.set(false) {
                tracing::warn!(%err, "failed to save first run flag");
            }
        }
    };

    let theme = gui().theme;
    let count = notifications();
    let notification_label = format!(
        "{count} {}",
        numeric_word(count as i64, ["уведомление", "уведомления", "уведомлений"])
    );

    rsx! {
        div { class: "app theme-{theme} min-h-screen",
            header { class: "page-header flex items-center justify-between p-4",
                h1 { class: "page-title", "AniAnglia" }
                span { class: "text-sm text-zinc-400", "{notification_label}" }
            }

            if first_run() {
                section { class: "p-6 space-y-4",
                    p { "Добро пожаловать! Настройте плеер и внешний вид перед началом просмотра." }
                    button { class: "px-4 py-2 rounded-lg bg-emerald-500 text-white", onclick: on_start, "Начать" }
                }
            }

            SettingsView {}
        }
    }
}

impl PartialEq for AppServices {
    fn eq(&self, _other: &Self) -> bool {
        // Built once per app, props never change.
        true
    }
}
