use crate::api::ApiContext;
use crate::components::use_persisted;
use crate::settings::{Settings, SettingsError};
use crate::utils::{
    check_gpu_support, label_for, upscale_preset, ASPECT_RATIOS, ENDPOINTS, QUALITIES, SOURCES,
    THEMES, UPSCALE_PRESETS,
};
use dioxus::prelude::*;

fn report(result: Result<(), SettingsError>, what: &str) {
    if let Err(err) = result {
        tracing::warn!(%err, "failed to save {what}");
    }
}

#[component]
pub fn SettingsView() -> Element {
    let settings = use_context::<Settings>();
    let api = use_context::<ApiContext>();

    let gui = use_persisted(&settings.gui);
    let endpoint = use_persisted(&settings.endpoint);
    let player = use_persisted(&settings.player);
    let playing = use_persisted(&settings.playing);
    let upscale = use_persisted(&settings.upscale);
    let token = use_persisted(&settings.user_token);
    let gpu_supported = use_resource(|| async move { check_gpu_support().await });

    let on_theme_change = {
        let settings = settings.clone();
        move |evt: FormEvent| {
            let theme = evt.value();
            report(settings.gui.update(|gui| gui.theme = theme), "theme");
        }
    };

    let on_endpoint_change = {
        let settings = settings.clone();
        let api = api.clone();
        move |evt: FormEvent| {
            report(settings.endpoint.set(evt.value()), "endpoint");
            // The live handle keeps its base url until rebuilt.
            api.reinitialize();
        }
    };

    let on_quality_change = {
        let settings = settings.clone();
        move |evt: FormEvent| {
            if let Ok(quality) = evt.value().parse::<u32>() {
                report(
                    settings.playing.update(|playing| playing.default_quality = quality),
                    "quality",
                );
            }
        }
    };

    let on_source_change = {
        let settings = settings.clone();
        move |evt: FormEvent| {
            let source = evt.value().parse::<u8>().ok();
            report(
                settings.playing.update(|playing| playing.default_source = source),
                "source",
            );
        }
    };

    let on_history_toggle = {
        let settings = settings.clone();
        move |_| {
            report(
                settings
                    .playing
                    .update(|playing| playing.disable_history = !playing.disable_history),
                "history toggle",
            );
        }
    };

    let on_aspect_change = {
        let settings = settings.clone();
        move |evt: FormEvent| {
            let ratio = evt.value();
            report(
                settings.player.update(|player| player.default_aspect_ratio = ratio),
                "aspect ratio",
            );
        }
    };

    let on_autoplay_toggle = {
        let settings = settings.clone();
        move |_| {
            report(
                settings
                    .player
                    .update(|player| player.autoplay_episode = !player.autoplay_episode),
                "autoplay",
            );
        }
    };

    let on_reset_player = {
        let settings = settings.clone();
        move |_| report(settings.player.reset(), "player settings")
    };

    let on_upscale_toggle = {
        let settings = settings.clone();
        move |_| {
            report(
                settings
                    .upscale
                    .update(|upscale| upscale.enabled = !upscale.enabled),
                "upscale toggle",
            );
        }
    };

    let on_upscale_mode = {
        let settings = settings.clone();
        move |evt: FormEvent| {
            if let Ok(mode) = evt.value().parse::<u8>() {
                report(
                    settings.upscale.update(|upscale| upscale.mode = mode),
                    "upscale mode",
                );
            }
        }
    };

    let on_log_out = {
        let settings = settings.clone();
        move |_| report(settings.log_out(), "session")
    };

    let gui = gui();
    let endpoint = endpoint();
    let player = player();
    let playing = playing();
    let upscale = upscale();
    let logged_in = token().is_some();
    let gpu_ok = (*gpu_supported.read()).unwrap_or(false);
    let quality_label = label_for(QUALITIES, &playing.default_quality).unwrap_or("не выбрано");
    let preset_description = upscale_preset(upscale.mode)
        .map(|preset| preset.description)
        .unwrap_or("");

    rsx! {
        div { class: "space-y-8 p-6",
            header { class: "page-header",
                h1 { class: "page-title", "Настройки" }
                p { class: "page-subtitle", "Качество по умолчанию: {quality_label}" }
            }

            section { class: "settings-section",
                h2 { class: "text-lg font-semibold mb-4", "Интерфейс" }
                label { class: "block text-sm mb-2", "Тема" }
                select { class: "settings-select", onchange: on_theme_change,
                    for choice in THEMES.iter() {
                        option { value: choice.value, selected: choice.value == gui.theme, "{choice.label}" }
                    }
                }

                label { class: "block text-sm mt-4 mb-2", "Сервер API" }
                select { class: "settings-select", onchange: on_endpoint_change,
                    for choice in ENDPOINTS.iter() {
                        option { value: choice.value, selected: choice.value == endpoint, "{choice.label}" }
                    }
                }
            }

            section { class: "settings-section",
                h2 { class: "text-lg font-semibold mb-4", "Плеер" }
                label { class: "block text-sm mb-2", "Качество" }
                select { class: "settings-select", onchange: on_quality_change,
                    for choice in QUALITIES.iter() {
                        option { value: "{choice.value}", selected: choice.value == playing.default_quality, "{choice.label}" }
                    }
                }

                label { class: "block text-sm mt-4 mb-2", "Источник" }
                select { class: "settings-select", onchange: on_source_change,
                    for choice in SOURCES.iter() {
                        option {
                            value: choice.value.map(|source| source.to_string()).unwrap_or_default(),
                            selected: choice.value == playing.default_source,
                            "{choice.label}"
                        }
                    }
                }

                label { class: "block text-sm mt-4 mb-2", "Соотношение сторон" }
                select { class: "settings-select", onchange: on_aspect_change,
                    for choice in ASPECT_RATIOS.iter() {
                        option { value: choice.value, selected: choice.value == player.default_aspect_ratio, "{choice.label}" }
                    }
                }

                div { class: "flex items-center justify-between mt-4",
                    p { "Автовоспроизведение следующей серии" }
                    button { class: if player.autoplay_episode { "toggle toggle-on" } else { "toggle" }, onclick: on_autoplay_toggle }
                }

                div { class: "flex items-center justify-between mt-4",
                    p { "Не сохранять историю просмотра" }
                    button { class: if playing.disable_history { "toggle toggle-on" } else { "toggle" }, onclick: on_history_toggle }
                }

                button { class: "mt-4 text-sm text-zinc-400", onclick: on_reset_player, "Сбросить настройки плеера" }
            }

            if gpu_ok {
                section { class: "settings-section",
                    h2 { class: "text-lg font-semibold mb-4", "Апскейл" }
                    div { class: "flex items-center justify-between",
                        p { "Улучшение изображения" }
                        button { class: if upscale.enabled { "toggle toggle-on" } else { "toggle" }, onclick: on_upscale_toggle }
                    }
                    if upscale.enabled {
                        select { class: "settings-select mt-4", onchange: on_upscale_mode,
                            for preset in UPSCALE_PRESETS.iter() {
                                option { value: "{preset.mode}", selected: preset.mode == upscale.mode, "{preset.label}" }
                            }
                        }
                        p { class: "text-sm text-zinc-400 mt-2", "{preset_description}" }
                    }
                }
            }

            if logged_in {
                button { class: "px-4 py-2 rounded-lg bg-red-500/20 text-red-400", onclick: on_log_out, "Выйти" }
            }
        }
    }
}
