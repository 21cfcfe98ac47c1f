//! Static choices offered by the settings and catalog screens.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectOption<T> {
    pub label: &'static str,
    pub value: T,
}

const fn opt<T>(label: &'static str, value: T) -> SelectOption<T> {
    SelectOption { label, value }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpscalePreset {
    pub label: &'static str,
    pub mode: u8,
    pub description: &'static str,
}

pub const ENDPOINTS: &[SelectOption<&str>] = &[
    opt("api-s.anixsekai.com", "api-s.anixsekai.com"),
    opt("api.anixart.app", "api.anixart.app"),
    opt("api.anixart.tv (Заблокирован в РФ)", "api.anixart.tv"),
];

pub const BOOKMARK_SORTS: &[SelectOption<u8>] = &[
    opt("По дате добавления: сначала новые", 1),
    opt("По дате добавления: сначала старые", 2),
    opt("По алфавиту: A → Z", 5),
    opt("По алфавиту: Z → A", 6),
    opt("По году выхода релиза: сначала новые", 3),
    opt("По году выхода релиза: сначала старые", 4),
];

pub const PRIVACY_OPTIONS: &[SelectOption<u8>] = &[
    opt("Никто", 2),
    opt("Только друзья", 1),
    opt("Все пользователи", 0),
];

pub const PRIVACY_FRIENDS_OPTIONS: &[SelectOption<u8>] =
    &[opt("Никто", 1), opt("Все пользователи", 0)];

pub const SOURCES: &[SelectOption<Option<u8>>] = &[
    opt("Не выбран", None),
    opt("Kodik", Some(0)),
    opt("Libria", Some(1)),
    opt("Sibnet", Some(2)),
];

pub const QUALITIES: &[SelectOption<u32>] = &[
    opt("1080p", 1080),
    opt("720p", 720),
    opt("480p", 480),
    opt("360p", 360),
];

pub const ASPECT_RATIOS: &[SelectOption<&str>] = &[
    opt("16:9", "16-9"),
    opt("4:3", "4-3"),
    opt("Fit", "fit"),
];

pub const PLAYER_SPEEDS: &[SelectOption<f64>] = &[
    opt("0.5x", 0.5),
    opt("1x", 1.0),
    opt("1.5x", 1.5),
    opt("2x", 2.0),
];

pub const COLLECTION_SORTS: &[SelectOption<u8>] = &[
    opt("В закладках", 0),
    opt("Лидеры рейтинга", 1),
    opt("Популярные за год", 2),
    opt("Популярные за сезон", 3),
    opt("Популярные за неделю", 4),
    opt("Недавно добавленные", 5),
    opt("Случайные", 6),
];

pub const THEMES: &[SelectOption<&str>] = &[opt("Темная", "dark"), opt("Светлая", "light")];

pub const UPSCALE_PRESETS: &[UpscalePreset] = &[
    UpscalePreset {
        label: "ModeA [Preset]",
        mode: 14,
        description: "Быстрый пресет с умеренным восстановлением и апскейлом.",
    },
    UpscalePreset {
        label: "ModeB [Preset]",
        mode: 15,
        description: "Сбалансированный пресет с акцентом на детализацию.",
    },
    UpscalePreset {
        label: "ModeC [Preset]",
        mode: 16,
        description: "Качественный пресет с более агрессивным улучшением.",
    },
    UpscalePreset {
        label: "ModeA+A [Preset]",
        mode: 17,
        description: "Расширенный ModeA с дополнительной обработкой.",
    },
    UpscalePreset {
        label: "ModeB+B [Preset]",
        mode: 18,
        description: "Улучшенный ModeB, обеспечивает более высокое качество.",
    },
    UpscalePreset {
        label: "ModeC+A [Preset]",
        mode: 19,
        description: "Комбинированный пресет с высокой чёткостью и восстановлением.",
    },
];

/// Notification channels the profile screen lets users toggle.
pub const AVAILABLE_NOTIFICATIONS: &[&str] = &["myCollection", "relatedRelease", "friend"];

pub fn label_for<T: PartialEq>(options: &[SelectOption<T>], value: &T) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.value == *value)
        .map(|option| option.label)
}

pub fn upscale_preset(mode: u8) -> Option<&'static UpscalePreset> {
    UPSCALE_PRESETS.iter().find(|preset| preset.mode == mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{PlayingSettings, UpscaleSettings, DEFAULT_ENDPOINT};

    #[test]
    fn defaults_are_listed_choices() {
        assert!(ENDPOINTS.iter().any(|option| option.value == DEFAULT_ENDPOINT));
        assert_eq!(
            label_for(QUALITIES, &PlayingSettings::default().default_quality),
            Some("1080p")
        );
        assert_eq!(label_for(SOURCES, &None), Some("Не выбран"));
        assert!(upscale_preset(UpscaleSettings::default().mode).is_some());
    }

    #[test]
    fn label_lookup_misses_unknown_values() {
        assert_eq!(label_for(THEMES, &"sepia"), None);
        assert_eq!(label_for(PLAYER_SPEEDS, &1.5), Some("1.5x"));
        assert!(upscale_preset(3).is_none());
    }

    #[test]
    fn option_values_are_unique() {
        fn assert_unique<T: PartialEq + std::fmt::Debug>(options: &[SelectOption<T>]) {
            for (index, option) in options.iter().enumerate() {
                assert!(
                    options[index + 1..].iter().all(|other| other.value != option.value),
                    "duplicate value {:?}",
                    option.value
                );
            }
        }
        assert_unique(BOOKMARK_SORTS);
        assert_unique(PRIVACY_OPTIONS);
        assert_unique(COLLECTION_SORTS);
        assert_unique(ENDPOINTS);
    }
}
