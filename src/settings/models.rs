use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "api-s.anixsekai.com";

/// Login session as stored under `user_token`. Other fields returned by the
/// login call are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StoredToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuiSettings {
    pub theme: String,
    pub release_card_type: String,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            release_card_type: "full-row".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedVolume {
    pub enabled: bool,
    pub last_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hotkeys {
    pub hotkey_play_pause: Vec<String>,
    pub hotkey_next_episode: Vec<String>,
    pub hotkey_prev_episode: Vec<String>,
    pub hotkey_skip_opening: Vec<String>,
    pub hotkey_forward: Vec<String>,
    pub hotkey_backward: Vec<String>,
    pub hotkey_mute: Vec<String>,
    pub hotkey_fullscreen: Vec<String>,
}

fn keys(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|code| code.to_string()).collect()
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            hotkey_play_pause: keys(&["Space"]),
            hotkey_next_episode: keys(&["KeyN"]),
            hotkey_prev_episode: keys(&["KeyB"]),
            hotkey_skip_opening: keys(&["KeyS"]),
            hotkey_forward: keys(&["ArrowRight"]),
            hotkey_backward: keys(&["ArrowLeft"]),
            hotkey_mute: keys(&["KeyM"]),
            hotkey_fullscreen: keys(&["KeyF"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerSettings {
    pub autoplay_episode: bool,
    pub default_aspect_ratio: String,
    pub save_user_volume: SavedVolume,
    pub default_volume: u32,
    pub opacity_interface: u32,
    /// Milliseconds of inactivity before the player chrome hides.
    pub time_hide_interface: u64,
    pub hotkeys: Hotkeys,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            autoplay_episode: true,
            default_aspect_ratio: "16-9".to_string(),
            save_user_volume: SavedVolume::default(),
            default_volume: 50,
            opacity_interface: 50,
            time_hide_interface: 5000,
            hotkeys: Hotkeys::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayingSettings {
    pub default_quality: u32,
    pub default_source: Option<u8>,
    pub disable_history: bool,
}

impl Default for PlayingSettings {
    fn default() -> Self {
        Self {
            default_quality: 1080,
            default_source: None,
            disable_history: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpscaleSettings {
    pub enabled: bool,
    pub mode: u8,
}

impl Default for UpscaleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    pub is_open: bool,
    pub component: Option<String>,
    pub props: serde_json::Value,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            is_open: false,
            component: None,
            props: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_settings_use_web_field_names() {
        let json = serde_json::to_value(PlayerSettings::default()).unwrap();
        assert_eq!(json["autoplayEpisode"], true);
        assert_eq!(json["defaultAspectRatio"], "16-9");
        assert_eq!(json["saveUserVolume"]["lastValue"], serde_json::Value::Null);
        assert_eq!(json["timeHideInterface"], 5000);
        assert_eq!(json["hotkeys"]["hotkeyPlayPause"][0], "Space");
        assert_eq!(json["hotkeys"]["hotkeyFullscreen"][0], "KeyF");
    }

    #[test]
    fn partial_bundle_fills_missing_fields_from_defaults() {
        let playing: PlayingSettings =
            serde_json::from_str(r#"{"defaultQuality":720}"#).unwrap();
        assert_eq!(playing.default_quality, 720);
        assert_eq!(playing.default_source, None);
        assert!(!playing.disable_history);
    }

    #[test]
    fn stored_token_keeps_extra_login_fields() {
        let raw = r#"{"token":"abc","id":7}"#;
        let token: StoredToken = serde_json::from_str(raw).unwrap();
        assert_eq!(token.token, "abc");
        assert_eq!(token.extra["id"], 7);
        assert_eq!(serde_json::to_value(&token).unwrap()["id"], 7);
    }
}
