//! Settings registry: every persisted setting plus the transient UI state.

mod models;
mod reactive;

pub use models::*;
pub use reactive::{Observable, ObserverId, Persisted};

use crate::storage::{KeyValueStore, StoreError};
use std::rc::Rc;
use thiserror::Error;

pub const USER_TOKEN_KEY: &str = "user_token";
pub const GUI_SETTINGS_KEY: &str = "guiSettings";
pub const ENDPOINT_KEY: &str = "endpointUrl";
pub const PLAYER_SETTINGS_KEY: &str = "playerSettings";
pub const PLAYING_SETTINGS_KEY: &str = "playingSettings";
pub const UPSCALE_SETTINGS_KEY: &str = "upscaleSettings";
pub const FIRST_RUN_KEY: &str = "first_run";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored value for `{key}` is malformed: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

/// All durable settings, each persisted under its own key.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_token: Persisted<Option<StoredToken>>,
    pub gui: Persisted<GuiSettings>,
    pub endpoint: Persisted<String>,
    pub player: Persisted<PlayerSettings>,
    pub playing: Persisted<PlayingSettings>,
    pub upscale: Persisted<UpscaleSettings>,
    pub first_run: Persisted<bool>,
}

impl Settings {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Result<Self, SettingsError> {
        Ok(Self {
            user_token: Persisted::load(store.clone(), USER_TOKEN_KEY, None)?,
            gui: Persisted::load(store.clone(), GUI_SETTINGS_KEY, GuiSettings::default())?,
            endpoint: Persisted::load(store.clone(), ENDPOINT_KEY, DEFAULT_ENDPOINT.to_string())?,
            player: Persisted::load(
                store.clone(),
                PLAYER_SETTINGS_KEY,
                PlayerSettings::default(),
            )?,
            playing: Persisted::load(
                store.clone(),
                PLAYING_SETTINGS_KEY,
                PlayingSettings::default(),
            )?,
            upscale: Persisted::load(
                store.clone(),
                UPSCALE_SETTINGS_KEY,
                UpscaleSettings::default(),
            )?,
            first_run: Persisted::load(store, FIRST_RUN_KEY, true)?,
        })
    }

    pub fn token(&self) -> Option<String> {
        self.user_token
            .with(|token| token.as_ref().map(|stored| stored.token.clone()))
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_token.with(Option::is_some)
    }

    pub fn log_out(&self) -> Result<(), SettingsError> {
        self.user_token.set(None)
    }
}

/// Session-only state shared across views.
#[derive(Debug, Clone)]
pub struct UiState {
    pub notification_count: Observable<u32>,
    pub page_history: Observable<Vec<String>>,
    pub current_page: Observable<String>,
    pub mobile_menu_open: Observable<bool>,
    pub modal: Observable<ModalState>,
    pub profile_info: Observable<Option<serde_json::Value>>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            notification_count: Observable::new(0),
            page_history: Observable::new(Vec::new()),
            current_page: Observable::new("home".to_string()),
            mobile_menu_open: Observable::new(false),
            modal: Observable::new(ModalState::default()),
            profile_info: Observable::new(None),
        }
    }
}

impl UiState {
    /// Moves to `page`, pushing the current one onto the history.
    pub fn navigate_to(&self, page: impl Into<String>) {
        let page = page.into();
        let previous = self.current_page.get();
        if previous == page {
            return;
        }
        self.page_history.update(|history| history.push(previous));
        self.current_page.set(page);
        self.mobile_menu_open.set(false);
    }

    pub fn go_back(&self) -> Option<String> {
        let mut previous = None;
        self.page_history.update(|history| previous = history.pop());
        if let Some(page) = &previous {
            self.current_page.set(page.clone());
        }
        previous
    }

    pub fn open_modal(&self, component: impl Into<String>, props: serde_json::Value) {
        self.modal.set(ModalState {
            is_open: true,
            component: Some(component.into()),
            props,
        });
    }

    pub fn close_modal(&self) {
        self.modal.set(ModalState::default());
    }
}
