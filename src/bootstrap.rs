//! Startup wiring: the services every view reaches through context.

use crate::api::ApiContext;
use crate::platform::Environment;
use crate::settings::{Settings, SettingsError, UiState};
use crate::storage::{open_default_store, KeyValueStore, MemoryStore};
use std::rc::Rc;

#[derive(Clone)]
pub struct AppServices {
    pub settings: Settings,
    pub ui: UiState,
    pub api: ApiContext,
}

impl AppServices {
    /// Loads settings from the durable store and builds the API context.
    ///
    /// Unreadable stored settings are left as they are; the session then runs
    /// on in-memory defaults so nothing overwrites them.
    pub fn bootstrap() -> Result<Self, SettingsError> {
        let store: Rc<dyn KeyValueStore> = match open_default_store() {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(%err, "durable storage unavailable, settings will not persist");
                Rc::new(MemoryStore::new())
            }
        };

        let settings = Settings::load(store).or_else(|err| {
            tracing::error!(%err, "stored settings are unreadable, using defaults for this session");
            Settings::load(Rc::new(MemoryStore::new()))
        })?;

        Ok(Self::with_settings(settings, Environment::detect()))
    }

    pub fn with_settings(settings: Settings, environment: Environment) -> Self {
        let api = ApiContext::new(&settings, environment);
        api.follow_token_changes();
        Self {
            settings,
            ui: UiState::default(),
            api,
        }
    }
}
