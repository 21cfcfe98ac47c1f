//! Client core of the AniAnglia anime player: persisted settings, access to
//! the catalog API, display helpers and the offline service worker.

pub mod api;
pub mod bootstrap;
pub mod components;
pub mod logging;
pub mod offline;
pub mod platform;
pub mod settings;
pub mod storage;
pub mod utils;
