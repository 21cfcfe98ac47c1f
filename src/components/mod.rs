//! The components module contains all shared components for our app.

mod app;
mod hooks;
mod settings_view;

pub use app::*;
pub use hooks::*;
pub use settings_view::*;
