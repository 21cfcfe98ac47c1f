//! Access to the remote catalog API.
//!
//! [`ApiContext`] is created once at startup and handed to views through the
//! Dioxus context. It builds the [`ApiHandle`] lazily from the persisted token
//! and endpoint settings, and keeps that one instance until told to rebuild.

mod client;

pub use client::ApiHandle;

use crate::platform::Environment;
use crate::settings::{ObserverId, Persisted, Settings, StoredToken};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Clone)]
pub struct ApiContext {
    environment: Environment,
    token: Persisted<Option<StoredToken>>,
    endpoint: Persisted<String>,
    http: reqwest::Client,
    handle: Rc<RefCell<Option<Rc<ApiHandle>>>>,
}

impl ApiContext {
    pub fn new(settings: &Settings, environment: Environment) -> Self {
        Self {
            environment,
            token: settings.user_token.clone(),
            endpoint: settings.endpoint.clone(),
            http: reqwest::Client::new(),
            handle: Rc::new(RefCell::new(None)),
        }
    }

    /// Returns the shared handle, building it on first use.
    ///
    /// Endpoint changes made after the first call are not picked up here, use
    /// [`ApiContext::reinitialize`] for that.
    pub fn handle(&self) -> Option<Rc<ApiHandle>> {
        if self.environment == Environment::Headless {
            return None;
        }

        if let Some(handle) = self.handle.borrow().as_ref() {
            return Some(Rc::clone(handle));
        }

        Some(self.reinitialize())
    }

    /// Builds a new handle from the current settings and replaces the cached one.
    pub fn reinitialize(&self) -> Rc<ApiHandle> {
        let token = self
            .token
            .with(|token| token.as_ref().map(|stored| stored.token.clone()));
        let base_url = self.endpoint.with(|endpoint| format!("https://{endpoint}"));

        let handle = Rc::new(ApiHandle::new(base_url, token, self.http.clone()));
        tracing::info!(base_url = handle.base_url(), id = %handle.id(), "api handle created");
        *self.handle.borrow_mut() = Some(Rc::clone(&handle));
        handle
    }

    /// Swaps the token on the existing handle. Does nothing before the first
    /// handle is built.
    pub fn rotate_token(&self, token: Option<String>) {
        rotate(&self.handle, token);
    }

    /// Keeps the handle's token in step with the persisted session token.
    ///
    /// The observer holds the handle slot weakly, the token container it is
    /// registered on must not keep the context alive.
    pub fn follow_token_changes(&self) -> ObserverId {
        let slot: Weak<RefCell<Option<Rc<ApiHandle>>>> = Rc::downgrade(&self.handle);
        self.token.observe(move |stored| {
            if let Some(slot) = slot.upgrade() {
                rotate(&slot, stored.as_ref().map(|stored| stored.token.clone()));
            }
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.borrow().is_some()
    }
}

fn rotate(slot: &RefCell<Option<Rc<ApiHandle>>>, token: Option<String>) {
    match slot.borrow().as_ref() {
        Some(handle) => {
            handle.set_token(token);
            tracing::debug!(id = %handle.id(), "api token rotated");
        }
        None => tracing::debug!("token rotation skipped, no api handle yet"),
    }
}
