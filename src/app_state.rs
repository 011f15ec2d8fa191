//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::api::GestorApi;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,

    /// The client for the GestorBot backend.
    pub api: Arc<dyn GestorApi>,
}

impl AppState {
    /// Create a new [AppState] that talks to the backend through `api`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Sao_Paulo".
    pub fn new(cookie_secret: &str, local_timezone: &str, api: Arc<dyn GestorApi>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            local_timezone: local_timezone.to_owned(),
            api,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
