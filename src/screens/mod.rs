//! Screen controllers
//!
//! Each screen owns a [`Loader`]: a loading/error/data tri-state tagged
//! with a generation counter. Starting a fetch bumps the generation, and a
//! response is applied only if it carries the current one, so a slow
//! response can never overwrite a newer result.
//!
//! Screens never talk to the network themselves. They hand out
//! [`Request`]s; the event loop runs them with [`Fetch::run`] and feeds the
//! resulting [`Response`] back.

pub mod about;
pub mod home;
pub mod library;
pub mod login;
pub mod player;

use crate::api::{ApiError, ApiResult, MediaClient, Session};
use crate::models::{LibraryItem, SystemInfo};

pub use about::AboutScreen;
pub use home::HomeScreen;
pub use library::LibraryScreen;
pub use login::LoginScreen;
pub use player::PlayerScreen;

// =============================================================================
// Loader
// =============================================================================

/// Tri-state of a screen's data
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

/// Generation-tagged [`LoadState`]
#[derive(Debug, Clone)]
pub struct Loader<T> {
    state: LoadState<T>,
    generation: u64,
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            generation: 0,
        }
    }

    /// Enter `Loading` from any state and return the new generation
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    /// Apply a result if `generation` is still current.
    ///
    /// Returns false (and changes nothing) for stale responses.
    pub fn resolve(&mut self, generation: u64, result: ApiResult<T>, fallback: &str) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale response"
            );
            return false;
        }
        self.state = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(e) => LoadState::Failed(error_message(&e, fallback)),
        };
        true
    }

    /// Forget any in-flight request and return to `Idle`
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = LoadState::Idle;
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable text for an error, or `fallback` when it has none
pub fn error_message(error: &ApiError, fallback: &str) -> String {
    let msg = error.to_string();
    if msg.trim().is_empty() {
        fallback.to_string()
    } else {
        msg
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Work a screen asks the event loop to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Libraries,
    Items(String),
    SignIn {
        server_url: String,
        username: String,
        password: String,
    },
    SystemInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub generation: u64,
    pub fetch: Fetch,
}

/// Outcome of a [`Fetch`]
#[derive(Debug)]
pub enum Payload {
    Libraries(ApiResult<Vec<LibraryItem>>),
    Items(ApiResult<Vec<LibraryItem>>),
    SignIn(ApiResult<Session>),
    SystemInfo(ApiResult<SystemInfo>),
}

#[derive(Debug)]
pub struct Response {
    pub generation: u64,
    pub payload: Payload,
}

impl Fetch {
    /// Perform the request against the media client
    pub async fn run(self, client: &MediaClient) -> Payload {
        match self {
            Fetch::Libraries => Payload::Libraries(client.list_libraries().await),
            Fetch::Items(id) => Payload::Items(client.list_items(&id).await),
            Fetch::SignIn {
                server_url,
                username,
                password,
            } => Payload::SignIn(client.authenticate(&server_url, &username, &password).await),
            Fetch::SystemInfo => Payload::SystemInfo(client.active_system_info().await),
        }
    }
}

impl Request {
    pub async fn run(self, client: &MediaClient) -> Response {
        let generation = self.generation;
        tracing::debug!(generation, fetch = self.fetch_label(), "running request");
        Response {
            generation,
            payload: self.fetch.run(client).await,
        }
    }

    fn fetch_label(&self) -> &'static str {
        match self.fetch {
            Fetch::Libraries => "libraries",
            Fetch::Items(_) => "items",
            Fetch::SignIn { .. } => "sign-in",
            Fetch::SystemInfo => "system-info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_lifecycle() {
        let mut loader: Loader<u32> = Loader::new();
        assert_eq!(loader.state(), &LoadState::Idle);

        let generation = loader.begin();
        assert!(loader.is_loading());
        assert!(loader.resolve(generation, Ok(7), "fallback"));
        assert_eq!(loader.data(), Some(&7));
    }

    #[test]
    fn test_loader_failure_message() {
        let mut loader: Loader<u32> = Loader::new();
        let generation = loader.begin();
        loader.resolve(generation, Err(ApiError::NotAuthenticated), "fallback");
        assert_eq!(
            loader.error(),
            Some("Not signed in. Use Sign in to continue.")
        );
    }

    #[test]
    fn test_error_text_wins_over_fallback() {
        let msg = error_message(&ApiError::Auth("bad password".into()), "Login failed");
        assert_eq!(msg, "Sign in failed: bad password");
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut loader: Loader<&str> = Loader::new();
        let old = loader.begin();
        let new = loader.begin();

        assert!(loader.resolve(new, Ok("new"), ""));
        assert!(!loader.resolve(old, Ok("old"), ""));
        assert_eq!(loader.data(), Some(&"new"));
    }

    #[test]
    fn test_stale_response_while_loading_is_dropped() {
        let mut loader: Loader<&str> = Loader::new();
        let old = loader.begin();
        let new = loader.begin();

        assert!(!loader.resolve(old, Ok("old"), ""));
        assert!(loader.is_loading());
        assert!(loader.resolve(new, Ok("new"), ""));
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let mut loader: Loader<u8> = Loader::new();
        let generation = loader.begin();
        loader.reset();
        assert!(!loader.resolve(generation, Ok(1), ""));
        assert_eq!(loader.state(), &LoadState::Idle);
    }
}
