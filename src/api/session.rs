//! Session manager
//!
//! [`MediaClient`] owns at most one [`Session`] for the lifetime of the
//! application. It is shared by `Arc` rather than living in a global, so
//! tests can build as many independent instances as they like.

use std::sync::RwLock;
use std::time::Duration;

use crate::api::jellyfin::{ApiError, ApiResult, ClientInfo, JellyfinClient};
use crate::models::{LibraryItem, SystemInfo};

/// Binding between the app and one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    server_url: String,
    access_token: Option<String>,
    user_id: Option<String>,
    user_name: Option<String>,
}

impl Session {
    /// Unauthenticated session bound to `server_url`
    pub fn connect(server_url: &str) -> ApiResult<Self> {
        Ok(Self {
            server_url: normalize_server_url(server_url)?,
            access_token: None,
            user_id: None,
            user_name: None,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Direct-play URL for an item, usable by an external player
    pub fn stream_url(&self, item_id: &str) -> Option<String> {
        let token = self.access_token.as_deref()?;
        Some(format!(
            "{}/Videos/{}/stream?static=true&api_key={}",
            self.server_url,
            urlencoding::encode(item_id),
            urlencoding::encode(token)
        ))
    }
}

/// Validate a user-entered server URL and strip trailing slashes
pub fn normalize_server_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidUrl("server URL is empty".into()));
    }
    let parsed =
        reqwest::Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ApiError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}

/// Media-server facade with one application-scoped session slot
#[derive(Debug)]
pub struct MediaClient {
    api: JellyfinClient,
    session: RwLock<Option<Session>>,
}

impl MediaClient {
    pub fn new(info: ClientInfo) -> Self {
        Self::from_api(JellyfinClient::new(info))
    }

    pub fn with_timeout(info: ClientInfo, timeout: Duration) -> Self {
        Self::from_api(JellyfinClient::with_timeout(info, timeout))
    }

    fn from_api(api: JellyfinClient) -> Self {
        Self {
            api,
            session: RwLock::new(None),
        }
    }

    fn store(&self, session: Option<Session>) {
        let mut slot = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot = session;
    }

    fn current(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Bind a fresh, unauthenticated session to `server_url`, replacing any
    /// existing one.
    pub fn connect(&self, server_url: &str) -> ApiResult<Session> {
        let session = Session::connect(server_url)?;
        tracing::debug!(server = session.server_url(), "connected");
        self.store(Some(session.clone()));
        Ok(session)
    }

    /// Connect, then exchange credentials.
    ///
    /// Any failure leaves no session behind: reads afterwards fail with
    /// [`ApiError::NotAuthenticated`].
    pub async fn authenticate(
        &self,
        server_url: &str,
        username: &str,
        password: &str,
    ) -> ApiResult<Session> {
        let connected = match self.connect(server_url) {
            Ok(session) => session,
            Err(e) => {
                self.store(None);
                return Err(e.into_auth());
            }
        };

        let result = match self
            .api
            .authenticate_by_name(&connected, username, password)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(server = connected.server_url(), error = %e, "authentication failed");
                self.store(None);
                return Err(e.into_auth());
            }
        };

        let Some(token) = result.access_token.filter(|t| !t.is_empty()) else {
            self.store(None);
            return Err(ApiError::Auth("server returned no access token".into()));
        };

        let user = result.user;
        let session = Session {
            access_token: Some(token),
            user_id: user.as_ref().and_then(|u| u.id.clone()),
            user_name: user.and_then(|u| u.name).or_else(|| Some(username.to_string())),
            ..connected
        };
        tracing::info!(
            server = session.server_url(),
            user = session.user_name().unwrap_or_default(),
            "signed in"
        );
        self.store(Some(session.clone()));
        Ok(session)
    }

    /// Best-effort remote sign out. The local session is always cleared.
    pub async fn logout(&self) {
        let Some(session) = self.current() else {
            return;
        };
        if session.is_authenticated() {
            if let Err(e) = self.api.logout(&session).await {
                tracing::warn!(error = %e, "remote logout failed, clearing local session anyway");
            }
        }
        self.store(None);
        tracing::info!("signed out");
    }

    /// The current session, connected or signed in
    pub fn active_session(&self) -> ApiResult<Session> {
        self.current().ok_or(ApiError::NotAuthenticated)
    }

    fn signed_in(&self) -> ApiResult<Session> {
        self.current()
            .filter(Session::is_authenticated)
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Connect to `server_url` and read its public information
    pub async fn public_system_info(&self, server_url: &str) -> ApiResult<SystemInfo> {
        let session = self.connect(server_url)?;
        self.api.public_system_info(&session).await
    }

    /// Public information for the server of the active session
    pub async fn active_system_info(&self) -> ApiResult<SystemInfo> {
        let session = self.active_session()?;
        self.api.public_system_info(&session).await
    }

    /// Top-level media folders of the signed-in user
    pub async fn list_libraries(&self) -> ApiResult<Vec<LibraryItem>> {
        let session = self.signed_in()?;
        self.api.media_folders(&session).await
    }

    /// Items under one library
    pub async fn list_items(&self, library_id: &str) -> ApiResult<Vec<LibraryItem>> {
        let session = self.signed_in()?;
        self.api.items(&session, library_id).await
    }

    pub fn info(&self) -> &ClientInfo {
        self.api.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::jellyfin::ErrorKind;

    fn client() -> MediaClient {
        MediaClient::new(ClientInfo::new("test-device"))
    }

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(
            normalize_server_url(" https://demo.jellyfin.org/stable/ ").unwrap(),
            "https://demo.jellyfin.org/stable"
        );
        assert!(normalize_server_url("").is_err());
        assert!(normalize_server_url("not a url").is_err());
        assert!(normalize_server_url("ftp://host").is_err());
    }

    #[test]
    fn test_connect_replaces_session() {
        let client = client();
        client.connect("http://one.local").unwrap();
        client.connect("http://two.local").unwrap();
        let session = client.active_session().unwrap();
        assert_eq!(session.server_url(), "http://two.local");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_no_session_is_not_authenticated() {
        let client = client();
        let err = client.active_session().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_reads_need_sign_in_even_when_connected() {
        let client = client();
        client.connect("http://one.local").unwrap();
        let err = client.list_libraries().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_logout_without_session_is_noop() {
        let client = client();
        client.logout().await;
        assert!(client.active_session().is_err());
    }

    #[test]
    fn test_stream_url_requires_token() {
        let session = Session::connect("http://host:8096").unwrap();
        assert_eq!(session.stream_url("abc"), None);
    }
}
