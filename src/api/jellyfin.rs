//! Jellyfin REST client
//!
//! Thin request layer over the handful of endpoints jellytv needs. Every
//! call is a single round trip: no retry, no paging, no cache.
//! API docs: https://api.jellyfin.org

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::api::session::Session;
use crate::models::{ItemsResponse, LibraryItem, SystemInfo};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Coarse error classes surfaced to screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotAuthenticated,
    Auth,
    Transport,
}

/// Jellyfin API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not signed in. Use Sign in to continue.")]
    NotAuthenticated,

    #[error("Sign in failed: {0}")]
    Auth(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Server returned {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotAuthenticated => ErrorKind::NotAuthenticated,
            ApiError::Auth(_) => ErrorKind::Auth,
            _ => ErrorKind::Transport,
        }
    }

    /// Re-classify any failure during credential exchange as an auth error
    pub(crate) fn into_auth(self) -> ApiError {
        match self {
            ApiError::Auth(_) => self,
            ApiError::Status { status, .. }
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                ApiError::Auth("invalid username or password".into())
            }
            other => ApiError::Auth(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Client identity
// =============================================================================

/// Client name sent in the `Authorization` header
pub const CLIENT_NAME: &str = "jellytv";

/// How this client introduces itself to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
    pub device_name: String,
    pub device_id: String,
}

impl ClientInfo {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            name: CLIENT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            device_name: "terminal".to_string(),
            device_id: device_id.into(),
        }
    }

    /// `Authorization` header value, with the access token once signed in
    pub fn authorization(&self, token: Option<&str>) -> String {
        let mut header = format!(
            "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
            self.name, self.device_name, self.device_id, self.version
        );
        if let Some(token) = token {
            header.push_str(&format!(", Token=\"{}\"", token));
        }
        header
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct AuthenticateByName<'a> {
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Pw")]
    password: &'a str,
}

/// Result of a successful `AuthenticateByName`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub server_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Jellyfin HTTP client. Stateless: the session is passed to each call.
#[derive(Debug, Clone)]
pub struct JellyfinClient {
    http: reqwest::Client,
    info: ClientInfo,
}

impl JellyfinClient {
    pub fn new(info: ClientInfo) -> Self {
        Self::with_timeout(info, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(info: ClientInfo, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            info,
        }
    }

    pub fn info(&self) -> &ClientInfo {
        &self.info
    }

    fn request(&self, method: Method, session: &Session, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", session.server_url(), endpoint);
        self.http
            .request(method, url)
            .header("Authorization", self.info.authorization(session.access_token()))
            .header("Accept", "application/json")
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(endpoint, status = status.as_u16(), "jellyfin request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
    }

    /// `GET /System/Info/Public`
    pub async fn public_system_info(&self, session: &Session) -> ApiResult<SystemInfo> {
        let endpoint = "/System/Info/Public";
        self.send_json(self.request(Method::GET, session, endpoint), endpoint)
            .await
    }

    /// `POST /Users/AuthenticateByName`
    pub async fn authenticate_by_name(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> ApiResult<AuthenticationResult> {
        let endpoint = "/Users/AuthenticateByName";
        let body = AuthenticateByName { username, password };
        let builder = self.request(Method::POST, session, endpoint).json(&body);
        self.send_json(builder, endpoint).await
    }

    /// `GET /Library/MediaFolders`
    pub async fn media_folders(&self, session: &Session) -> ApiResult<Vec<LibraryItem>> {
        let endpoint = "/Library/MediaFolders";
        let response: ItemsResponse = self
            .send_json(self.request(Method::GET, session, endpoint), endpoint)
            .await?;
        Ok(response.into_items())
    }

    /// `GET /Items?parentId=...`
    pub async fn items(&self, session: &Session, parent_id: &str) -> ApiResult<Vec<LibraryItem>> {
        let endpoint = format!("/Items?parentId={}", urlencoding::encode(parent_id));
        let response: ItemsResponse = self
            .send_json(self.request(Method::GET, session, &endpoint), &endpoint)
            .await?;
        Ok(response.into_items())
    }

    /// `POST /Sessions/Logout`
    pub async fn logout(&self, session: &Session) -> ApiResult<()> {
        let endpoint = "/Sessions/Logout";
        let response = self.request(Method::POST, session, endpoint).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let info = ClientInfo::new("dev-1");
        let anon = info.authorization(None);
        assert!(anon.starts_with("MediaBrowser Client=\"jellytv\""));
        assert!(anon.contains("DeviceId=\"dev-1\""));
        assert!(!anon.contains("Token="));

        let signed = info.authorization(Some("abc"));
        assert!(signed.ends_with(", Token=\"abc\""));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError::NotAuthenticated.kind(), ErrorKind::NotAuthenticated);
        assert_eq!(ApiError::Auth("x".into()).kind(), ErrorKind::Auth);
        assert_eq!(
            ApiError::Status {
                status: 500,
                endpoint: "/Items".into()
            }
            .kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_into_auth_maps_unauthorized() {
        let err = ApiError::Status {
            status: 401,
            endpoint: "/Users/AuthenticateByName".into(),
        }
        .into_auth();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(err.to_string(), "Sign in failed: invalid username or password");
    }

    #[test]
    fn test_into_auth_wraps_transport() {
        let err = ApiError::InvalidUrl("nope".into()).into_auth();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(err.to_string().contains("nope"));
    }
}
