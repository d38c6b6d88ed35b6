//! Configuration management for jellytv
//!
//! Handles config file loading/saving. Only preferences live here: the
//! access token and password are never written to disk.
//! Config is stored at ~/.config/jellytv/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Server offered on the login screen when nothing is configured
pub const DEFAULT_SERVER_URL: &str = "https://demo.jellyfin.org/stable";
/// Username offered on the login screen when nothing is configured
pub const DEFAULT_USERNAME: &str = "demo";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server URL prefilled on the login screen
    pub server_url: Option<String>,
    /// Username prefilled on the login screen
    pub username: Option<String>,
    /// Treat the terminal as a TV-class device (remote focus, nav bar)
    pub tv_mode: bool,
    /// Virtual pixels per terminal column, used for responsive layout
    pub cell_width_px: Option<u32>,
    /// Virtual pixels per terminal row
    pub cell_height_px: Option<u32>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Video player command (mpv compatible)
    pub player: Option<String>,
    /// Directory for log files
    pub log_dir: Option<PathBuf>,
    /// Stable identifier sent to the server
    pub device_id: Option<String>,
}

impl Config {
    /// Get default config file path (~/.config/jellytv/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jellytv").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from an explicit path; unreadable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }

    pub fn cell_width_px(&self) -> u32 {
        self.cell_width_px.filter(|w| *w > 0).unwrap_or(16)
    }

    pub fn cell_height_px(&self) -> u32 {
        self.cell_height_px.filter(|h| *h > 0).unwrap_or(32)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.filter(|s| *s > 0).unwrap_or(30))
    }

    pub fn player(&self) -> &str {
        self.player.as_deref().unwrap_or("mpv")
    }

    /// Log directory, defaulting to the platform data dir
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("jellytv")
                .join("logs")
        })
    }

    /// Device id with fallback chain:
    /// 1. Cached id from config file
    /// 2. Fresh UUID (cached and saved, best effort)
    pub fn device_id(&mut self, save_path: Option<&Path>) -> String {
        if let Some(ref id) = self.device_id {
            return id.clone();
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.device_id = Some(id.clone());
        let saved = match save_path {
            Some(path) => self.save_to(path),
            None => self.save(),
        };
        if let Err(e) = saved {
            tracing::debug!(error = %e, "could not persist device id");
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("jellytv-test-{}", uuid::Uuid::new_v4()))
            .join("config.toml")
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(config.username(), DEFAULT_USERNAME);
        assert!(!config.tv_mode);
        assert_eq!(config.cell_width_px(), 16);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.player(), "mpv");
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str("tv_mode = true\ncell_width_px = 20\n").unwrap();
        assert!(config.tv_mode);
        assert_eq!(config.cell_width_px(), 20);
        assert!(config.server_url.is_none());
    }

    #[test]
    fn test_zero_values_fall_back() {
        let config: Config =
            toml::from_str("cell_width_px = 0\nrequest_timeout_secs = 0\n").unwrap();
        assert_eq!(config.cell_width_px(), 16);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_device_id_is_generated_once() {
        let path = temp_config_path();
        let mut config = Config::default();
        let first = config.device_id(Some(&path));
        let second = config.device_id(Some(&path));
        assert_eq!(first, second);

        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.device_id.as_deref(), Some(first.as_str()));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/jellytv/config.toml"));
        assert!(config.device_id.is_none());
    }
}
