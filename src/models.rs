//! Core data models for jellytv
//!
//! Shapes returned by the Jellyfin server plus the small derived values
//! (viewport metrics, playback state) that drive rendering.

use serde::{Deserialize, Serialize};

// =============================================================================
// Server Data
// =============================================================================

/// A library (media folder) or an item inside one.
///
/// Sourced verbatim from the server, which uses PascalCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
    #[serde(default, rename = "Type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl LibraryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Rendering key: id, then name, then a synthetic index key.
    ///
    /// The index fallback keeps two anonymous entries from colliding.
    pub fn key(&self, index: usize) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("#{}", index))
    }

    /// Name to show on a tile, with a fallback for unnamed entries
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}

/// Paged list envelope (`{"Items": [...], "TotalRecordCount": n}`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Option<Vec<LibraryItem>>,
    #[serde(default)]
    pub total_record_count: Option<u64>,
}

impl ItemsResponse {
    pub fn into_items(self) -> Vec<LibraryItem> {
        self.items.unwrap_or_default()
    }
}

/// Unauthenticated server information from `/System/Info/Public`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemInfo {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub local_address: Option<String>,
}

// =============================================================================
// Viewport
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

/// Size of the display surface in virtual pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub width: u32,
    pub height: u32,
    /// Virtual pixels per terminal column
    pub scale: f32,
    /// Virtual pixels per terminal row
    pub row_scale: f32,
    pub orientation: Orientation,
}

impl ViewportMetrics {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        let orientation = if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        Self {
            width,
            height,
            scale,
            // Terminal cells are roughly twice as tall as they are wide
            row_scale: scale * 2.0,
            orientation,
        }
    }

    /// Project a terminal size (in cells) onto virtual pixels
    pub fn from_terminal(cols: u16, rows: u16, cell_width_px: u32, cell_height_px: u32) -> Self {
        Self {
            row_scale: cell_height_px as f32,
            ..Self::new(
                cols as u32 * cell_width_px,
                rows as u32 * cell_height_px,
                cell_width_px as f32,
            )
        }
    }

    /// Convert a width in virtual pixels back to terminal columns
    pub fn px_to_cols(&self, px: u32) -> u16 {
        if self.scale <= 0.0 {
            return 0;
        }
        (px as f32 / self.scale).floor().min(u16::MAX as f32) as u16
    }

    /// Convert a height in virtual pixels to terminal rows
    pub fn px_to_rows(&self, px: u32) -> u16 {
        if self.row_scale <= 0.0 {
            return 0;
        }
        (px as f32 / self.row_scale).floor().min(u16::MAX as f32) as u16
    }
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self::new(1920, 1080, 16.0)
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Player readiness, gating whether the video surface is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    ReadyToPlay,
    Error,
}

impl PlaybackStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, PlaybackStatus::ReadyToPlay)
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Loading => "loading",
            PlaybackStatus::ReadyToPlay => "readyToPlay",
            PlaybackStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Last sampled state of a playback handle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub status: PlaybackStatus,
    pub current_time_sec: f64,
    pub duration_sec: f64,
}

/// Format seconds as HH:MM:SS or MM:SS
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
