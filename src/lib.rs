//! jellytv - Jellyfin client for the terminal, built for the couch
//!
//! Browse libraries with a TV remote or a keyboard and play items through
//! an external player, with focus behavior that adapts to TV-class devices.
//!
//! # Modules
//!
//! - `api` - Jellyfin HTTP client and the session-owning media client
//! - `layout` - Responsive tile grid geometry
//! - `focus` - Remote navigation, preferred focus and focus emphasis
//! - `screens` - Per-screen controllers with generation-tagged loading
//! - `playback` - Player handles and progress tracking
//! - `router` - Routes and navigation history
//! - `app` - Application state and key handling
//! - `ui` - TUI rendering

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod focus;
pub mod layout;
pub mod logging;
pub mod models;
pub mod playback;
pub mod router;
pub mod screens;
pub mod ui;

// Re-export commonly used types
pub use models::{LibraryItem, Orientation, PlaybackState, PlaybackStatus, SystemInfo, ViewportMetrics};

pub use api::{ApiError, ClientInfo, ErrorKind, MediaClient, Session};
pub use app::{App, Effect};
pub use focus::{FocusEmphasis, GridFocus, Platform};
pub use layout::{layout_for, GridKind, TileLayout};
pub use playback::{PlaybackHandle, PlaybackSample, ProgressTracker, Sampler, Transport};
pub use router::{Route, Router};
