//! Playback progress tracking
//!
//! A [`PlaybackHandle`] is anything that can play, pause, seek and report
//! its position. [`ProgressTracker`] samples a handle to derive the
//! fraction shown by the progress bar, and re-derives it right after every
//! transport command so the bar never lags a button press by a full tick.
//!
//! Handles talk to an external player synchronously. The [`Sampler`] keeps
//! the tracker on tokio's blocking pool so the event loop never waits on it.

pub mod sampler;
#[cfg(unix)]
pub mod mpv;

use thiserror::Error;

use crate::api::Session;
use crate::models::{PlaybackState, PlaybackStatus};

pub use sampler::Sampler;

/// Seconds skipped by the back/forward buttons
pub const SKIP_SECONDS: f64 = 5.0;

/// Errors from player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Player is not responding: {0}")]
    Ipc(String),
    #[error("Playback is not supported on this platform")]
    Unsupported,
    #[error("Nothing to play: {0}")]
    NoSource(String),
}

/// Transport buttons in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Rewind,
    Back,
    PlayPause,
    Forward,
}

impl Transport {
    pub const ALL: [Transport; 4] = [
        Transport::Rewind,
        Transport::Back,
        Transport::PlayPause,
        Transport::Forward,
    ];

    pub fn label(&self, playing: bool) -> &'static str {
        match self {
            Transport::Rewind => "Rewind",
            Transport::Back => "Back 5 sec",
            Transport::PlayPause if playing => "Pause",
            Transport::PlayPause => "Play",
            Transport::Forward => "Forward 5 sec",
        }
    }
}

/// One reading of the player: state plus the derived progress fraction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackSample {
    pub state: PlaybackState,
    pub fraction: f64,
}

/// Transport and sampling surface of a video player
pub trait PlaybackHandle: Send {
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
    fn seek_by(&mut self, delta_seconds: f64) -> Result<(), PlayerError>;
    fn set_position(&mut self, seconds: f64) -> Result<(), PlayerError>;
    /// Current position, `None` while unknown
    fn current_time(&mut self) -> Option<f64>;
    /// Media duration, `None` while unknown
    fn duration(&mut self) -> Option<f64>;
    fn is_playing(&mut self) -> bool;
    fn status(&mut self) -> PlaybackStatus;
}

/// Fraction of the media already played, always within `[0, 1]`.
///
/// Zero whenever the duration is unknown, zero or not finite.
pub fn fraction_complete(position: Option<f64>, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 => {
            let pos = position.filter(|p| p.is_finite()).unwrap_or(0.0);
            (pos / d).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Split a bar of `width` cells into (filled, remaining)
pub fn progress_segments(fraction: f64, width: usize) -> (usize, usize) {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    (filled, width - filled)
}

/// Owns a playback handle and the last sampled state
pub struct ProgressTracker {
    handle: Box<dyn PlaybackHandle>,
    state: PlaybackState,
    fraction: f64,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("state", &self.state)
            .field("fraction", &self.fraction)
            .finish()
    }
}

impl ProgressTracker {
    pub fn new(handle: Box<dyn PlaybackHandle>) -> Self {
        Self {
            handle,
            state: PlaybackState::default(),
            fraction: 0.0,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Read position, duration and status from the handle
    pub fn sample(&mut self) -> PlaybackSample {
        let current = self.handle.current_time();
        let duration = self.handle.duration();
        self.state = PlaybackState {
            is_playing: self.handle.is_playing(),
            status: self.handle.status(),
            current_time_sec: current.unwrap_or(0.0),
            duration_sec: duration.unwrap_or(0.0),
        };
        self.fraction = fraction_complete(current, duration);
        PlaybackSample {
            state: self.state,
            fraction: self.fraction,
        }
    }

    /// Run one transport command
    pub fn apply(&mut self, action: Transport) -> Result<(), PlayerError> {
        match action {
            Transport::Rewind => self.rewind(),
            Transport::Back => self.back(),
            Transport::PlayPause => self.toggle(),
            Transport::Forward => self.forward(),
        }
    }

    /// Jump back to the start
    pub fn rewind(&mut self) -> Result<(), PlayerError> {
        let result = self.handle.set_position(0.0);
        self.sample();
        result
    }

    pub fn back(&mut self) -> Result<(), PlayerError> {
        let result = self.handle.seek_by(-SKIP_SECONDS);
        self.sample();
        result
    }

    pub fn forward(&mut self) -> Result<(), PlayerError> {
        let result = self.handle.seek_by(SKIP_SECONDS);
        self.sample();
        result
    }

    /// Pause when playing, play otherwise
    pub fn toggle(&mut self) -> Result<(), PlayerError> {
        let result = if self.handle.is_playing() {
            self.handle.pause()
        } else {
            self.handle.play()
        };
        self.sample();
        result
    }
}

/// Start `command` on an item's stream and wrap it in a tracker.
///
/// Needs a signed-in session: the stream URL carries the access token.
pub fn open_stream(command: &str, session: &Session, item_id: &str) -> Result<ProgressTracker, PlayerError> {
    let url = session
        .stream_url(item_id)
        .ok_or_else(|| PlayerError::NoSource("sign in to play media".to_string()))?;
    spawn_handle(command, &url).map(ProgressTracker::new)
}

#[cfg(unix)]
fn spawn_handle(command: &str, url: &str) -> Result<Box<dyn PlaybackHandle>, PlayerError> {
    let handle = mpv::MpvHandle::spawn(command, url)?;
    Ok(Box::new(handle))
}

#[cfg(not(unix))]
fn spawn_handle(_command: &str, _url: &str) -> Result<Box<dyn PlaybackHandle>, PlayerError> {
    Err(PlayerError::Unsupported)
}
