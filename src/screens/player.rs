//! Player screen: video surface, progress bar and transport buttons
//!
//! The screen owns the sampler, which owns the player. It only ever sees
//! the latest [`PlaybackSample`]. Unmounting drops the sampler, which stops
//! sampling and shuts the player down.

use crate::focus::{MenuKey, Platform};
use crate::models::{PlaybackState, PlaybackStatus};
use crate::playback::{PlaybackSample, PlayerError, Sampler};

pub use crate::playback::Transport;

/// Request to open a player for an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPlayer {
    pub generation: u64,
    pub item_id: String,
}

#[derive(Debug, Default)]
pub struct PlayerScreen {
    item_id: Option<String>,
    pub title: String,
    sampler: Option<Sampler>,
    latest: Option<PlaybackSample>,
    generation: u64,
    pub error: Option<String>,
    pub selected: usize,
    pub menu: MenuKey,
}

impl PlayerScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, platform: Platform, item_id: String, title: String) -> OpenPlayer {
        self.unmount();
        self.generation += 1;
        self.item_id = Some(item_id.clone());
        self.title = title;
        // Play/Pause is the natural landing spot
        self.selected = 2;
        if platform.is_tv {
            self.menu.enable();
        }
        OpenPlayer {
            generation: self.generation,
            item_id,
        }
    }

    /// Stop sampling and release the player
    pub fn unmount(&mut self) {
        if self.sampler.is_some() {
            tracing::debug!(item = ?self.item_id, "closing player");
        }
        self.sampler = None;
        self.latest = None;
        self.error = None;
        self.item_id = None;
        self.generation += 1;
        self.menu.release();
    }

    /// Hand over the sampler of a started player. Stale openings are
    /// dropped (and with them the player process).
    pub fn attach(&mut self, generation: u64, sampler: Sampler) -> bool {
        if generation != self.generation {
            return false;
        }
        self.sampler = Some(sampler);
        true
    }

    /// Record a sample taken by the sampler of `generation`
    pub fn apply_sample(&mut self, generation: u64, sample: PlaybackSample) -> bool {
        if generation != self.generation || self.item_id.is_none() {
            return false;
        }
        self.latest = Some(sample);
        true
    }

    pub fn fail(&mut self, generation: u64, error: &PlayerError) -> bool {
        if generation != self.generation {
            return false;
        }
        tracing::warn!(error = %error, "player failed to open");
        self.error = Some(error.to_string());
        true
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.as_ref().is_some_and(Sampler::is_running)
    }

    pub fn has_player(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn state(&self) -> PlaybackState {
        self.latest.map(|s| s.state).unwrap_or_default()
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.error.is_some() {
            PlaybackStatus::Error
        } else if self.latest.is_none() && self.item_id.is_some() {
            PlaybackStatus::Loading
        } else {
            self.state().status
        }
    }

    pub fn fraction(&self) -> f64 {
        self.latest.map(|s| s.fraction).unwrap_or(0.0)
    }

    pub fn select_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_right(&mut self) {
        self.selected = (self.selected + 1).min(Transport::ALL.len() - 1);
    }

    pub fn selected_transport(&self) -> Transport {
        Transport::ALL[self.selected.min(Transport::ALL.len() - 1)]
    }

    /// Hand a transport command to the sampler. The fraction follows with
    /// the sample taken right after the command ran.
    pub fn transport(&mut self, action: Transport) {
        let Some(sampler) = self.sampler.as_ref() else {
            return;
        };
        if !sampler.send(action) {
            tracing::warn!(?action, "player is gone, transport command dropped");
        }
    }
}
