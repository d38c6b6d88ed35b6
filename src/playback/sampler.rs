//! Background playback sampler
//!
//! Owns a [`ProgressTracker`] inside a task. Once per period, and right
//! after each transport command, the tracker runs on the blocking pool and
//! the resulting [`PlaybackSample`] goes out on a channel. Player IPC can
//! take as long as its socket timeout, so none of it happens on the event
//! loop. Dropping the [`Sampler`] aborts the task, which drops the tracker
//! and with it the player.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::{PlaybackSample, ProgressTracker, Transport};

/// Sampling period of the progress bar
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Sampler {
    commands: UnboundedSender<Transport>,
    task: JoinHandle<()>,
}

impl Sampler {
    /// Start sampling `tracker`. The first sample is taken immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T, F>(tracker: ProgressTracker, period: Duration, tx: UnboundedSender<T>, make: F) -> Self
    where
        T: Send + 'static,
        F: Fn(PlaybackSample) -> T + Send + 'static,
    {
        let (commands, mut pending) = mpsc::unbounded_channel::<Transport>();
        let task = tokio::spawn(async move {
            let mut tracker = tracker;
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let command = tokio::select! {
                    _ = ticker.tick() => None,
                    command = pending.recv() => match command {
                        Some(action) => Some(action),
                        None => break,
                    },
                };
                let run = tokio::task::spawn_blocking(move || {
                    if let Some(action) = command {
                        if let Err(e) = tracker.apply(action) {
                            tracing::warn!(error = %e, ?action, "transport command failed");
                        }
                    }
                    let sample = tracker.sample();
                    (tracker, sample)
                });
                let sample = match run.await {
                    Ok((returned, sample)) => {
                        tracker = returned;
                        sample
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "playback sampling stopped");
                        break;
                    }
                };
                if tx.send(make(sample)).is_err() {
                    break;
                }
            }
        });
        Self { commands, task }
    }

    /// Queue a transport command. A fresh sample follows once it ran.
    pub fn send(&self, action: Transport) -> bool {
        self.commands.send(action).is_ok()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
