//! Last-known room state with replay-latest broadcast.
//!
//! Backed by `tokio::sync::watch`: new subscribers immediately observe the
//! current snapshot. `reset` burns the channels and replaces them so
//! nothing from a terminated session can leak into the next one, even
//! under rapid connect/disconnect cycling.

use std::sync::{Mutex, MutexGuard};

use poker_consensus::scales;
use poker_protocol::{ResultsPayload, SettingsPayload};
use tokio::sync::watch;

fn default_results() -> ResultsPayload {
    ResultsPayload {
        voting_card: scales::DEFAULT.name.to_string(),
        ..Default::default()
    }
}

fn default_settings() -> SettingsPayload {
    SettingsPayload {
        reveal: false,
        voting_card: scales::DEFAULT.name.to_string(),
    }
}

struct Channels {
    votes: watch::Sender<ResultsPayload>,
    settings: watch::Sender<SettingsPayload>,
}

impl Channels {
    fn new() -> Self {
        Self {
            votes: watch::Sender::new(default_results()),
            settings: watch::Sender::new(default_settings()),
        }
    }
}

/// Single source of truth for the room snapshot pushed by the server.
pub struct RoomStateStore {
    inner: Mutex<Channels>,
}

impl RoomStateStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Channels::new()),
        }
    }

    fn channels(&self) -> MutexGuard<'_, Channels> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Subscribe to vote snapshots. The receiver starts at the current
    /// value.
    pub fn votes(&self) -> watch::Receiver<ResultsPayload> {
        self.channels().votes.subscribe()
    }

    /// Subscribe to room settings. The receiver starts at the current
    /// value.
    pub fn settings(&self) -> watch::Receiver<SettingsPayload> {
        self.channels().settings.subscribe()
    }

    /// Current vote snapshot without subscribing.
    pub fn current_votes(&self) -> ResultsPayload {
        self.channels().votes.borrow().clone()
    }

    /// Current settings without subscribing.
    pub fn current_settings(&self) -> SettingsPayload {
        self.channels().settings.borrow().clone()
    }

    pub(crate) fn publish_results(&self, results: ResultsPayload) {
        self.channels().votes.send_replace(results);
    }

    pub(crate) fn publish_settings(&self, settings: SettingsPayload) {
        self.channels().settings.send_replace(settings);
    }

    /// Burn and replace: push one final default snapshot to existing
    /// subscribers, terminate their streams, and start fresh channels for
    /// the next session.
    pub fn reset(&self) {
        let mut channels = self.channels();
        channels.votes.send_replace(default_results());
        channels.settings.send_replace(default_settings());
        // Dropping the old senders closes the old receivers.
        *channels = Channels::new();
    }
}

impl Default for RoomStateStore {
    fn default() -> Self {
        Self::new()
    }
}
