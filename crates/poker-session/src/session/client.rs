//! Public handle for one room session.

use std::sync::Arc;

use poker_common::SessionError;
use poker_protocol::RoomCommand;
use tokio::sync::{mpsc, RwLock};

use crate::config::SessionConfig;
use crate::store::RoomStateStore;

use super::connection::run_connection;
use super::types::{SessionCommand, SessionEvent, SessionState};

/// Handle for one logical room session.
///
/// All methods are non-blocking and hand commands to the background
/// connection task. Commands sent before the socket opens are queued and
/// flushed exactly once on open; commands sent after the session closed
/// fail fast with [`SessionError::NotConnected`].
pub struct RoomSession {
    command_tx: mpsc::Sender<SessionCommand>,
    state: Arc<RwLock<SessionState>>,
}

impl RoomSession {
    /// Start a fresh logical session and return `(handle, events)`.
    ///
    /// No automatic reconnection: when the session ends the caller
    /// decides whether to call `connect` again, which starts over with
    /// fresh channels, so handlers of a previous session never fire into
    /// the new one.
    pub fn connect(
        config: SessionConfig,
        room_id: &str,
        voter: &str,
        store: Arc<RoomStateStore>,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let state = Arc::new(RwLock::new(SessionState::Connecting));

        tokio::spawn(run_connection(
            config,
            room_id.to_string(),
            voter.to_string(),
            store,
            Arc::clone(&state),
            event_tx,
            command_rx,
        ));

        (Self { command_tx, state }, event_rx)
    }

    /// Clone the command sender to create a lightweight handle onto the
    /// same session.
    pub fn clone_sender(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            state: Arc::clone(&self.state),
        }
    }

    /// Cast (or re-cast) a vote.
    pub async fn cast_vote(&self, vote: &str, emoji: Option<&str>) -> Result<(), SessionError> {
        self.dispatch(SessionCommand::CastVote {
            vote: vote.to_string(),
            emoji: emoji.map(str::to_string),
        })
        .await
    }

    /// Ask the room to reveal all votes.
    pub async fn reveal_votes(&self) -> Result<(), SessionError> {
        self.dispatch(SessionCommand::Room(RoomCommand::RevealVotes)).await
    }

    /// Ask the room to clear all votes.
    pub async fn clear_votes(&self) -> Result<(), SessionError> {
        self.dispatch(SessionCommand::Room(RoomCommand::ClearVotes)).await
    }

    /// Leave the room. The server acknowledges with an exit success frame
    /// and the session tears itself down.
    pub async fn exit_room(&self) -> Result<(), SessionError> {
        self.dispatch(SessionCommand::Room(RoomCommand::ExitRoom)).await
    }

    /// Push a room-wide settings change.
    pub async fn change_settings(
        &self,
        reveal: bool,
        voting_card: &str,
    ) -> Result<(), SessionError> {
        self.dispatch(SessionCommand::ChangeSettings {
            reveal,
            voting_card: voting_card.to_string(),
        })
        .await
    }

    /// Switch the room to a different voting scale.
    pub async fn change_scale(&self, name: &str) -> Result<(), SessionError> {
        self.dispatch(SessionCommand::ChangeScale {
            name: name.to_string(),
        })
        .await
    }

    /// Close the session locally without exiting the room on the server.
    pub async fn close(&self) {
        let _ = self.command_tx.send(SessionCommand::Close).await;
    }

    /// Whether the socket is currently open.
    pub async fn is_open(&self) -> bool {
        *self.state.read().await == SessionState::Open
    }

    async fn dispatch(&self, command: SessionCommand) -> Result<(), SessionError> {
        if *self.state.read().await == SessionState::Closed {
            return Err(SessionError::NotConnected);
        }
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::NotConnected)
    }
}
