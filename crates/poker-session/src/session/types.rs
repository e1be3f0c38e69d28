//! Events, commands, and lifecycle state for a room session.

use poker_protocol::RoomCommand;

/// Lifecycle of one logical session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket handshake in progress; sends are queued.
    Connecting,
    /// Socket open; sends go straight out.
    Open,
    /// Session over; sends fail fast.
    Closed,
}

/// Events emitted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Socket opened and the identity announce was sent.
    Opened,
    /// Session ended, with the close code when the server sent one.
    Closed { code: Option<u16> },
    /// The room rejected our display name (error frame or close 4000).
    /// Prompt for a new name and reconnect.
    DuplicateName,
    /// The room cleared all votes; drop any local selection highlight.
    VotesCleared,
    /// The room acknowledged a reveal toggle.
    RevealAcknowledged,
    /// The room acknowledged our exit; the local state has been reset.
    RoomExited,
    /// Transport or server error. The session keeps running unless a
    /// `Closed` follows.
    Error(String),
}

/// Commands sent to the background connection task.
#[derive(Debug)]
pub(crate) enum SessionCommand {
    CastVote {
        vote: String,
        emoji: Option<String>,
    },
    Room(RoomCommand),
    ChangeSettings {
        reveal: bool,
        voting_card: String,
    },
    ChangeScale {
        name: String,
    },
    Close,
}
