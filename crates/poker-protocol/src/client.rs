//! Client→server frames.
//!
//! The server discriminates these by shape, not by a tag field, so each
//! frame serializes to exactly the object the server expects. The one
//! exception is the settings frame, which carries `type: "settings"`.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Identity announcement, sent as the very first frame after the socket
/// opens. The server uses it to register the voter in the room.
#[derive(Debug, Clone, Serialize)]
pub struct AnnounceFrame {
    pub name: String,
}

/// A cast (or re-cast) vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteFrame {
    pub voter: String,
    pub vote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Room-wide commands, echoed back to every participant by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoomCommand {
    #[serde(rename = "Exit_room")]
    ExitRoom,
    #[serde(rename = "Reveal_votes")]
    RevealVotes,
    #[serde(rename = "Clear_votes")]
    ClearVotes,
}

/// Envelope for a [`RoomCommand`].
#[derive(Debug, Clone, Serialize)]
pub struct CommandFrame {
    pub command: RoomCommand,
}

/// Marker for the `type` field on settings frames.
#[derive(Debug, Clone, Copy, Serialize)]
enum SettingsTag {
    #[serde(rename = "settings")]
    Settings,
}

/// Room settings change (reveal flag plus active voting scale).
#[derive(Debug, Clone, Serialize)]
pub struct SettingsFrame {
    #[serde(rename = "type")]
    tag: SettingsTag,
    pub reveal: bool,
    #[serde(rename = "votingCard")]
    pub voting_card: String,
}

impl SettingsFrame {
    pub fn new(reveal: bool, voting_card: impl Into<String>) -> Self {
        Self {
            tag: SettingsTag::Settings,
            reveal,
            voting_card: voting_card.into(),
        }
    }
}

/// Voting scale change for the whole room.
#[derive(Debug, Clone, Serialize)]
pub struct CardChangeFrame {
    #[serde(rename = "Card_Change")]
    pub card: String,
}

/// Any outbound frame. Untagged: serializes to the active variant's shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ClientFrame {
    Announce(AnnounceFrame),
    Vote(VoteFrame),
    Command(CommandFrame),
    Settings(SettingsFrame),
    CardChange(CardChangeFrame),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(frame: &ClientFrame) -> serde_json::Value {
        serde_json::to_value(frame).unwrap()
    }

    #[test]
    fn announce_frame_shape() {
        let frame = ClientFrame::Announce(AnnounceFrame {
            name: "Alice".into(),
        });
        assert_eq!(encode(&frame), json!({"name": "Alice"}));
    }

    #[test]
    fn vote_frame_shape() {
        let frame = ClientFrame::Vote(VoteFrame {
            voter: "Alice".into(),
            vote: "8".into(),
            emoji: None,
        });
        assert_eq!(encode(&frame), json!({"voter": "Alice", "vote": "8"}));
    }

    #[test]
    fn vote_frame_with_emoji() {
        let frame = ClientFrame::Vote(VoteFrame {
            voter: "Bob".into(),
            vote: "☕".into(),
            emoji: Some("🎉".into()),
        });
        assert_eq!(
            encode(&frame),
            json!({"voter": "Bob", "vote": "☕", "emoji": "🎉"})
        );
    }

    #[test]
    fn command_frame_shapes() {
        let cases = [
            (RoomCommand::ExitRoom, "Exit_room"),
            (RoomCommand::RevealVotes, "Reveal_votes"),
            (RoomCommand::ClearVotes, "Clear_votes"),
        ];
        for (command, expected) in cases {
            let frame = ClientFrame::Command(CommandFrame { command });
            assert_eq!(encode(&frame), json!({"command": expected}));
        }
    }

    #[test]
    fn settings_frame_shape() {
        let frame = ClientFrame::Settings(SettingsFrame::new(true, "Fibonacci"));
        assert_eq!(
            encode(&frame),
            json!({"type": "settings", "reveal": true, "votingCard": "Fibonacci"})
        );
    }

    #[test]
    fn card_change_frame_shape() {
        let frame = ClientFrame::CardChange(CardChangeFrame {
            card: "T-Shirt Sizes".into(),
        });
        assert_eq!(encode(&frame), json!({"Card_Change": "T-Shirt Sizes"}));
    }
}
