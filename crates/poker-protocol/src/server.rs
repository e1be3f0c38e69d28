//! Server→client frames and the discriminant-first decode step.
//!
//! Frames carry a `type` string. Decoding reads the discriminant before
//! touching the payload so an unknown `type` never fails the envelope;
//! only a known type with a bad payload is an error.

use std::collections::HashMap;

use poker_common::ProtocolError;
use serde::{Deserialize, Serialize};

/// Application-level close code the server uses to reject a join because
/// the display name is already taken in the room.
pub const CLOSE_DUPLICATE_NAME: u16 = 4000;

/// Known `error` reasons.
pub mod reasons {
    /// The display name is already present in the room; the client should
    /// prompt for a new one and reconnect.
    pub const NEW_NAME_NEEDED: &str = "New Name Needed";
}

/// Known `success` codes.
pub mod success {
    pub const VOTES_CLEARED: &str = "Votes Cleared";
    pub const VOTES_REVEALED: &str = "Votes Revealed";
    pub const EXITING_ROOM: &str = "Exiting Room";
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// One voter's entry in the room snapshot. An empty `vote` means the voter
/// is present but has not voted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub voter: String,
    #[serde(default)]
    pub vote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Authoritative room snapshot pushed on every vote change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsPayload {
    #[serde(rename = "roomID", default)]
    pub room_id: String,
    #[serde(default)]
    pub reveal: bool,
    #[serde(rename = "votingCard", default)]
    pub voting_card: String,
    #[serde(default)]
    pub votes: HashMap<String, VoteEntry>,
}

/// Room-wide configuration, broadcast independently from vote data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPayload {
    #[serde(default)]
    pub reveal: bool,
    #[serde(rename = "votingCard", default)]
    pub voting_card: String,
}

/// Server-reported error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Server acknowledgement of a room command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessPayload {
    pub success: String,
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    Result(ResultsPayload),
    Settings(SettingsPayload),
    Error(ErrorPayload),
    Success(SuccessPayload),
    /// Forward-compatibility: a well-formed frame with a discriminant this
    /// client does not know. Logged and ignored by the router.
    Unknown { kind: String },
}

/// Decode one inbound text frame.
pub fn decode_frame(text: &str) -> Result<ServerFrame, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| ProtocolError::Malformed("missing type field".into()))?
        .to_string();

    match kind.as_str() {
        "result" => Ok(ServerFrame::Result(payload(&kind, value)?)),
        "settings" => Ok(ServerFrame::Settings(payload(&kind, value)?)),
        "error" => Ok(ServerFrame::Error(payload(&kind, value)?)),
        "success" => Ok(ServerFrame::Success(payload(&kind, value)?)),
        _ => Ok(ServerFrame::Unknown { kind }),
    }
}

fn payload<T: serde::de::DeserializeOwned>(
    kind: &str,
    value: serde_json::Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(value)
        .map_err(|e| ProtocolError::Malformed(format!("{kind} payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_result_frame() {
        let text = r#"{
            "type": "result",
            "roomID": "7a6f3f4e-6f6a-4c2e-9df5-0f8f0a9f21aa",
            "reveal": false,
            "votingCard": "Fibonacci",
            "votes": {
                "Alice": {"voter": "Alice", "vote": "5"},
                "Bob": {"voter": "Bob", "vote": "", "emoji": "👀"}
            }
        }"#;
        let frame = decode_frame(text).unwrap();
        let ServerFrame::Result(results) = frame else {
            panic!("expected result frame");
        };
        assert_eq!(results.room_id, "7a6f3f4e-6f6a-4c2e-9df5-0f8f0a9f21aa");
        assert!(!results.reveal);
        assert_eq!(results.voting_card, "Fibonacci");
        assert_eq!(results.votes.len(), 2);
        assert_eq!(results.votes["Alice"].vote, "5");
        assert_eq!(results.votes["Bob"].vote, "");
        assert_eq!(results.votes["Bob"].emoji.as_deref(), Some("👀"));
    }

    #[test]
    fn decode_settings_frame() {
        let frame =
            decode_frame(r#"{"type": "settings", "reveal": true, "votingCard": "Linear"}"#)
                .unwrap();
        assert_eq!(
            frame,
            ServerFrame::Settings(SettingsPayload {
                reveal: true,
                voting_card: "Linear".into(),
            })
        );
    }

    #[test]
    fn decode_error_frame() {
        let frame = decode_frame(r#"{"type": "error", "error": "New Name Needed"}"#).unwrap();
        let ServerFrame::Error(payload) = frame else {
            panic!("expected error frame");
        };
        assert_eq!(payload.error, reasons::NEW_NAME_NEEDED);
    }

    #[test]
    fn decode_success_frame() {
        let frame = decode_frame(r#"{"type": "success", "success": "Votes Cleared"}"#).unwrap();
        let ServerFrame::Success(payload) = frame else {
            panic!("expected success frame");
        };
        assert_eq!(payload.success, success::VOTES_CLEARED);
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        let frame = decode_frame(r#"{"type": "telemetry", "p99": 12}"#).unwrap();
        assert_eq!(
            frame,
            ServerFrame::Unknown {
                kind: "telemetry".into()
            }
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = decode_frame("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn missing_discriminant_is_rejected() {
        let err = decode_frame(r#"{"reveal": true}"#).unwrap_err();
        assert!(err.to_string().contains("missing type field"));
    }

    #[test]
    fn known_type_with_bad_payload_is_rejected() {
        // `error` frames require a string reason.
        let err = decode_frame(r#"{"type": "error", "error": 17}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn result_defaults_apply_to_missing_fields() {
        let frame = decode_frame(r#"{"type": "result"}"#).unwrap();
        let ServerFrame::Result(results) = frame else {
            panic!("expected result frame");
        };
        assert_eq!(results, ResultsPayload::default());
    }
}
