//! Inbound frame router.
//!
//! Classifies one decoded frame and either updates the state store or
//! translates it into a [`SessionEvent`]. A bad frame is logged and
//! dropped; it never takes the session down with it.

use poker_protocol::server::{reasons, success};
use poker_protocol::{decode_frame, ServerFrame};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::store::RoomStateStore;

use super::types::SessionEvent;

/// What the connection loop should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RouteOutcome {
    Continue,
    /// The server acknowledged our exit; tear the session down.
    Shutdown,
}

/// Route a single inbound text frame.
pub(crate) async fn route_frame(
    text: &str,
    store: &RoomStateStore,
    event_tx: &mpsc::Sender<SessionEvent>,
) -> RouteOutcome {
    let frame = match decode_frame(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "Dropping undecodable frame");
            return RouteOutcome::Continue;
        }
    };

    match frame {
        ServerFrame::Result(results) => {
            debug!(votes = results.votes.len(), reveal = results.reveal, "Room snapshot");
            store.publish_results(results);
        }
        ServerFrame::Settings(settings) => {
            debug!(reveal = settings.reveal, scale = %settings.voting_card, "Room settings");
            store.publish_settings(settings);
        }
        ServerFrame::Error(payload) => {
            if payload.error == reasons::NEW_NAME_NEEDED {
                warn!("Display name rejected by the room");
                let _ = event_tx.send(SessionEvent::DuplicateName).await;
            } else {
                warn!(error = %payload.error, "Room error");
                let _ = event_tx.send(SessionEvent::Error(payload.error)).await;
            }
        }
        ServerFrame::Success(payload) => match payload.success.as_str() {
            success::VOTES_CLEARED => {
                let _ = event_tx.send(SessionEvent::VotesCleared).await;
            }
            success::VOTES_REVEALED => {
                let _ = event_tx.send(SessionEvent::RevealAcknowledged).await;
            }
            success::EXITING_ROOM => {
                info!("Room acknowledged exit");
                let _ = event_tx.send(SessionEvent::RoomExited).await;
                return RouteOutcome::Shutdown;
            }
            other => {
                debug!(code = %other, "Unknown success code, ignored");
            }
        },
        ServerFrame::Unknown { kind } => {
            debug!(kind = %kind, "Unknown message type, ignored");
        }
    }

    RouteOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness() -> (RoomStateStore, mpsc::Sender<SessionEvent>, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (RoomStateStore::new(), tx, rx)
    }

    #[tokio::test]
    async fn result_frame_replaces_the_vote_snapshot() {
        let (store, tx, _rx) = harness();
        let text = r#"{
            "type": "result",
            "roomID": "r1",
            "reveal": true,
            "votingCard": "Fibonacci",
            "votes": {"Alice": {"voter": "Alice", "vote": "5"}}
        }"#;
        let outcome = route_frame(text, &store, &tx).await;
        assert_eq!(outcome, RouteOutcome::Continue);

        let current = store.current_votes();
        assert_eq!(current.room_id, "r1");
        assert_eq!(current.votes["Alice"].vote, "5");
    }

    #[tokio::test]
    async fn settings_frame_replaces_the_settings_snapshot() {
        let (store, tx, _rx) = harness();
        route_frame(
            r#"{"type": "settings", "reveal": true, "votingCard": "Linear"}"#,
            &store,
            &tx,
        )
        .await;

        let current = store.current_settings();
        assert!(current.reveal);
        assert_eq!(current.voting_card, "Linear");
    }

    #[tokio::test]
    async fn new_name_needed_raises_the_duplicate_signal() {
        let (store, tx, mut rx) = harness();
        route_frame(r#"{"type": "error", "error": "New Name Needed"}"#, &store, &tx).await;
        assert_eq!(rx.recv().await, Some(SessionEvent::DuplicateName));
    }

    #[tokio::test]
    async fn other_errors_surface_as_error_events() {
        let (store, tx, mut rx) = harness();
        route_frame(r#"{"type": "error", "error": "room full"}"#, &store, &tx).await;
        assert_eq!(rx.recv().await, Some(SessionEvent::Error("room full".into())));
    }

    #[tokio::test]
    async fn success_codes_map_to_events() {
        let (store, tx, mut rx) = harness();

        route_frame(r#"{"type": "success", "success": "Votes Cleared"}"#, &store, &tx).await;
        assert_eq!(rx.recv().await, Some(SessionEvent::VotesCleared));

        route_frame(r#"{"type": "success", "success": "Votes Revealed"}"#, &store, &tx).await;
        assert_eq!(rx.recv().await, Some(SessionEvent::RevealAcknowledged));
    }

    #[tokio::test]
    async fn exiting_room_shuts_the_session_down() {
        let (store, tx, mut rx) = harness();
        let outcome =
            route_frame(r#"{"type": "success", "success": "Exiting Room"}"#, &store, &tx).await;
        assert_eq!(outcome, RouteOutcome::Shutdown);
        assert_eq!(rx.recv().await, Some(SessionEvent::RoomExited));
    }

    #[tokio::test]
    async fn unknown_success_code_is_ignored() {
        let (store, tx, mut rx) = harness();
        let outcome =
            route_frame(r#"{"type": "success", "success": "Room Renamed"}"#, &store, &tx).await;
        assert_eq!(outcome, RouteOutcome::Continue);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_type_is_ignored() {
        let (store, tx, mut rx) = harness();
        let outcome = route_frame(r#"{"type": "telemetry"}"#, &store, &tx).await;
        assert_eq!(outcome, RouteOutcome::Continue);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_frames_do_not_stop_the_router() {
        let (store, tx, mut rx) = harness();
        assert_eq!(route_frame("{nope", &store, &tx).await, RouteOutcome::Continue);
        assert!(rx.try_recv().is_err());

        // The next valid frame still lands.
        route_frame(
            r#"{"type": "settings", "reveal": false, "votingCard": "Standard"}"#,
            &store,
            &tx,
        )
        .await;
        assert_eq!(store.current_settings().voting_card, "Standard");
    }
}
