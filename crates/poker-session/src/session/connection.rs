//! Background task owning one WebSocket connection.
//!
//! Runs once per `connect` call: handshake, identity announce, command
//! forwarding, inbound routing, teardown. The command forwarder only
//! starts after the socket opens, so commands issued mid-handshake sit in
//! the channel and flush exactly once.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{error, info, warn};

use poker_protocol::{
    AnnounceFrame, CardChangeFrame, ClientFrame, CommandFrame, SettingsFrame, VoteFrame,
    CLOSE_DUPLICATE_NAME,
};

use crate::config::SessionConfig;
use crate::store::RoomStateStore;

use super::router::{route_frame, RouteOutcome};
use super::types::{SessionCommand, SessionEvent, SessionState};

pub(crate) async fn run_connection(
    config: SessionConfig,
    room_id: String,
    voter: String,
    store: Arc<RoomStateStore>,
    state: Arc<RwLock<SessionState>>,
    event_tx: mpsc::Sender<SessionEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
) {
    let url = config.ws_url(&room_id);
    info!(url = %url, voter = %voter, "Connecting to room");

    let connect = tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        tokio_tungstenite::connect_async(&url),
    )
    .await;

    let (ws_stream, _) = match connect {
        Ok(Ok(pair)) => pair,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to connect to room");
            let _ = event_tx
                .send(SessionEvent::Error(format!("connection failed: {e}")))
                .await;
            *state.write().await = SessionState::Closed;
            let _ = event_tx.send(SessionEvent::Closed { code: None }).await;
            return;
        }
        Err(_elapsed) => {
            error!(
                timeout = config.connect_timeout_secs,
                "Room handshake timed out"
            );
            let _ = event_tx
                .send(SessionEvent::Error("connection timed out".into()))
                .await;
            *state.write().await = SessionState::Closed;
            let _ = event_tx.send(SessionEvent::Closed { code: None }).await;
            return;
        }
    };

    let (ws_write, mut ws_read) = ws_stream.split();
    let ws_write = Arc::new(Mutex::new(ws_write));

    // Announce identity as the very first frame.
    send_frame(
        &ws_write,
        &ClientFrame::Announce(AnnounceFrame {
            name: voter.clone(),
        }),
    )
    .await;

    *state.write().await = SessionState::Open;
    let _ = event_tx.send(SessionEvent::Opened).await;

    // Forward queued and future commands now that the socket is open.
    let cmd_write = Arc::clone(&ws_write);
    let cmd_handle = tokio::spawn(command_forwarder(command_rx, cmd_write, voter));

    let mut close_code: Option<u16> = None;
    let mut duplicate_name = false;
    while let Some(msg_result) = ws_read.next().await {
        match msg_result {
            Ok(WsMessage::Text(text)) => {
                match route_frame(&text, &store, &event_tx).await {
                    RouteOutcome::Continue => {}
                    RouteOutcome::Shutdown => break,
                }
            }
            Ok(WsMessage::Close(frame)) => {
                close_code = frame.as_ref().map(|f| u16::from(f.code));
                if close_code == Some(CLOSE_DUPLICATE_NAME) {
                    duplicate_name = true;
                }
                info!(code = ?close_code, "Room closed the connection");
                break;
            }
            Err(e) => {
                warn!(error = %e, "WebSocket error");
                let _ = event_tx.send(SessionEvent::Error(e.to_string())).await;
                break;
            }
            _ => {}
        }
    }

    // Teardown: no stale handler may outlive the logical session.
    cmd_handle.abort();
    *state.write().await = SessionState::Closed;
    store.reset();
    if duplicate_name {
        let _ = event_tx.send(SessionEvent::DuplicateName).await;
    }
    let _ = event_tx.send(SessionEvent::Closed { code: close_code }).await;
}

async fn send_frame<S>(ws_write: &Arc<Mutex<S>>, frame: &ClientFrame)
where
    S: futures_util::Sink<WsMessage> + Unpin,
{
    if let Ok(json) = serde_json::to_string(frame) {
        let mut writer = ws_write.lock().await;
        let _ = writer.send(WsMessage::Text(json.into())).await;
    }
}

async fn command_forwarder<S>(
    mut command_rx: mpsc::Receiver<SessionCommand>,
    ws_write: Arc<Mutex<S>>,
    voter: String,
) where
    S: futures_util::Sink<WsMessage> + Unpin,
{
    while let Some(cmd) = command_rx.recv().await {
        let frame = match cmd {
            SessionCommand::CastVote { vote, emoji } => ClientFrame::Vote(VoteFrame {
                voter: voter.clone(),
                vote,
                emoji,
            }),
            SessionCommand::Room(command) => ClientFrame::Command(CommandFrame { command }),
            SessionCommand::ChangeSettings {
                reveal,
                voting_card,
            } => ClientFrame::Settings(SettingsFrame::new(reveal, voting_card)),
            SessionCommand::ChangeScale { name } => {
                ClientFrame::CardChange(CardChangeFrame { card: name })
            }
            SessionCommand::Close => {
                let mut writer = ws_write.lock().await;
                let _ = writer.send(WsMessage::Close(None)).await;
                return;
            }
        };
        send_frame(&ws_write, &frame).await;
    }
}
