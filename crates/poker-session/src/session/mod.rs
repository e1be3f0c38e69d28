//! One logical WebSocket session per `connect` call.
//!
//! The handle sends semantic commands to a background task owning the
//! socket; the task announces the voter's identity on open, routes every
//! inbound frame, and resets the state store when the session ends. No
//! automatic reconnection: the caller decides if and when to connect
//! again, and every connect starts with fresh channels.

mod client;
mod connection;
mod router;
mod types;


pub use client::RoomSession;
pub use types::{SessionEvent, SessionState};
