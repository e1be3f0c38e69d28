//! Room session client for the planning-poker WebSocket protocol.
//!
//! One logical session per `connect` call: a background task owns the
//! socket, commands flow in over an mpsc channel, lifecycle events flow
//! out over another, and authoritative room state lands in the
//! [`RoomStateStore`] with replay-latest broadcast semantics.

pub mod config;
pub mod identity;
pub mod session;
pub mod store;

pub use config::SessionConfig;
pub use identity::{DetailsStore, FileDetailsStore, MemoryDetailsStore, UserDetails};
pub use session::{RoomSession, SessionEvent, SessionState};
pub use store::RoomStateStore;
