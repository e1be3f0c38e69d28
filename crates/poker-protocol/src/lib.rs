//! Wire protocol for the planning-poker room WebSocket.
//!
//! JSON text frames over one socket per room. Outbound (client) frames are
//! discriminated implicitly by shape; inbound (server) frames carry a
//! `type` string discriminant. The transport and routing layers live in
//! `poker-session`; this crate only defines the shapes and the decode step.

pub mod client;
pub mod server;

pub use client::{
    AnnounceFrame, CardChangeFrame, ClientFrame, CommandFrame, RoomCommand, SettingsFrame,
    VoteFrame,
};
pub use server::{
    decode_frame, ErrorPayload, ResultsPayload, ServerFrame, SettingsPayload, SuccessPayload,
    VoteEntry, CLOSE_DUPLICATE_NAME,
};
