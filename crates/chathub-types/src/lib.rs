//! Wire protocol and shared domain types for Chat Hub.
//!
//! This crate contains the protocol model exchanged between clients and the
//! hub (message segments, chat payloads/events, commands/results), the
//! persistent record types produced by the session store, the error
//! taxonomy, and the configuration types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod client;
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod segment;
pub mod store;

pub use chat::{ChatEvent, ChatPayload, EventType, Message, Role};
pub use command::{Command, CommandPayload, CommandResult};
pub use segment::Segment;

/// Generate a fresh request identifier (32 lowercase hex characters).
pub fn new_request_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}
