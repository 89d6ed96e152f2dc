//! Error types shared across the hub.
//!
//! Protocol, registry and dispatch errors are raised at the edges; store and
//! command errors are folded into failed results and error events by the core.

use thiserror::Error;

/// Errors from encoding or decoding protocol values.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("invalid '{event}' event: missing '{missing}'")]
    InvalidEvent { event: String, missing: &'static str },
}

/// Errors from bot registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("bot '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Dispatch failures. Never returned to callers; rendered into an `error` event.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no such bot: {0}")]
    NoSuchBot(String),
}

/// Errors from session store operations (used by trait definitions in chathub-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from command execution, rendered into a failed `CommandResult`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
