//! Chat messages, payloads, and events.
//!
//! A `Message` is a role plus an ordered list of segments. Clients send a
//! `ChatPayload` addressed to a bot and session; the hub answers with a
//! `ChatEvent` whose `event` tag decides which optional fields are present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;
use crate::segment::Segment;

/// Author role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A single chat message made of one or more segments (mixed content allowed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Segment>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message from arbitrary segments, timestamped now.
    pub fn new(role: Role, content: Vec<Segment>) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    /// Build a single-segment text message.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, vec![Segment::text(text)])
    }

    /// Build a single-segment text message, parsing the role from a string
    /// such as `"user"`.
    pub fn text_from(role: &str, text: impl Into<String>) -> Result<Self, ProtocolError> {
        let role: Role = role.parse().map_err(ProtocolError::Decode)?;
        Ok(Self::text(role, text))
    }

    /// Concatenate the text of every text segment, ignoring media.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(Segment::as_text)
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A chat request addressed to one bot and session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub bot_id: String,
    pub session_id: String,
    pub message: Message,
    /// Correlation token echoed back in the response.
    #[serde(default = "crate::new_request_id")]
    pub request_id: String,
}

impl ChatPayload {
    /// Build a payload with a freshly generated request id.
    pub fn new(bot_id: impl Into<String>, session_id: impl Into<String>, message: Message) -> Self {
        Self {
            bot_id: bot_id.into(),
            session_id: session_id.into(),
            message,
            request_id: crate::new_request_id(),
        }
    }
}

/// Kind of a chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A complete message.
    Message,
    StreamStart,
    StreamDelta,
    /// End of a stream, carrying the assembled message.
    StreamEnd,
    Error,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Message => write!(f, "message"),
            EventType::StreamStart => write!(f, "stream_start"),
            EventType::StreamDelta => write!(f, "stream_delta"),
            EventType::StreamEnd => write!(f, "stream_end"),
            EventType::Error => write!(f, "error"),
        }
    }
}

/// Event pushed from the hub back to the client.
///
/// Which of `message`, `delta`, and `error` must be present is decided by
/// `event`; see [`ChatEvent::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub event: EventType,
    pub bot_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ChatEvent {
    fn bare(event: EventType, bot_id: &str, session_id: &str, request_id: Option<String>) -> Self {
        Self {
            event,
            bot_id: bot_id.to_string(),
            session_id: session_id.to_string(),
            message: None,
            delta: None,
            error: None,
            request_id,
        }
    }

    /// A complete reply to `payload`.
    pub fn message(payload: &ChatPayload, message: Message) -> Self {
        Self {
            message: Some(message),
            ..Self::bare(
                EventType::Message,
                &payload.bot_id,
                &payload.session_id,
                Some(payload.request_id.clone()),
            )
        }
    }

    /// An error reply to `payload`.
    pub fn error(payload: &ChatPayload, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::bare(
                EventType::Error,
                &payload.bot_id,
                &payload.session_id,
                Some(payload.request_id.clone()),
            )
        }
    }

    /// Opens a streamed reply to `payload`.
    pub fn stream_start(payload: &ChatPayload) -> Self {
        Self::bare(
            EventType::StreamStart,
            &payload.bot_id,
            &payload.session_id,
            Some(payload.request_id.clone()),
        )
    }

    /// One incremental chunk of a streamed reply.
    pub fn stream_delta(payload: &ChatPayload, delta: impl Into<String>) -> Self {
        Self {
            delta: Some(delta.into()),
            ..Self::bare(
                EventType::StreamDelta,
                &payload.bot_id,
                &payload.session_id,
                Some(payload.request_id.clone()),
            )
        }
    }

    /// Closes a streamed reply with the assembled message.
    pub fn stream_end(payload: &ChatPayload, message: Message) -> Self {
        Self {
            message: Some(message),
            ..Self::bare(
                EventType::StreamEnd,
                &payload.bot_id,
                &payload.session_id,
                Some(payload.request_id.clone()),
            )
        }
    }

    /// Check that the fields required by `event` are present.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let missing = match self.event {
            EventType::Message | EventType::StreamEnd if self.message.is_none() => Some("message"),
            EventType::StreamDelta if self.delta.is_none() => Some("delta"),
            EventType::Error if self.error.is_none() => Some("error"),
            _ => None,
        };

        match missing {
            Some(field) => Err(ProtocolError::InvalidEvent {
                event: self.event.to_string(),
                missing: field,
            }),
            None => Ok(()),
        }
    }

    /// Whether this event reports a failure.
    pub fn is_error(&self) -> bool {
        self.event == EventType::Error
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
