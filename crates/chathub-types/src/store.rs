//! Persistent record types returned by the session store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Role;
use crate::segment::Segment;

/// A persisted chat message.
///
/// `seq` is assigned by the store, strictly increasing in insertion order,
/// and never reused. Records are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub seq: i64,
    pub bot_id: String,
    pub session_id: String,
    pub role: Role,
    pub content: Vec<Segment>,
    pub created_at: DateTime<Utc>,
}

/// A long-term memory entry, unique on `(bot_id, key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMemory {
    pub bot_id: String,
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A per-session configuration entry, unique on `(bot_id, session_id, key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub bot_id: String,
    pub session_id: String,
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
