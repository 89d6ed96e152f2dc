//! JSON encoding and decoding of protocol values.
//!
//! Thin wrappers over serde_json that map failures into [`ProtocolError`].
//! Encoding is deterministic: struct fields keep declaration order and JSON
//! objects carried in `data` use sorted keys.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::chat::ChatEvent;
use crate::error::ProtocolError;

/// Encode a protocol value as compact JSON.
pub fn encode<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(value).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decode a protocol value from JSON.
pub fn decode<T: DeserializeOwned>(input: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(input).map_err(|e| ProtocolError::Decode(e.to_string()))
}

/// Decode a chat event and check the fields its `event` tag requires.
pub fn decode_event(input: &str) -> Result<ChatEvent, ProtocolError> {
    let event: ChatEvent = decode(input)?;
    event.validate()?;
    Ok(event)
}
