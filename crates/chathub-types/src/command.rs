//! Control commands sent from clients to the hub.
//!
//! Commands are an internally tagged union on `type`. Known tags decode
//! strictly (missing fields are an error); a well-formed object whose tag is
//! not known to this build decodes into [`Command::Unknown`] so newer clients
//! get a failed `CommandResult` instead of a transport-level rejection.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear the short-term context (message history) of the session.
    ClearContext,
    /// Clear the bot's long-term memory.
    ClearMemory,
    /// Set the session's context window length. No range is enforced.
    SetContextLength { length: i64 },
    /// A tag this build does not recognize. The remaining fields are kept so
    /// the object re-encodes unchanged.
    Unknown {
        command_type: String,
        fields: Map<String, Value>,
    },
}

/// Wire form of the commands this build understands.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum KnownCommand {
    ClearContext,
    ClearMemory,
    SetContextLength { length: i64 },
}

const KNOWN_TAGS: &[&str] = &["clear_context", "clear_memory", "set_context_length"];

impl Command {
    /// The wire tag of this command.
    pub fn type_name(&self) -> &str {
        match self {
            Command::ClearContext => "clear_context",
            Command::ClearMemory => "clear_memory",
            Command::SetContextLength { .. } => "set_context_length",
            Command::Unknown { command_type, .. } => command_type,
        }
    }
}

impl From<KnownCommand> for Command {
    fn from(known: KnownCommand) -> Self {
        match known {
            KnownCommand::ClearContext => Command::ClearContext,
            KnownCommand::ClearMemory => Command::ClearMemory,
            KnownCommand::SetContextLength { length } => Command::SetContextLength { length },
        }
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Command::ClearContext => KnownCommand::ClearContext.serialize(serializer),
            Command::ClearMemory => KnownCommand::ClearMemory.serialize(serializer),
            Command::SetContextLength { length } => {
                KnownCommand::SetContextLength { length: *length }.serialize(serializer)
            }
            Command::Unknown {
                command_type,
                fields,
            } => {
                let mut map = fields.clone();
                map.insert("type".to_string(), Value::String(command_type.clone()));
                map.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?
            .to_string();

        if KNOWN_TAGS.contains(&tag.as_str()) {
            KnownCommand::deserialize(value)
                .map(Command::from)
                .map_err(D::Error::custom)
        } else {
            let Value::Object(mut fields) = value else {
                return Err(D::Error::custom("command must be a JSON object"));
            };
            fields.remove("type");
            Ok(Command::Unknown {
                command_type: tag,
                fields,
            })
        }
    }
}

/// A command addressed to one bot and session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub bot_id: String,
    pub session_id: String,
    pub command: Command,
    #[serde(default = "crate::new_request_id")]
    pub request_id: String,
}

impl CommandPayload {
    /// Build a payload with a freshly generated request id.
    pub fn new(bot_id: impl Into<String>, session_id: impl Into<String>, command: Command) -> Self {
        Self {
            bot_id: bot_id.into(),
            session_id: session_id.into(),
            command,
            request_id: crate::new_request_id(),
        }
    }
}

/// Outcome of executing a command. `data` is only set on success, `error`
/// only on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub bot_id: String,
    pub session_id: String,
    /// Echo of the command's tag.
    pub command_type: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl CommandResult {
    /// A successful result for `payload`, optionally carrying data.
    pub fn ok(payload: &CommandPayload, data: Option<Map<String, Value>>) -> Self {
        Self {
            bot_id: payload.bot_id.clone(),
            session_id: payload.session_id.clone(),
            command_type: payload.command.type_name().to_string(),
            success: true,
            data,
            error: None,
            request_id: Some(payload.request_id.clone()),
        }
    }

    /// A failed result for `payload`.
    pub fn failed(payload: &CommandPayload, error: impl Into<String>) -> Self {
        Self {
            bot_id: payload.bot_id.clone(),
            session_id: payload.session_id.clone(),
            command_type: payload.command.type_name().to_string(),
            success: false,
            data: None,
            error: Some(error.into()),
            request_id: Some(payload.request_id.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
