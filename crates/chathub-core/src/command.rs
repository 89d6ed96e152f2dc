//! Command interpreter.
//!
//! Commands are not routed through the bot registry: each tag maps directly
//! to a session store operation. Execution is total. Unknown tags and store
//! failures come back as a failed [`CommandResult`], never as an error.

use chathub_types::command::{Command, CommandPayload, CommandResult};
use chathub_types::error::CommandError;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::session::SessionScope;
use crate::store::{ConfigStore, MemoryStore, MessageStore};

/// Session config key written by `set_context_length`.
pub const CONTEXT_LENGTH_KEY: &str = "context_length";

/// Execute `payload.command` against `scope` and report the outcome.
pub async fn execute<M, K, C>(scope: &SessionScope<'_, M, K, C>, payload: &CommandPayload) -> CommandResult
where
    M: MessageStore,
    K: MemoryStore,
    C: ConfigStore,
{
    match apply(scope, &payload.command).await {
        Ok(data) => {
            debug!(
                bot_id = %payload.bot_id,
                session_id = %payload.session_id,
                command = payload.command.type_name(),
                "command executed"
            );
            CommandResult::ok(payload, data)
        }
        Err(err) => {
            warn!(
                bot_id = %payload.bot_id,
                session_id = %payload.session_id,
                command = payload.command.type_name(),
                error = %err,
                "command failed"
            );
            CommandResult::failed(payload, err.to_string())
        }
    }
}

async fn apply<M, K, C>(
    scope: &SessionScope<'_, M, K, C>,
    command: &Command,
) -> Result<Option<Map<String, Value>>, CommandError>
where
    M: MessageStore,
    K: MemoryStore,
    C: ConfigStore,
{
    let data = match command {
        Command::ClearContext => {
            let removed = scope.messages().clear().await?;
            json!({ "cleared_messages": removed })
        }
        Command::ClearMemory => {
            let removed = scope.memory().clear().await?;
            json!({ "cleared_memories": removed })
        }
        Command::SetContextLength { length } => {
            scope.config().set(CONTEXT_LENGTH_KEY, &json!(length)).await?;
            json!({ "context_length": length })
        }
        Command::Unknown { command_type, .. } => {
            return Err(CommandError::UnknownCommand(command_type.clone()));
        }
    };

    match data {
        Value::Object(map) => Ok(Some(map)),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
