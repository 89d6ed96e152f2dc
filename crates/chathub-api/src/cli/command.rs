//! `chathub command` - run a session command through the hub's interpreter.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use chathub_types::client;
use chathub_types::command::CommandPayload;

use crate::state::AppState;

/// Session commands.
#[derive(Subcommand)]
pub enum CommandAction {
    /// Delete the session's message history.
    ClearContext,

    /// Delete the bot's long-term memory (all sessions).
    ClearMemory,

    /// Store the session's preferred context length.
    SetContextLength {
        /// Number of recent messages to keep in context.
        #[arg(allow_negative_numbers = true)]
        length: i64,
    },
}

impl CommandAction {
    fn into_payload(self, bot: &str, session: &str) -> CommandPayload {
        match self {
            CommandAction::ClearContext => client::clear_context(bot, session),
            CommandAction::ClearMemory => client::clear_memory(bot, session),
            CommandAction::SetContextLength { length } => {
                client::set_context_length(bot, session, length)
            }
        }
    }
}

/// Execute a command and print its result.
///
/// A failed command is reported and turned into an error exit.
pub async fn run_command(
    state: &AppState,
    bot: &str,
    session: &str,
    action: CommandAction,
    json: bool,
) -> Result<()> {
    let payload = action.into_payload(bot, session);
    let result = state.hub.command(&payload).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!();
        println!(
            "  {} {} for {}/{}",
            style("ok").green(),
            style(&result.command_type).cyan(),
            style(bot).cyan(),
            style(session).cyan(),
        );
        if let Some(data) = &result.data {
            for (key, value) in data {
                println!("     {} {}", style(format!("{key}:")).dim(), value);
            }
        }
        println!();
    }

    if !result.success {
        anyhow::bail!(
            "command '{}' failed: {}",
            result.command_type,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
