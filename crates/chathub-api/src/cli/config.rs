//! Session configuration CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use super::{parse_value, preview};
use crate::state::AppState;

/// Session config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Get a config value.
    Get {
        /// Bot id.
        bot: String,

        /// Session id.
        session: String,

        /// Key name.
        key: String,
    },

    /// Set a config value (JSON, or a plain string).
    Set {
        /// Bot id.
        bot: String,

        /// Session id.
        session: String,

        /// Key name.
        key: String,

        /// JSON value.
        value: String,
    },

    /// List every config value of a session.
    List {
        /// Bot id.
        bot: String,

        /// Session id.
        session: String,
    },
}

/// Handle a config subcommand.
pub async fn handle_config_command(cmd: ConfigCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        ConfigCommand::Get { bot, session, key } => config_get(state, &bot, &session, &key, json).await,
        ConfigCommand::Set {
            bot,
            session,
            key,
            value,
        } => config_set(state, &bot, &session, &key, &value, json).await,
        ConfigCommand::List { bot, session } => config_list(state, &bot, &session, json).await,
    }
}

async fn config_get(state: &AppState, bot: &str, session: &str, key: &str, json: bool) -> Result<()> {
    let entry = state.hub.session(bot, session).config().entry(key).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "session": session,
            "key": key,
            "value": entry.as_ref().map(|e| &e.value),
            "updated_at": entry.as_ref().map(|e| e.updated_at.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    match entry {
        Some(entry) => {
            println!(
                "  {} = {}",
                style(key).cyan().bold(),
                style(serde_json::to_string_pretty(&entry.value)?).white(),
            );
        }
        None => {
            println!(
                "  {} Key '{}' is not set for {}/{}",
                style("i").blue().bold(),
                style(key).cyan(),
                style(bot).cyan(),
                style(session).cyan(),
            );
        }
    }
    println!();

    Ok(())
}

async fn config_set(
    state: &AppState,
    bot: &str,
    session: &str,
    key: &str,
    value_str: &str,
    json: bool,
) -> Result<()> {
    let value = parse_value(value_str);

    state.hub.session(bot, session).config().set(key, &value).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "session": session,
            "key": key,
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Set '{}' for {}/{}",
            style("ok").green(),
            style(key).cyan(),
            style(bot).cyan(),
            style(session).cyan(),
        );
        println!();
    }

    Ok(())
}

async fn config_list(state: &AppState, bot: &str, session: &str, json: bool) -> Result<()> {
    let entries = state.hub.session(bot, session).config().list_all().await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "session": session,
            "config": entries,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No config for {}/{}.",
            style("i").blue().bold(),
            style(bot).cyan(),
            style(session).cyan(),
        );
        println!();
        return Ok(());
    }

    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    for (key, value) in &entries {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(preview(value, 60)).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}
