//! Long-term memory CLI subcommands.
//!
//! Memory is per bot and shared by all of its sessions. Values are arbitrary
//! JSON.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chathub_core::store::MemoryStore;

use super::{parse_value, preview};
use crate::state::AppState;

/// Memory subcommands.
#[derive(Subcommand)]
pub enum MemoryCommand {
    /// Get a memory value.
    Get {
        /// Bot id.
        bot: String,

        /// Key name.
        key: String,
    },

    /// Set a memory value (JSON, or a plain string).
    Set {
        /// Bot id.
        bot: String,

        /// Key name.
        key: String,

        /// JSON value (string, number, object, array, boolean, null).
        value: String,
    },

    /// Delete a memory key.
    Delete {
        /// Bot id.
        bot: String,

        /// Key name.
        key: String,
    },

    /// List all memories of a bot.
    List {
        /// Bot id.
        bot: String,
    },

    /// Delete every memory of a bot.
    Clear {
        /// Bot id.
        bot: String,
    },
}

/// Handle a memory subcommand.
pub async fn handle_memory_command(cmd: MemoryCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        MemoryCommand::Get { bot, key } => memory_get(state, &bot, &key, json).await,
        MemoryCommand::Set { bot, key, value } => memory_set(state, &bot, &key, &value, json).await,
        MemoryCommand::Delete { bot, key } => memory_delete(state, &bot, &key, json).await,
        MemoryCommand::List { bot } => memory_list(state, &bot, json).await,
        MemoryCommand::Clear { bot } => memory_clear(state, &bot, json).await,
    }
}

async fn memory_get(state: &AppState, bot: &str, key: &str, json: bool) -> Result<()> {
    let entry = state.hub.store().memory_store().get_entry(bot, key).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
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
            println!(
                "  {}",
                style(format!("updated {}", entry.updated_at.format("%Y-%m-%d %H:%M:%S"))).dim()
            );
        }
        None => {
            println!(
                "  {} Key '{}' not found for '{}'",
                style("i").blue().bold(),
                style(key).cyan(),
                style(bot).cyan(),
            );
        }
    }
    println!();

    Ok(())
}

async fn memory_set(state: &AppState, bot: &str, key: &str, value_str: &str, json: bool) -> Result<()> {
    let value = parse_value(value_str);

    state.hub.store().memory_store().set(bot, key, &value).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "key": key,
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Set '{}' for '{}'",
            style("ok").green(),
            style(key).cyan(),
            style(bot).cyan(),
        );
        println!();
    }

    Ok(())
}

async fn memory_delete(state: &AppState, bot: &str, key: &str, json: bool) -> Result<()> {
    let deleted = state.hub.store().memory_store().delete(bot, key).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "key": key,
            "deleted": deleted,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if deleted {
        println!();
        println!(
            "  {} Deleted key '{}' from '{}'",
            style("ok").green(),
            style(key).cyan(),
            style(bot).cyan(),
        );
        println!();
    } else {
        println!();
        println!(
            "  {} Key '{}' did not exist for '{}'",
            style("i").blue().bold(),
            style(key).cyan(),
            style(bot).cyan(),
        );
        println!();
    }

    Ok(())
}

async fn memory_list(state: &AppState, bot: &str, json: bool) -> Result<()> {
    let entries = state.hub.store().memory_store().list_all(bot).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "memory": entries,
            "count": entries.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No memories for '{}'.",
            style("i").blue().bold(),
            style(bot).cyan(),
        );
        println!("     Set one with: chathub memory set {bot} <key> <json-value>");
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  Memory for '{}' ({} entries)",
        style(bot).cyan(),
        entries.len(),
    );
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

async fn memory_clear(state: &AppState, bot: &str, json: bool) -> Result<()> {
    let removed = state.hub.store().memory_store().clear(bot).await?;

    if json {
        let result = serde_json::json!({
            "bot": bot,
            "cleared_memories": removed,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Cleared {} memories for '{}'",
            style("ok").green(),
            removed,
            style(bot).cyan(),
        );
        println!();
    }

    Ok(())
}
