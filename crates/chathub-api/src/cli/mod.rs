//! CLI command definitions for the `chathub` binary.
//!
//! Uses clap derive macros. Store commands open the same SQLite database the
//! server uses, so they work whether or not a server is running.

pub mod bots;
pub mod command;
pub mod config;
pub mod history;
pub mod memory;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Multi-tenant chat hub: route messages to bots and inspect their state.
#[derive(Parser)]
#[command(name = "chathub", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding `config.toml` and the database.
    #[arg(long, global = true, env = "CHAT_HUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Host to bind to (overrides config and CHAT_HUB_HOST).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and CHAT_HUB_PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Also export tracing spans through OpenTelemetry (stdout).
        #[arg(long)]
        otel: bool,
    },

    /// Show the message history of a session.
    History {
        /// Bot id.
        bot: String,

        /// Session id.
        session: String,

        /// Show only the most recent N messages.
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Manage a bot's long-term memory (get, set, delete, list, clear).
    Memory {
        #[command(subcommand)]
        action: memory::MemoryCommand,
    },

    /// Manage a session's configuration (get, set, list).
    Config {
        #[command(subcommand)]
        action: config::ConfigCommand,
    },

    /// Run a session command.
    Command {
        /// Bot id.
        bot: String,

        /// Session id.
        session: String,

        #[command(subcommand)]
        action: command::CommandAction,
    },

    /// List bot ids configured for registration.
    Bots,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Parse a CLI value as JSON, falling back to a JSON string.
///
/// `42` stores a number and `'{"a":1}'` an object, while `Alice` stores the
/// string `"Alice"`.
pub fn parse_value(input: &str) -> serde_json::Value {
    serde_json::from_str(input).unwrap_or_else(|_| serde_json::Value::String(input.to_string()))
}

/// Shorten a JSON rendering for table previews.
pub fn preview(value: &serde_json::Value, max_chars: usize) -> String {
    let rendered = serde_json::to_string(value).unwrap_or_default();
    if rendered.chars().count() > max_chars {
        let truncated: String = rendered.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    } else {
        rendered
    }
}
