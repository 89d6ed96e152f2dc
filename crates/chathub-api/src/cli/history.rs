//! `chathub history` - print a session's message log.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chathub_types::chat::Role;
use chathub_types::segment::Segment;

use crate::state::AppState;

/// Print the messages of one session, oldest first.
pub async fn show_history(
    state: &AppState,
    bot: &str,
    session: &str,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let messages = state.hub.session(bot, session).messages().list(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages for {}/{}.",
            style("i").blue().bold(),
            style(bot).cyan(),
            style(session).cyan(),
        );
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  History for {}/{} ({} messages)",
        style(bot).cyan(),
        style(session).cyan(),
        messages.len(),
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for message in &messages {
        let role_color = match message.role {
            Role::User => Color::Green,
            Role::Assistant => Color::Cyan,
            Role::System => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(message.seq),
            Cell::new(message.created_at.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(message.role).fg(role_color),
            Cell::new(render_content(&message.content)),
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}

/// Text segments verbatim, other segments as a bracketed kind tag.
fn render_content(content: &[Segment]) -> String {
    content
        .iter()
        .map(|segment| match segment {
            Segment::Text { text } => text.clone(),
            Segment::File { filename, .. } => format!("[file: {filename}]"),
            other => format!("[{}]", other.kind()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
