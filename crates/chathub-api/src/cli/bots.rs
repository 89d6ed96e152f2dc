//! `chathub bots` - list bot ids the server registers at startup.

use anyhow::Result;
use console::style;

use chathub_types::config::HubConfig;

pub fn list_bots(config: &HubConfig, json: bool) -> Result<()> {
    if json {
        let result = serde_json::json!({
            "bots": config.bots,
            "count": config.bots.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    if config.bots.is_empty() {
        println!(
            "  {} No bots configured. Add them to {} as: bots = [\"bot-001\"]",
            style("i").blue().bold(),
            style(config.data_dir.join("config.toml").display()).cyan(),
        );
    } else {
        println!("  Configured bots ({})", config.bots.len());
        println!();
        for bot_id in &config.bots {
            println!("  {} {}", style("•").dim(), style(bot_id).cyan());
        }
    }
    println!();

    Ok(())
}
