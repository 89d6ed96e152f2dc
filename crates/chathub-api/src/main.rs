//! Chat Hub CLI and HTTP server entry point.
//!
//! Binary name: `chathub`
//!
//! Resolves configuration (defaults, `config.toml`, environment, flags),
//! opens the database, then dispatches to a CLI command or starts the server.

mod cli;
mod http;
mod state;

use anyhow::anyhow;
use clap::Parser;
use clap_complete::generate;

use chathub_infra::config::{load_with_env, resolve_data_dir};
use chathub_types::config::HubConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chathub", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);
    let mut config = load_with_env(&data_dir).await;

    if let Commands::Serve { host, port, otel } = &cli.command {
        if let Some(host) = host {
            config.host = host.clone();
        }
        if let Some(port) = port {
            config.port = *port;
        }
        let debug = config.debug || cli.verbose > 0;
        chathub_observe::init_tracing(debug, *otel).map_err(|e| anyhow!("tracing setup failed: {e}"))?;

        let result = serve(config).await;
        chathub_observe::shutdown_tracing();
        return result;
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,chathub=debug",
        _ => "trace",
    };
    chathub_observe::init_tracing_with_filter(filter, false, false)
        .map_err(|e| anyhow!("tracing setup failed: {e}"))?;

    if let Commands::Bots = &cli.command {
        return cli::bots::list_bots(&config, cli.json);
    }

    let state = AppState::init(config).await?;

    match cli.command {
        Commands::History {
            bot,
            session,
            limit,
        } => {
            cli::history::show_history(&state, &bot, &session, limit, cli.json).await?;
        }

        Commands::Memory { action } => {
            cli::memory::handle_memory_command(action, &state, cli.json).await?;
        }

        Commands::Config { action } => {
            cli::config::handle_config_command(action, &state, cli.json).await?;
        }

        Commands::Command {
            bot,
            session,
            action,
        } => {
            cli::command::run_command(&state, &bot, &session, action, cli.json).await?;
        }

        Commands::Serve { .. } | Commands::Bots | Commands::Completions { .. } => {
            unreachable!("handled above")
        }
    }

    state.db_pool.close().await;
    Ok(())
}

/// Open the store, register configured bots, and serve HTTP until shutdown.
async fn serve(config: HubConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let state = AppState::init(config).await?;
    state.register_configured_bots()?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        bots = state.hub.registry().len(),
        data_dir = %state.config.data_dir.display(),
        "chat hub listening"
    );

    println!(
        "  {} Chat Hub listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let pool = state.db_pool.clone();
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
