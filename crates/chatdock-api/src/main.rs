//! chatdock CLI entry point.
//!
//! Binary name: `chatdock`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use chatdock_observe::tracing_setup::{
    init_tracing, shutdown_tracing, verbosity_directive, LogFormat, TracingOptions,
};
use cli::{Cli, Commands, SessionCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(TracingOptions {
        default_directive: verbosity_directive(cli.quiet, cli.verbose).to_string(),
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatdock", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.config.as_deref()).await?;

    let result = match cli.command {
        Commands::Run { memory_session } => cli::run::run(&state, memory_session, cli.json).await,
        Commands::Status { at } => cli::status::status(&state, at.as_deref(), cli.json),
        Commands::Session { action } => match action {
            SessionCommand::Show => cli::session::show_session(&state, cli.json),
            SessionCommand::Set { chat_id } => cli::session::set_session(&state, &chat_id, cli.json),
            SessionCommand::Clear => cli::session::clear_session(&state, cli.json),
        },
        Commands::Config => cli::config::show_config(&state, cli.json),
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

/// Wait for Ctrl+C or SIGTERM.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {e}");
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
                tracing::warn!("failed to install SIGTERM handler: {e}");
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
