//! CLI command definitions for the `chatdock` binary.

pub mod config;
pub mod run;
pub mod session;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Run and inspect the chat widget session orchestrator.
#[derive(Parser)]
#[command(name = "chatdock", version, about, long_about = None)]
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

    /// Path to chatdock.toml (defaults to the data directory).
    #[arg(long, global = true, env = "CHATDOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit log lines as JSON objects.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the orchestrator against the configured backend until Ctrl+C.
    Run {
        /// Keep the chat session in memory instead of the data directory.
        #[arg(long)]
        memory_session: bool,
    },

    /// Evaluate office hours and widget visibility once.
    Status {
        /// Evaluate at this RFC 3339 instant instead of now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Manage the persisted chat session.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Print the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the persisted chat id.
    Show,

    /// Persist a chat id, as if a chat had been started.
    Set {
        /// Chat id to store.
        chat_id: String,
    },

    /// Forget the persisted chat id.
    Clear,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["chatdock", "status", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Status { at: None }));
    }

    #[test]
    fn test_parse_session_set() {
        let cli = Cli::try_parse_from(["chatdock", "session", "set", "abc123"]).unwrap();
        match cli.command {
            Commands::Session {
                action: SessionCommand::Set { chat_id },
            } => assert_eq!(chat_id, "abc123"),
            _ => panic!("expected session set"),
        }
    }

    #[test]
    fn test_parse_run_memory_session() {
        let cli = Cli::try_parse_from(["chatdock", "run", "--memory-session"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { memory_session: true }));
    }
}
