//! hostgate — keeps an AI coding agent from reaching hosts you did not approve.
//!
//! The agent-facing enforcement lives in the `hostgate-hook` binary. This
//! command is for the operator:
//!   hostgate check                          # validate the host lists
//!   hostgate test --kind url https://x.io   # try a destination offline
//!   hostgate log                            # see what the agent reached for

use clap::{Parser, Subcommand};
use colored::Colorize;
use hostgate::audit::AuditReader;
use hostgate::cli;
use hostgate::utils::paths;
use std::path::PathBuf;

/// hostgate — egress allowlisting for AI coding agents.
#[derive(Parser)]
#[command(
    name = "hostgate",
    version,
    about = "Keep your AI agent from reaching unapproved hosts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the host lists and configuration
    Check {
        /// Gate home directory (defaults to the executable's directory)
        #[arg(long, env = "HOSTGATE_HOME")]
        home: Option<PathBuf>,
    },

    /// Evaluate a URL, shell command or search query without an agent
    Test {
        /// The text to evaluate
        text: String,

        /// How to read the text: url, command or query
        #[arg(short, long, default_value = "url")]
        kind: String,

        #[arg(long, env = "HOSTGATE_HOME")]
        home: Option<PathBuf>,
    },

    /// See which destinations your agent tried to reach
    Log {
        #[arg(short, long, help = "Session ID to view")]
        session: Option<String>,

        #[arg(short, long, help = "Show only blocked calls")]
        blocked: bool,

        #[arg(short, long, help = "Max entries to show")]
        limit: Option<usize>,

        #[arg(long, help = "Show only the session summary")]
        summary: bool,

        #[arg(long, help = "List all recorded sessions")]
        list: bool,
    },
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("HOSTGATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hostgate=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { home } => resolve_home(home).and_then(|home| cli::check::run_check(&home)),

        Commands::Test { text, kind, home } => resolve_home(home)
            .and_then(|home| cli::test::run_test(&home, &kind, &text))
            .map(|allowed| {
                if !allowed {
                    std::process::exit(hostgate::gate::protocol::EXIT_BLOCK);
                }
            }),

        Commands::Log {
            session,
            blocked,
            limit,
            summary,
            list,
        } => AuditReader::new().and_then(|reader| {
            if list {
                cli::log::run_log_list(&reader)
            } else {
                cli::log::run_log(&reader, session.as_deref(), blocked, limit, summary)
            }
        }),
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}

fn resolve_home(home: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match home {
        Some(home) => Ok(home),
        None => paths::gate_home(),
    }
}
