//! moots - sign in to mootslive from the command line.
//!
//! Main entry point for the moots CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, me, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// moots - sign in to mootslive from the command line
#[derive(Parser)]
#[command(name = "moots")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend URL (default: from config, else http://localhost:9000)
    #[arg(long, global = true, env = "MOOTS_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with Twitter
    Auth(auth::AuthArgs),

    /// Show backend status
    Status(status::StatusArgs),

    /// Show the signed-in user
    Me(me::MeArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "moots=debug,moots_auth=debug,moots_client=debug,moots_config=debug,info"
    } else {
        "moots=info,moots_auth=info,moots_client=warn,moots_config=warn,warn"
    };

    let log_dir = moots_config::config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "moots.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "moots=trace,moots_auth=trace,moots_client=trace,moots_config=trace,info",
                )),
        )
        .init();

    let mut loaded = moots_config::load_config()?;
    if let Some(server) = cli.server {
        loaded.config.server = server;
    }

    let ctx = commands::Context {
        config: loaded,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
        Commands::Me(args) => me::run(args, &ctx).await,
    }
}
