//! CLI definitions for watchbot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// watchbot CLI.
#[derive(Parser)]
#[command(name = "watchbot")]
#[command(about = "Endpoint health watcher with chat status reports and outage alerts")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Seconds between periodic checks (overrides the config file)
    #[arg(long, env = "WATCHBOT_INTERVAL_SECS", global = true)]
    pub interval: Option<u64>,

    /// Log alerts instead of sending them and skip the chat bot
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the bot in foreground (default)
    Run,

    /// Check every target once, print the report and exit non-zero if any is down
    Check,

    /// Validate the configuration file
    Validate,
}
