//! watchbot - endpoint health watcher
//!
//! Main entry point for the watchbot CLI and bot.

mod cli;
mod cmd_check;
mod register;
mod server;

use clap::Parser;
use tracing::warn;

use watchbot_config::ConfigLoader;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env first so it can feed both clap `env` args and `${VAR}` expansion
    let dotenv = ConfigLoader::load_dotenv();

    let cli = Cli::parse();

    server::init_tracing()?;
    if let Err(e) = dotenv {
        warn!("Ignoring .env: {}", e);
    }

    match cli.command {
        None | Some(Commands::Run) => {
            server::run_bot(&cli.config, cli.interval, cli.dry_run).await
        }
        Some(Commands::Check) => {
            let all_up = cmd_check::check(&cli.config).await?;
            if !all_up {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Validate) => {
            if !cmd_check::validate(&cli.config)? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
