mod cli;
mod fees;
mod nonce;
mod send;
mod sign;

use crate::cli::{Cli, Commands};
use clap::Parser;
use color_eyre::Result;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Hide backtrace noise; command errors are user-facing.
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Nonce(cmd) => cmd.run(&cli.args).await,
        Commands::Sign(cmd) => cmd.run(&cli.args).await,
        Commands::Fees(cmd) => cmd.run(&cli.args).await,
        Commands::Send(cmd) => cmd.run(&cli.args).await,
    };

    if let Err(err) = result {
        if cli.args.json {
            eprintln!(
                "{}",
                json!({
                    "status": "error",
                    "error": {
                        "message": err.to_string(),
                    }
                })
            );
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
