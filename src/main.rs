mod api_key;
mod cli;
mod expert;
mod finder;
mod metaphor;
mod openai;
mod pipeline;
mod render;
mod web;

pub const USER_AGENT: &str = concat!("expert-finder/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use cli::{Cli, Command};
use finder::Finder;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("expert_finder=info".parse()?),
        )
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    let finder = Finder::from_env().inspect_err(|e| tracing::error!("startup failed: {e}"))?;

    match cli.command {
        Command::Ask {
            question,
            num_results,
        } => cli::ask(&finder, question, num_results).await?,
        Command::Serve { addr } => web::serve(finder, addr).await?,
    }
    Ok(())
}
