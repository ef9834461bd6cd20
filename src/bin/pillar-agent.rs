//! pillar-agent CLI - train and inspect the pillar-hunting Q-learning agent
//!
//! Commands:
//! - `train`: run headless arena episodes and persist the learned table
//! - `stats`: rolling performance of the saved agent
//! - `inspect`: learned values and greedy actions per state

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pillar-agent")]
#[command(version, about = "Tabular Q-learning agent for the pillar arena", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent in the headless arena
    Train(Box<pillar_agent::cli::commands::train::TrainArgs>),

    /// Show rolling performance metrics
    Stats(pillar_agent::cli::commands::stats::StatsArgs),

    /// Print learned Q-values and the greedy policy
    Inspect(pillar_agent::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pillar_agent=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => pillar_agent::cli::commands::train::execute(*args),
        Commands::Stats(args) => pillar_agent::cli::commands::stats::execute(args),
        Commands::Inspect(args) => pillar_agent::cli::commands::inspect::execute(args),
    }
}
