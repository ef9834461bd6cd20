//! Stats command - rolling performance of the saved agent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AgentConfig, App},
    cli::output::{format_millis, format_number, format_percent, print_kv, print_section},
};

#[derive(Parser, Debug)]
#[command(about = "Show performance metrics of the saved agent")]
pub struct StatsArgs {
    /// Directory holding saved progress
    #[arg(long, short = 's', default_value = App::DEFAULT_STORE_DIR)]
    pub store: PathBuf,

    /// Store key of the snapshot
    #[arg(long, default_value = AgentConfig::DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: StatsArgs) -> Result<()> {
    let app = App::with_store_dir(&args.store);
    let agent = app
        .create_agent(AgentConfig::default().with_storage_key(args.key.clone()))
        .context("Failed to load agent")?;
    let metrics = agent.performance_metrics();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    print_section("Agent Performance");
    let Some(metrics) = metrics else {
        println!("  No completed episodes under {}", args.store.display());
        return Ok(());
    };

    print_kv("Episodes", &format_number(metrics.episode_count));
    print_kv("Avg reward", &format!("{:.2}", metrics.average_reward));
    print_kv("Avg steps", &format!("{:.0}", metrics.average_steps));
    print_kv("Avg time", &format_millis(metrics.average_time));
    print_kv("Cleared", &format_percent(metrics.success_rate));
    print_kv("Exploration", &format_percent(metrics.epsilon));
    print_kv("States", &format_number(agent.q_table().state_count() as u64));
    print_kv("Q-values", &format_number(agent.q_table().size() as u64));

    if let Some(best) = app.load_scoreboard().best() {
        print_kv(
            "Best clear",
            &format!("{} (episode {})", format_millis(best.time), best.episode),
        );
    }

    Ok(())
}
