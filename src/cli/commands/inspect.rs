//! Inspect command - dump learned values and the greedy policy

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AgentConfig, App},
    cli::output::{print_section, print_subsection},
    identifiers::StateKey,
    types::Action,
};

#[derive(Parser, Debug)]
#[command(about = "Print Q-values and greedy actions for learned states")]
pub struct InspectArgs {
    /// Directory holding saved progress
    #[arg(long, short = 's', default_value = App::DEFAULT_STORE_DIR)]
    pub store: PathBuf,

    /// Store key of the snapshot
    #[arg(long, default_value = AgentConfig::DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Only show states whose key contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Maximum number of states to print
    #[arg(long, short = 'n', default_value_t = 25)]
    pub limit: usize,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = App::with_store_dir(&args.store);
    let agent = app
        .create_agent(AgentConfig::default().with_storage_key(args.key.clone()))
        .context("Failed to load agent")?;
    let table = agent.q_table();

    let matching: Vec<_> = table
        .to_entries()
        .into_iter()
        .filter(|(state, _)| {
            args.filter
                .as_deref()
                .is_none_or(|needle| state.as_str().contains(needle))
        })
        .collect();

    print_section("Learned Policy");
    println!(
        "  {} states, {} values, showing {}",
        table.state_count(),
        table.size(),
        matching.len().min(args.limit)
    );

    print_subsection(&format!(
        "{:<22} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "state", "best", "up", "down", "left", "right", "none"
    ));
    for (state, _) in matching.iter().take(args.limit) {
        let best = table.greedy_action(state);
        println!("{}", format_row(state, |action| table.get(state, action), best));
    }

    Ok(())
}

fn format_row(state: &StateKey, value: impl Fn(Action) -> f64, best: Action) -> String {
    let mut line = format!("{:<22} {:>6}", state.as_str(), best.as_str());
    for action in Action::ALL {
        line.push_str(&format!(" {:>8.3}", value(action)));
    }
    line
}
