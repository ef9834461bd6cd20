//! Train command - run headless arena episodes and persist what was learned

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::{
        config::FileConfig,
        output::{format_millis, format_percent, print_kv, print_section},
    },
    pipeline::{JsonlObserver, ProgressObserver, TrainingPipeline},
    scoreboard::HighScore,
};

#[derive(Parser, Debug)]
#[command(about = "Train the agent in the headless arena")]
pub struct TrainArgs {
    /// Number of episodes to run
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Tick budget per episode
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding saved progress
    #[arg(long, short = 's', default_value = App::DEFAULT_STORE_DIR)]
    pub store: PathBuf,

    /// JSON file with `agent` and `training` sections
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every tick in the JSONL observations
    #[arg(long, requires = "observations")]
    pub record_steps: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Discard saved progress before training
    #[arg(long)]
    pub fresh: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let FileConfig {
        agent: mut agent_config,
        training: mut training_config,
    } = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    if let Some(seed) = args.seed {
        agent_config.seed = Some(seed);
    }
    if let Some(episodes) = args.episodes {
        training_config.episodes = episodes;
    }
    if let Some(max_steps) = args.max_steps {
        training_config.max_steps = max_steps;
    }

    let app = App::with_store_dir(&args.store);
    let mut agent = app
        .create_agent(agent_config)
        .context("Failed to create agent")?;
    if args.fresh {
        agent.reset();
    }
    let episodes_before = agent.episode_count();

    let mut pipeline = TrainingPipeline::new(training_config);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file: {}", path.display()))?;
        let observer = if args.record_steps {
            observer.with_steps()
        } else {
            observer
        };
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent).context("Training failed")?;

    app.save_agent(&agent)
        .with_context(|| format!("Failed to save progress under {}", args.store.display()))?;

    let mut scoreboard = app.load_scoreboard();
    let new_record = match result.fastest_clear {
        Some(fastest) => scoreboard.record(HighScore {
            time: fastest.time_ms,
            score: fastest.score,
            episode: episodes_before + fastest.episode as u64 + 1,
        }),
        None => false,
    };
    if new_record {
        app.save_scoreboard(&scoreboard)
            .context("Failed to save high scores")?;
    }

    print_section("Training Summary");
    print_kv("Episodes", &result.total_episodes.to_string());
    print_kv(
        "Cleared",
        &format!(
            "{} ({})",
            result.successes,
            format_percent(result.success_rate)
        ),
    );
    print_kv("Avg reward", &format!("{:.2}", result.average_reward));
    print_kv("Avg steps", &format!("{:.0}", result.average_steps));
    print_kv("Avg pillars", &format!("{:.2}", result.average_pillars));
    if let Some(fastest) = result.fastest_clear {
        print_kv("Fastest clear", &format_millis(fastest.time_ms));
    }
    if let Some(best) = scoreboard.best() {
        let marker = if new_record { " (new record)" } else { "" };
        print_kv("Best ever", &format!("{}{marker}", format_millis(best.time)));
    }
    print_kv("Total episodes", &agent.episode_count().to_string());
    print_kv("Exploration", &format_percent(agent.exploration_rate()));
    print_kv("States learned", &agent.q_table().state_count().to_string());

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
