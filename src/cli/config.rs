//! Configuration file support for CLI commands

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{app::AgentConfig, pipeline::TrainingConfig};

/// Contents of a `--config` JSON file. Every section is optional.
///
/// ```json
/// {
///   "agent": { "learning_rate": 0.2, "exploration": { "base": 0.3 } },
///   "training": { "episodes": 500, "rewards": { "collision_bonus": 80.0 } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: AgentConfig,
    pub training: TrainingConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
