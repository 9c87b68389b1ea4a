use crate::algorithms::annealing::{AnnealingConfig, DEFAULT_SEED};
use crate::algorithms::common::SearchBudget;
use crate::algorithms::{Strategy, StrategySettings};
use crate::agent::DEFAULT_MAX_STEPS;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Autonomous delivery agent path planner.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Search strategy to plan with.
    #[arg(long, value_enum, required_unless_present = "compare")]
    pub planner: Option<Strategy>,

    /// Map name, resolved to `<maps-dir>/<map>.map` (and `.dyn` when present).
    #[arg(long)]
    pub map: String,

    #[arg(long, default_value = "maps")]
    pub maps_dir: PathBuf,

    /// Simulate the delivery and replan around moving obstacles.
    #[arg(long, default_value_t = false)]
    pub replan: bool,

    /// Print the grid with the planned path.
    #[arg(long, default_value_t = false)]
    pub plot: bool,

    /// Run every strategy on the same map and print a comparison table.
    #[arg(long, default_value_t = false)]
    pub compare: bool,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Annealing iterations.
    #[arg(long, default_value_t = 200)]
    pub iterations: usize,

    #[arg(long, default_value_t = 1000.0)]
    pub temperature: f64,

    #[arg(long, default_value_t = 0.995)]
    pub cooling: f64,

    /// Step budget of the delivery simulation.
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    #[arg(long)]
    pub max_expansions: Option<usize>,

    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    #[arg(long, default_value = "replan_log.txt")]
    pub log_file: PathBuf,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    pub fn strategy_settings(&self) -> StrategySettings {
        StrategySettings {
            budget: SearchBudget {
                max_expansions: self.max_expansions,
                time_limit: self.time_limit_ms.map(Duration::from_millis),
            },
            annealing: AnnealingConfig {
                iterations: self.iterations,
                initial_temperature: self.temperature,
                cooling: self.cooling,
            },
            seed: self.seed,
        }
    }
}
