pub mod a_star;
pub mod annealing;
pub mod breadth_first;
pub mod common;
pub mod uniform_cost;

use crate::algorithms::a_star::AStar;
use crate::algorithms::annealing::{AnnealingConfig, SimulatedAnnealing};
use crate::algorithms::breadth_first::BreadthFirst;
use crate::algorithms::common::{SearchBudget, SearchStrategy};
use crate::algorithms::uniform_cost::UniformCost;
use clap::ValueEnum;
use std::fmt;

/// The available search strategies, selectable by name on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Strategy {
    #[value(name = "bfs")]
    BreadthFirst,
    #[value(name = "ucs")]
    UniformCost,
    #[value(name = "astar")]
    HeuristicBestFirst,
    #[value(name = "sa")]
    SimulatedAnnealing,
}

/// Everything needed to instantiate any strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategySettings {
    pub budget: SearchBudget,
    pub annealing: AnnealingConfig,
    pub seed: u64,
}

impl Default for StrategySettings {
    fn default() -> Self {
        StrategySettings {
            budget: SearchBudget::default(),
            annealing: AnnealingConfig::default(),
            seed: annealing::DEFAULT_SEED,
        }
    }
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::BreadthFirst,
        Strategy::UniformCost,
        Strategy::HeuristicBestFirst,
        Strategy::SimulatedAnnealing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::UniformCost => "ucs",
            Strategy::HeuristicBestFirst => "astar",
            Strategy::SimulatedAnnealing => "sa",
        }
    }

    pub fn build(&self, settings: &StrategySettings) -> Box<dyn SearchStrategy> {
        match self {
            Strategy::BreadthFirst => Box::new(BreadthFirst::with_budget(settings.budget)),
            Strategy::UniformCost => Box::new(UniformCost::with_budget(settings.budget)),
            Strategy::HeuristicBestFirst => Box::new(AStar::with_budget(settings.budget)),
            Strategy::SimulatedAnnealing => Box::new(
                SimulatedAnnealing::new(settings.annealing, settings.seed).with_budget(settings.budget),
            ),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
