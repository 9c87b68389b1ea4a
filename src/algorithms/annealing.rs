//! Simulated annealing over a greedily bootstrapped path.
//!
//! This is a fast approximate replanner, not an optimal search: it walks
//! greedily toward the goal, then perturbs that path by swapping interior
//! cells under Metropolis acceptance while the temperature cools.

use crate::algorithms::common::{Path, Plan, SearchBudget, SearchStrategy};
use crate::environment::Environment;
use crate::grid::{Cost, Position};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use std::time::Instant;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingConfig {
    pub iterations: usize,
    pub initial_temperature: f64,
    /// Geometric decay factor applied to the temperature after every iteration.
    pub cooling: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            iterations: 200,
            initial_temperature: 1000.0,
            cooling: 0.995,
        }
    }
}

/// Annealing planner. Every search restarts the RNG from `seed`, so a given
/// input always yields the same plan no matter how often the instance is reused.
pub struct SimulatedAnnealing {
    config: AnnealingConfig,
    budget: SearchBudget,
    seed: u64,
    rng: StdRng,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        SimulatedAnnealing::new(AnnealingConfig::default(), DEFAULT_SEED)
    }
}

impl SimulatedAnnealing {
    pub fn new(config: AnnealingConfig, seed: u64) -> Self {
        SimulatedAnnealing {
            config,
            budget: SearchBudget::default(),
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Swaps two distinct interior cells; `None` when there are fewer than two.
    fn perturb(&mut self, path: &[Position]) -> Option<Path> {
        let interior = path.len().checked_sub(2)?;
        if interior < 2 {
            return None;
        }
        let picks = sample(&mut self.rng, interior, 2);
        let mut candidate = path.to_vec();
        candidate.swap(1 + picks.index(0), 1 + picks.index(1));
        Some(candidate)
    }
}

/// Walks from `start` to whichever successor is closest to the goal.
///
/// Returns an empty path on a dead end, or once the walk grows longer than the
/// grid has cells (the walk is oscillating).
pub fn greedy_path(env: &Environment, start: Position, depart: usize) -> Path {
    let goal = env.goal();
    let limit = env.grid().len();
    let mut path = vec![start];
    let mut position = start;

    while position != goal {
        if path.len() > limit {
            debug!("greedy walk from {} gave up after {} steps", start, path.len() - 1);
            return Vec::new();
        }
        let t = depart.saturating_add(path.len() - 1);
        let next = env
            .successors(position, t)
            .into_iter()
            .map(|(p, _)| p)
            .reduce(|best, candidate| {
                if env.heuristic(candidate) < env.heuristic(best) {
                    candidate
                } else {
                    best
                }
            });
        match next {
            Some(p) => {
                path.push(p);
                position = p;
            }
            None => {
                debug!("greedy walk from {} hit a dead end at {}", start, position);
                return Vec::new();
            }
        }
    }
    path
}

impl SearchStrategy for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "sa"
    }

    fn search_from(&mut self, env: &Environment, start: Position, depart: usize) -> Plan {
        let started = Instant::now();
        self.rng = StdRng::seed_from_u64(self.seed);

        let mut current = greedy_path(env, start, depart);
        let Cost::Finite(mut current_cost) = env.path_cost(&current, depart) else {
            return Plan::not_found(0, started);
        };
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = self.config.initial_temperature;
        let mut nodes = current.len();
        let mut exhausted = false;

        for _ in 0..self.config.iterations {
            if self.budget.is_exhausted(nodes, started) {
                exhausted = true;
                break;
            }
            if let Some(candidate) = self.perturb(&current) {
                // Infinite-cost swaps are dropped outright.
                if let Cost::Finite(cost) = env.path_cost(&candidate, depart) {
                    let delta = cost as f64 - current_cost as f64;
                    if delta < 0.0 || self.rng.gen::<f64>() < (-delta / temperature).exp() {
                        current = candidate;
                        current_cost = cost;
                        if current_cost < best_cost {
                            best.clone_from(&current);
                            best_cost = current_cost;
                        }
                    }
                }
            }
            temperature *= self.config.cooling;
            nodes += 1;
        }

        trace!(
            "sa: best cost {} after {} nodes, final temperature {:.3}",
            best_cost,
            nodes,
            temperature
        );
        let mut plan = Plan::found(best, Cost::Finite(best_cost), nodes, started);
        plan.metrics.budget_exhausted = exhausted;
        plan
    }
}
