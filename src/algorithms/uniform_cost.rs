use crate::algorithms::a_star::best_first;
use crate::algorithms::common::{Plan, SearchBudget, SearchStrategy};
use crate::environment::Environment;
use crate::grid::Position;

/// Uniform-cost search: best-first on accumulated cost alone.
#[derive(Debug, Default, Clone)]
pub struct UniformCost {
    budget: SearchBudget,
}

impl UniformCost {
    pub fn new() -> Self {
        UniformCost::default()
    }

    pub fn with_budget(budget: SearchBudget) -> Self {
        UniformCost { budget }
    }
}

impl SearchStrategy for UniformCost {
    fn name(&self) -> &'static str {
        "ucs"
    }

    fn search_from(&mut self, env: &Environment, start: Position, depart: usize) -> Plan {
        best_first(env, start, depart, &self.budget, self.name(), |_| 0)
    }
}
