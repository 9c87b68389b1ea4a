use crate::algorithms::common::{Plan, SearchBudget, SearchStrategy, SearchTree};
use crate::environment::Environment;
use crate::grid::{Cost, Position};
use log::debug;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::time::Instant;

/// Level-order search; finds a path with the fewest steps, ignoring terrain cost.
#[derive(Debug, Default, Clone)]
pub struct BreadthFirst {
    budget: SearchBudget,
}

impl BreadthFirst {
    pub fn new() -> Self {
        BreadthFirst::default()
    }

    pub fn with_budget(budget: SearchBudget) -> Self {
        BreadthFirst { budget }
    }
}

impl SearchStrategy for BreadthFirst {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn search_from(&mut self, env: &Environment, start: Position, depart: usize) -> Plan {
        let started = Instant::now();
        let goal = env.goal();

        let mut tree = SearchTree::default();
        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();
        queue.push_back(tree.root(start));
        visited.insert(start);

        let mut expanded = 0;
        while let Some(id) = queue.pop_front() {
            if self.budget.is_exhausted(expanded, started) {
                debug!("bfs: budget exhausted after {} expansions", expanded);
                return Plan::cut_short(expanded, started);
            }
            expanded += 1;

            let node = tree.node(id);
            if node.position == goal {
                return Plan::found(tree.path_to(id), Cost::Finite(node.cost), expanded, started);
            }

            for (next, step_cost) in env.successors(node.position, depart.saturating_add(node.depth)) {
                // Cells are claimed on enqueue, never reconsidered.
                if visited.insert(next) {
                    queue.push_back(tree.extend(id, next, step_cost));
                }
            }
        }

        debug!("bfs: frontier exhausted after {} expansions, no path", expanded);
        Plan::not_found(expanded, started)
    }
}
