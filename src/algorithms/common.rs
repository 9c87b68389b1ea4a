use crate::environment::Environment;
use crate::grid::{Cost, Position};
use std::time::{Duration, Instant};

/// A path of 4-adjacent positions; empty when no path exists.
pub type Path = Vec<Position>;

/// Measurements of a single planning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanMetrics {
    pub cost: Cost,
    /// Nodes expanded by graph searches, or greedy steps plus iterations for annealing.
    pub nodes_expanded: usize,
    pub elapsed: Duration,
    pub budget_exhausted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub path: Path,
    pub metrics: PlanMetrics,
}

impl Plan {
    pub fn found(path: Path, cost: Cost, nodes_expanded: usize, started: Instant) -> Self {
        Plan {
            path,
            metrics: PlanMetrics {
                cost,
                nodes_expanded,
                elapsed: started.elapsed(),
                budget_exhausted: false,
            },
        }
    }

    pub fn not_found(nodes_expanded: usize, started: Instant) -> Self {
        Plan::found(Vec::new(), Cost::Infinite, nodes_expanded, started)
    }

    pub fn cut_short(nodes_expanded: usize, started: Instant) -> Self {
        let mut plan = Plan::not_found(nodes_expanded, started);
        plan.metrics.budget_exhausted = true;
        plan
    }

    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Cooperative limits checked once per expansion or iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_expansions: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_exhausted(&self, expansions: usize, started: Instant) -> bool {
        self.max_expansions.is_some_and(|max| expansions >= max)
            || self.time_limit.is_some_and(|limit| started.elapsed() >= limit)
    }
}

pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    /// Plans from `start` to the environment's goal with `start` at time `depart`.
    fn search_from(&mut self, env: &Environment, start: Position, depart: usize) -> Plan;

    /// Plans from `start` at time zero.
    fn search(&mut self, env: &Environment, start: Position) -> Plan {
        self.search_from(env, start, 0)
    }
}

/// Parent-pointer tree of every path the frontier has ever held.
///
/// Each frontier entry refers to its own node, so a queued route keeps its
/// exact history even when a later, cheaper route reaches the same cell.
#[derive(Debug, Default)]
pub(crate) struct SearchTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeNode {
    pub position: Position,
    pub parent: Option<usize>,
    pub depth: usize,
    pub cost: u64,
}

impl SearchTree {
    pub fn root(&mut self, position: Position) -> usize {
        self.push(TreeNode {
            position,
            parent: None,
            depth: 0,
            cost: 0,
        })
    }

    pub fn extend(&mut self, parent: usize, position: Position, step_cost: u64) -> usize {
        let from = self.nodes[parent];
        self.push(TreeNode {
            position,
            parent: Some(parent),
            depth: from.depth + 1,
            cost: from.cost + step_cost,
        })
    }

    pub fn node(&self, id: usize) -> TreeNode {
        self.nodes[id]
    }

    pub fn path_to(&self, id: usize) -> Path {
        let mut path = Vec::with_capacity(self.nodes[id].depth + 1);
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes[current];
            path.push(node.position);
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    fn push(&mut self, node: TreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_reconstructs_root_first() {
        let mut tree = SearchTree::default();
        let root = tree.root(Position::new(0, 0));
        let a = tree.extend(root, Position::new(0, 1), 2);
        let b = tree.extend(a, Position::new(1, 1), 3);
        assert_eq!(
            tree.path_to(b),
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 1)]
        );
        assert_eq!(tree.node(b).cost, 5);
        assert_eq!(tree.node(b).depth, 2);
    }

    #[test]
    fn budget_counts_expansions() {
        let budget = SearchBudget {
            max_expansions: Some(3),
            time_limit: None,
        };
        let started = Instant::now();
        assert!(!budget.is_exhausted(2, started));
        assert!(budget.is_exhausted(3, started));
        assert!(!SearchBudget::unlimited().is_exhausted(usize::MAX, started));
    }
}
