use crate::algorithms::common::{Plan, SearchBudget, SearchStrategy, SearchTree};
use crate::environment::Environment;
use crate::grid::{Cost, Position};
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// Frontier entry of a best-first search.
/// `Ord` is reversed so the `BinaryHeap` pops the lowest priority first.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Entry {
    priority: u64,
    cost: u64,
    seq: usize,
    node: usize,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower f first, then deeper g (closer to the goal), then FIFO.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Dijkstra-style search over the implicit time-expanded graph, ordered by
/// `g + heuristic`. A zero heuristic gives uniform-cost search.
pub(crate) fn best_first<H>(
    env: &Environment,
    start: Position,
    depart: usize,
    budget: &SearchBudget,
    label: &str,
    heuristic: H,
) -> Plan
where
    H: Fn(Position) -> u64,
{
    let started = Instant::now();
    let goal = env.goal();

    let mut tree = SearchTree::default();
    let mut frontier = BinaryHeap::new();
    let mut best: FxHashMap<Position, u64> = FxHashMap::default();
    let mut seq = 0;

    let root = tree.root(start);
    best.insert(start, 0);
    frontier.push(Entry {
        priority: heuristic(start),
        cost: 0,
        seq,
        node: root,
    });

    let mut expanded = 0;
    while let Some(entry) = frontier.pop() {
        let node = tree.node(entry.node);
        if best.get(&node.position).is_some_and(|&b| node.cost > b) {
            continue; // superseded by a cheaper route
        }
        if budget.is_exhausted(expanded, started) {
            debug!("{}: budget exhausted after {} expansions", label, expanded);
            return Plan::cut_short(expanded, started);
        }
        expanded += 1;

        if node.position == goal {
            return Plan::found(tree.path_to(entry.node), Cost::Finite(node.cost), expanded, started);
        }

        for (next, step_cost) in env.successors(node.position, depart.saturating_add(node.depth)) {
            let new_cost = node.cost + step_cost;
            if best.get(&next).map_or(true, |&known| new_cost < known) {
                best.insert(next, new_cost);
                seq += 1;
                frontier.push(Entry {
                    priority: new_cost + heuristic(next),
                    cost: new_cost,
                    seq,
                    node: tree.extend(entry.node, next, step_cost),
                });
            }
        }
    }

    debug!("{}: frontier exhausted after {} expansions, no path", label, expanded);
    Plan::not_found(expanded, started)
}

/// A* with the Manhattan distance to the goal as heuristic.
///
/// With unit-or-greater cell costs and 4-connected moves the heuristic is
/// admissible and consistent, so the returned path has minimum cost.
#[derive(Debug, Default, Clone)]
pub struct AStar {
    budget: SearchBudget,
}

impl AStar {
    pub fn new() -> Self {
        AStar::default()
    }

    pub fn with_budget(budget: SearchBudget) -> Self {
        AStar { budget }
    }
}

impl SearchStrategy for AStar {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn search_from(&mut self, env: &Environment, start: Position, depart: usize) -> Plan {
        best_first(env, start, depart, &self.budget, self.name(), |p| env.heuristic(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn entries_pop_lowest_priority_first() {
        let mut heap = BinaryHeap::new();
        heap.push(Entry { priority: 5, cost: 1, seq: 0, node: 0 });
        heap.push(Entry { priority: 3, cost: 1, seq: 1, node: 1 });
        heap.push(Entry { priority: 3, cost: 2, seq: 2, node: 2 });
        assert_eq!(heap.pop().map(|e| e.node), Some(2));
        assert_eq!(heap.pop().map(|e| e.node), Some(1));
        assert_eq!(heap.pop().map(|e| e.node), Some(0));
    }

    #[test]
    fn routes_around_expensive_terrain() {
        let grid = Grid::from_rows(vec![vec![1, 9, 1], vec![1, 1, 1]]).unwrap();
        let env = Environment::new(grid, Position::new(0, 0), Position::new(0, 2), vec![]).unwrap();
        let plan = AStar::new().search(&env, env.start());
        assert_eq!(plan.metrics.cost, Cost::Finite(4));
        assert_eq!(
            plan.path,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(0, 2)
            ]
        );
    }
}
