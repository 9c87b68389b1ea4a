//! The planning environment: static terrain plus periodic moving obstacles.
//!
//! Time is always an explicit step index, so one `Environment` can be shared
//! read-only by any number of planning calls.

use crate::error::EnvironmentError;
use crate::grid::{Cost, Grid, Position};
use log::trace;
use pathfinding::prelude::astar;
use rustc_hash::FxHashMap;

/// An obstacle that cycles through its waypoints, one per time step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingObstacle {
    pub id: String,
    pub position: Position,
    pub waypoints: Vec<Position>,
}

impl MovingObstacle {
    pub fn new(id: impl Into<String>, position: Position, waypoints: Vec<Position>) -> Self {
        MovingObstacle {
            id: id.into(),
            position,
            waypoints,
        }
    }

    /// Cell held at time `t`, or `None` for an obstacle without waypoints.
    pub fn position_at(&self, t: usize) -> Option<Position> {
        if self.waypoints.is_empty() {
            return None;
        }
        Some(self.waypoints[t % self.waypoints.len()])
    }

    pub fn period(&self) -> usize {
        self.waypoints.len()
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    grid: Grid,
    start: Position,
    goal: Position,
    obstacles: FxHashMap<String, MovingObstacle>,
}

impl Environment {
    /// Validates and assembles an environment.
    pub fn new(
        grid: Grid,
        start: Position,
        goal: Position,
        obstacles: Vec<MovingObstacle>,
    ) -> Result<Self, EnvironmentError> {
        let out_of_bounds = |what, pos| EnvironmentError::OutOfBounds {
            what,
            pos,
            rows: grid.rows(),
            cols: grid.cols(),
        };
        if !grid.contains(start) {
            return Err(out_of_bounds("start", start));
        }
        if !grid.contains(goal) {
            return Err(out_of_bounds("goal", goal));
        }

        let mut registry = FxHashMap::default();
        for obstacle in obstacles {
            if obstacle.id.is_empty() {
                return Err(EnvironmentError::EmptyObstacleId);
            }
            if let Some(index) = obstacle.waypoints.iter().position(|w| !grid.contains(*w)) {
                return Err(EnvironmentError::WaypointOutOfBounds {
                    pos: obstacle.waypoints[index],
                    id: obstacle.id,
                    index,
                });
            }
            if registry.contains_key(&obstacle.id) {
                return Err(EnvironmentError::DuplicateObstacle(obstacle.id));
            }
            registry.insert(obstacle.id.clone(), obstacle);
        }

        Ok(Environment {
            grid,
            start,
            goal,
            obstacles: registry,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn obstacle(&self, id: &str) -> Option<&MovingObstacle> {
        self.obstacles.get(id)
    }

    /// Moving obstacles sorted by identifier.
    pub fn obstacles(&self) -> Vec<&MovingObstacle> {
        let mut all: Vec<_> = self.obstacles.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn has_moving_obstacles(&self) -> bool {
        !self.obstacles.is_empty()
    }

    pub fn cost(&self, pos: Position) -> Cost {
        self.grid.cost(pos)
    }

    pub fn is_occupied(&self, pos: Position, t: usize) -> bool {
        if !self.cost(pos).is_finite() {
            return true;
        }
        self.obstacles
            .values()
            .any(|obstacle| obstacle.position_at(t) == Some(pos))
    }

    /// Neighbours of `pos` that are free at `t + 1`, with their entry cost.
    /// The clock saturates at `usize::MAX`.
    pub fn successors(&self, pos: Position, t: usize) -> Vec<(Position, u64)> {
        pos.neighbours()
            .into_iter()
            .filter(|next| !self.is_occupied(*next, t.saturating_add(1)))
            .filter_map(|next| self.cost(next).finite().map(|cost| (next, cost)))
            .collect()
    }

    /// Manhattan distance to the goal.
    pub fn heuristic(&self, pos: Position) -> u64 {
        pos.manhattan(&self.goal)
    }

    /// Sum of destination-cell costs along `path`, with `path[0]` at time `depart`.
    ///
    /// Non-adjacent steps and steps onto cells occupied at arrival cost `Infinite`.
    /// An empty path also costs `Infinite`.
    pub fn path_cost(&self, path: &[Position], depart: usize) -> Cost {
        if path.is_empty() {
            return Cost::Infinite;
        }
        let mut total = Cost::ZERO;
        for (i, step) in path.windows(2).enumerate() {
            let (from, to) = (step[0], step[1]);
            if !from.is_adjacent(&to) || self.is_occupied(to, depart.saturating_add(i + 1)) {
                return Cost::Infinite;
            }
            total = total.plus(self.cost(to));
        }
        total
    }

    /// Minimum cost from start to goal over static terrain only.
    pub fn static_optimal_cost(&self) -> Cost {
        let result = astar(
            &self.start,
            |p| {
                p.neighbours()
                    .into_iter()
                    .filter_map(|n| self.cost(n).finite().map(|c| (n, c)))
                    .collect::<Vec<_>>()
            },
            |p| self.heuristic(*p),
            |p| *p == self.goal,
        );
        trace!("static lower bound search finished: {:?}", result.as_ref().map(|r| r.1));
        result.map_or(Cost::Infinite, |(_, cost)| Cost::Finite(cost))
    }
}
