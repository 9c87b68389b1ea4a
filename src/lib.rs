//! Single-agent path planning on a cost grid with periodic moving obstacles.
//!
//! The [`environment::Environment`] answers time-indexed occupancy and
//! successor queries; the strategies in [`algorithms`] search over it; the
//! [`agent::DeliveryAgent`] executes a path and replans around traffic.

pub mod agent;
pub mod algorithms;
pub mod config;
pub mod environment;
pub mod error;
pub mod grid;
pub mod map;
pub mod simulation;
pub mod statistics;

pub use algorithms::common::{Path, Plan, PlanMetrics, SearchBudget, SearchStrategy};
pub use algorithms::Strategy;
pub use environment::{Environment, MovingObstacle};
pub use grid::{Cost, Grid, Position};
