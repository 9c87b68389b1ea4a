//! Delivery agent that executes a committed path and replans around moving
//! obstacles it is about to run into.

use crate::algorithms::common::{Path, SearchStrategy};
use crate::environment::Environment;
use crate::grid::{Cost, Position};
use log::{debug, info, warn};
use std::fmt;

/// Default number of steps an agent may take before giving up.
pub const DEFAULT_MAX_STEPS: usize = 200;

/// Diagnostic record of the driver's decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplanEvent {
    Blocked {
        step: usize,
        at: Position,
        from: Position,
    },
    Replanned {
        step: usize,
        from: Position,
        segment_len: usize,
        segment_cost: Cost,
    },
    ReplanFailed {
        step: usize,
        from: Position,
    },
}

impl fmt::Display for ReplanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplanEvent::Blocked { step, at, from } => {
                write!(f, "Step {}: Blocked at {}. Replanning from {}", step, at, from)
            }
            ReplanEvent::Replanned {
                step,
                from,
                segment_len,
                segment_cost,
            } => write!(
                f,
                "Step {}: Replanned from {}. New sub-path length: {}, cost: {}",
                step, from, segment_len, segment_cost
            ),
            ReplanEvent::ReplanFailed { step, from } => {
                write!(f, "Step {}: Replan from {} found no route to the goal", step, from)
            }
        }
    }
}

/// Destination for [`ReplanEvent`]s.
pub trait ReplanSink {
    fn record(&mut self, event: ReplanEvent);
}

impl ReplanSink for Vec<ReplanEvent> {
    fn record(&mut self, event: ReplanEvent) {
        self.push(event);
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReplanSink for LogSink {
    fn record(&mut self, event: ReplanEvent) {
        match event {
            ReplanEvent::ReplanFailed { .. } => warn!("{}", event),
            _ => info!("{}", event),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    StepBudgetExhausted,
    /// A replan was needed at `step` but produced no usable route.
    Blocked { step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub outcome: DeliveryOutcome,
    /// Positions actually visited, starting with the start cell.
    pub executed: Path,
    /// The committed path after the last splice.
    pub committed: Path,
    pub replans: usize,
    /// Sum of the cells entered along `executed`.
    pub cost: Cost,
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        self.outcome == DeliveryOutcome::Delivered
    }
}

pub struct DeliveryAgent {
    strategy: Box<dyn SearchStrategy>,
    max_steps: usize,
}

impl DeliveryAgent {
    pub fn new(strategy: Box<dyn SearchStrategy>) -> Self {
        DeliveryAgent {
            strategy,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Plans an initial path from `start` with the agent's strategy.
    pub fn plan(&mut self, env: &Environment, start: Position) -> Path {
        self.strategy.search(env, start).path
    }

    /// Walks `path`, replanning whenever the next scheduled cell is occupied at
    /// the time the agent would enter it or is not adjacent to the current one.
    pub fn deliver(
        &mut self,
        env: &Environment,
        mut path: Path,
        sink: &mut dyn ReplanSink,
    ) -> Delivery {
        let goal = env.goal();
        if path.is_empty() {
            return Delivery {
                outcome: DeliveryOutcome::Blocked { step: 0 },
                executed: Vec::new(),
                committed: path,
                replans: 0,
                cost: Cost::Infinite,
            };
        }
        let start = path[0];

        let mut executed = vec![start];
        let mut position = start;
        let mut cost = Cost::ZERO;
        let mut replans = 0;
        let mut t = 1;

        let outcome = loop {
            if position == goal {
                break DeliveryOutcome::Delivered;
            }
            if t > self.max_steps {
                debug!("step budget of {} exhausted at {}", self.max_steps, position);
                break DeliveryOutcome::StepBudgetExhausted;
            }
            let conflict = match path.get(t) {
                None => true,
                Some(&next) => !path[t - 1].is_adjacent(&next) || env.is_occupied(next, t),
            };
            if conflict {
                let from = path[t - 1];
                if let Some(&at) = path.get(t) {
                    sink.record(ReplanEvent::Blocked { step: t, at, from });
                }
                let plan = self.strategy.search_from(env, from, t - 1);
                let usable = plan.path.len() > 1
                    && plan.path.first() == Some(&from)
                    && plan.path.last() == Some(&goal)
                    && !env.is_occupied(plan.path[1], t);
                if !usable {
                    sink.record(ReplanEvent::ReplanFailed { step: t, from });
                    break DeliveryOutcome::Blocked { step: t };
                }
                sink.record(ReplanEvent::Replanned {
                    step: t,
                    from,
                    segment_len: plan.path.len() - 1,
                    segment_cost: plan.metrics.cost,
                });
                path.truncate(t);
                path.extend_from_slice(&plan.path[1..]);
                replans += 1;
            }

            position = path[t];
            cost = cost.plus(env.cost(position));
            executed.push(position);
            t += 1;
        };

        Delivery {
            outcome,
            executed,
            committed: path,
            replans,
            cost,
        }
    }
}
