use crate::agent::{Delivery, DeliveryOutcome};
use crate::algorithms::common::{Plan, PlanMetrics};
use crate::algorithms::Strategy;
use crate::grid::Cost;
use std::fmt;

impl fmt::Display for PlanMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cost={}, Nodes Expanded={}, Time={:.3}s",
            self.cost,
            self.nodes_expanded,
            self.elapsed.as_secs_f64()
        )?;
        if self.budget_exhausted {
            write!(f, " (search budget exhausted)")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered => write!(f, "Delivery successful"),
            DeliveryOutcome::StepBudgetExhausted => write!(f, "Failed: step budget exhausted"),
            DeliveryOutcome::Blocked { step } => write!(f, "Failed: blocked at step {}", step),
        }
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.outcome)?;
        writeln!(f, "Replans: {}", self.replans)?;
        writeln!(f, "Steps taken: {}", self.executed.len().saturating_sub(1))?;
        writeln!(f, "Incurred cost: {}", self.cost)?;
        Ok(())
    }
}

/// One row of a strategy comparison.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub strategy: Strategy,
    pub path_len: usize,
    pub metrics: PlanMetrics,
}

impl ComparisonRow {
    pub fn new(strategy: Strategy, plan: &Plan) -> Self {
        ComparisonRow {
            strategy,
            path_len: plan.path.len(),
            metrics: plan.metrics,
        }
    }

    /// Cost relative to the static lower bound; `None` when either is infinite.
    pub fn cost_ratio(&self, lower_bound: Cost) -> Option<f64> {
        match (self.metrics.cost, lower_bound) {
            (Cost::Finite(c), Cost::Finite(b)) if b > 0 => Some(c as f64 / b as f64),
            (Cost::Finite(0), Cost::Finite(0)) => Some(1.0),
            _ => None,
        }
    }
}

/// Formats comparison rows as a table.
pub fn comparison_table(rows: &[ComparisonRow], lower_bound: Cost) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<8} {:<10} {:<8} {:<12} {:<10}\n",
        "Planner", "Found", "Cost", "Length", "Nodes", "Time"
    ));
    out.push_str(&format!("{}\n", "-".repeat(60)));
    for row in rows {
        let found = if row.path_len > 0 { "yes" } else { "no" };
        out.push_str(&format!(
            "{:<8} {:<8} {:<10} {:<8} {:<12} {:<10}\n",
            row.strategy.name(),
            found,
            row.metrics.cost.to_string(),
            row.path_len,
            row.metrics.nodes_expanded,
            format!("{:.2?}", row.metrics.elapsed)
        ));
    }
    out.push_str(&format!("\nStatic lower bound (no moving obstacles): {}\n", lower_bound));

    let best = rows
        .iter()
        .filter(|r| r.metrics.cost.is_finite())
        .min_by_key(|r| (r.metrics.cost, r.metrics.nodes_expanded));
    match best {
        Some(row) => {
            out.push_str(&format!("Cheapest: {} (cost {}", row.strategy, row.metrics.cost));
            if let Some(ratio) = row.cost_ratio(lower_bound) {
                out.push_str(&format!(", {:.3}x lower bound", ratio));
            }
            out.push_str(")\n");
        }
        None => out.push_str("No strategy found a path.\n"),
    }
    out
}
