//! Command-line driven runs: a single planner with optional delivery
//! simulation, or a side-by-side comparison of every strategy.

use crate::agent::{Delivery, DeliveryAgent, LogSink, ReplanEvent, ReplanSink};
use crate::algorithms::common::Plan;
use crate::algorithms::{Strategy, StrategySettings};
use crate::config::Config;
use crate::environment::Environment;
use crate::error;
use crate::grid::{Cell, Position};
use crate::map::{load_environment, map_files};
use crate::statistics::{comparison_table, ComparisonRow};
use log::warn;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::thread;

/// Collects events for the log file; the logger is their only console output.
#[derive(Debug, Default)]
struct RecordingSink {
    events: Vec<ReplanEvent>,
}

impl ReplanSink for RecordingSink {
    fn record(&mut self, event: ReplanEvent) {
        LogSink.record(event.clone());
        self.events.push(event);
    }
}

pub struct Simulation {
    config: Config,
    settings: StrategySettings,
    env: Environment,
    has_dynamics: bool,
}

impl Simulation {
    pub fn new(config: Config) -> error::Result<Self> {
        let (map_path, dyn_path) = map_files(&config.maps_dir, &config.map);
        let env = load_environment(&map_path, dyn_path.as_deref())?;
        if !config.quiet {
            println!(
                "Loading map: {}{}",
                map_path.display(),
                if dyn_path.is_some() { " with dynamics" } else { "" }
            );
            println!("Start: {}, Goal: {}", env.start(), env.goal());
        }
        Ok(Simulation {
            settings: config.strategy_settings(),
            has_dynamics: env.has_moving_obstacles(),
            config,
            env,
        })
    }

    pub fn run(&self) -> io::Result<()> {
        if self.config.compare {
            let rows = self.compare();
            println!("\n=== PLANNER COMPARISON ({}) ===", self.config.map);
            print!("{}", comparison_table(&rows, self.env.static_optimal_cost()));
            return Ok(());
        }
        match self.config.planner {
            Some(strategy) => self.run_single(strategy),
            None => Ok(()),
        }
    }

    /// Plans with every strategy concurrently against the shared environment.
    pub fn compare(&self) -> Vec<ComparisonRow> {
        let env = &self.env;
        let settings = &self.settings;
        thread::scope(|s| {
            let handles: Vec<_> = Strategy::ALL
                .into_iter()
                .map(|strategy| {
                    s.spawn(move || {
                        let plan = strategy.build(settings).search(env, env.start());
                        ComparisonRow::new(strategy, &plan)
                    })
                })
                .collect();
            handles
                .into_iter()
                .zip(Strategy::ALL)
                .map(|(handle, strategy)| {
                    handle.join().unwrap_or_else(|_| {
                        warn!("{} planner panicked", strategy);
                        ComparisonRow::new(strategy, &Plan::not_found(0, std::time::Instant::now()))
                    })
                })
                .collect()
        })
    }

    fn run_single(&self, strategy: Strategy) -> io::Result<()> {
        println!("Planner: {}", strategy.name().to_uppercase());

        let plan = strategy.build(&self.settings).search(&self.env, self.env.start());
        if !plan.is_found() {
            println!("No path found. {}", plan.metrics);
            return Ok(());
        }

        let head: Vec<String> = plan.path.iter().take(5).map(|p| p.to_string()).collect();
        println!("Initial path found: [{}]... (length {})", head.join(", "), plan.path.len());
        println!("Metrics: {}", plan.metrics);

        let mut shown = plan.path.clone();
        if self.config.replan {
            if self.has_dynamics {
                let delivery = self.simulate_delivery(strategy, plan.path)?;
                shown = delivery.executed;
            } else {
                println!("Replanning skipped: map has no moving obstacles.");
            }
        }

        if self.config.plot {
            println!();
            print!("{}", render_path(&self.env, &shown));
        }
        Ok(())
    }

    fn simulate_delivery(&self, strategy: Strategy, path: Vec<Position>) -> io::Result<Delivery> {
        println!("Starting replanning simulation...");
        let mut agent = DeliveryAgent::new(strategy.build(&self.settings)).with_max_steps(self.config.max_steps);
        let mut sink = RecordingSink::default();
        let delivery = agent.deliver(&self.env, path, &mut sink);
        print!("{}", delivery);

        write_replan_log(
            &self.config.log_file,
            strategy,
            &self.config.map,
            &delivery,
            &sink.events,
        )?;
        println!("Replan details saved to {}", self.config.log_file.display());
        Ok(delivery)
    }
}

/// Writes the human-readable replan log.
pub fn write_replan_log(
    path: &Path,
    strategy: Strategy,
    map: &str,
    delivery: &Delivery,
    events: &[ReplanEvent],
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Planner: {} on {} map", strategy.name().to_uppercase(), map)?;
    writeln!(out, "Outcome: {}", delivery.outcome)?;
    writeln!(out, "Replans: {}", delivery.replans)?;
    let steps: Vec<String> = delivery.executed.iter().map(|p| p.to_string()).collect();
    writeln!(out, "Final Path: [{}]", steps.join(", "))?;
    for event in events {
        writeln!(out, "{}", event)?;
    }
    out.flush()
}

/// Renders the grid with `path`, start, goal and moving obstacles at t = 0.
pub fn render_path(env: &Environment, path: &[Position]) -> String {
    let on_path: FxHashSet<Position> = path.iter().copied().collect();
    let vehicles: FxHashSet<Position> = env
        .obstacles()
        .into_iter()
        .filter_map(|o| o.position_at(0))
        .collect();
    let grid = env.grid();

    let mut out = String::from("Legend: S=Start, G=Goal, *=Path, #=Wall, V=Vehicle at t=0, 1-9=Cost (+ above 9)\n");
    out.push_str("   ");
    for c in 0..grid.cols() {
        out.push_str(&format!("{:2}", c % 10));
    }
    out.push('\n');

    for r in 0..grid.rows() {
        out.push_str(&format!("{:2} ", r));
        for c in 0..grid.cols() {
            let pos = Position::new(r as i32, c as i32);
            let symbol = if pos == env.start() {
                'S'
            } else if pos == env.goal() {
                'G'
            } else if vehicles.contains(&pos) {
                'V'
            } else if on_path.contains(&pos) {
                '*'
            } else {
                match grid.cell(pos) {
                    Some(Cell::Open(cost)) if cost <= 9 => char::from_digit(cost, 10).unwrap_or('+'),
                    Some(Cell::Open(_)) => '+',
                    Some(Cell::Wall) | None => '#',
                }
            };
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
