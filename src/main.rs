use clap::Parser;

use delivery_pathfinding::config::Config;
use delivery_pathfinding::simulation::Simulation;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Error loading environment: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = simulation.run() {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}
