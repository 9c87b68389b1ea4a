use delivery_pathfinding::agent::{DeliveryAgent, DeliveryOutcome, LogSink, ReplanEvent};
use delivery_pathfinding::algorithms::a_star::AStar;
use delivery_pathfinding::algorithms::annealing::{AnnealingConfig, SimulatedAnnealing, DEFAULT_SEED};
use delivery_pathfinding::algorithms::breadth_first::BreadthFirst;
use delivery_pathfinding::map::{load_environment, map_files};
use delivery_pathfinding::{Cost, Environment, Grid, MovingObstacle, Path, Position, SearchStrategy};
use std::path::PathBuf;

/// Three-lane road where a cart crosses into the middle lane at t = 3.
fn crossing() -> Environment {
    let grid = Grid::from_rows(vec![vec![1; 6]; 3]).unwrap();
    let cart = MovingObstacle::new(
        "cart",
        Position::new(0, 3),
        vec![
            Position::new(0, 3),
            Position::new(0, 3),
            Position::new(0, 3),
            Position::new(1, 3),
        ],
    );
    Environment::new(grid, Position::new(1, 0), Position::new(1, 5), vec![cart]).unwrap()
}

fn middle_lane() -> Path {
    (0..6).map(|c| Position::new(1, c)).collect()
}

fn assert_reached_goal(env: &Environment, executed: &[Position]) {
    assert_eq!(executed.first(), Some(&env.start()));
    assert_eq!(executed.last(), Some(&env.goal()));
    for (t, pos) in executed.iter().enumerate().skip(1) {
        assert!(!env.is_occupied(*pos, t), "collision at {} on step {}", pos, t);
    }
}

#[test]
fn crossing_cart_triggers_one_replan() {
    let env = crossing();
    let mut events: Vec<ReplanEvent> = Vec::new();
    let delivery = DeliveryAgent::new(Box::new(AStar::new())).deliver(&env, middle_lane(), &mut events);

    assert!(delivery.is_delivered());
    assert_eq!(delivery.replans, 1);
    assert_reached_goal(&env, &delivery.executed);
    // Two steps along the lane, then the shortest detour of five cells.
    assert_eq!(delivery.cost, Cost::Finite(7));
    assert_eq!(env.path_cost(&delivery.executed, 0), delivery.cost);
    assert_eq!(delivery.committed, delivery.executed);

    assert_eq!(
        events[0],
        ReplanEvent::Blocked {
            step: 3,
            at: Position::new(1, 3),
            from: Position::new(1, 2),
        }
    );
    assert_eq!(
        events[1],
        ReplanEvent::Replanned {
            step: 3,
            from: Position::new(1, 2),
            segment_len: 5,
            segment_cost: Cost::Finite(5),
        }
    );
}

#[test]
fn every_replanner_gets_past_the_cart() {
    let env = crossing();
    let replanners: Vec<Box<dyn SearchStrategy>> = vec![
        Box::new(BreadthFirst::new()),
        Box::new(SimulatedAnnealing::new(AnnealingConfig::default(), DEFAULT_SEED)),
    ];
    for strategy in replanners {
        let name = strategy.name();
        let mut events: Vec<ReplanEvent> = Vec::new();
        let delivery = DeliveryAgent::new(strategy).deliver(&env, middle_lane(), &mut events);
        assert!(delivery.is_delivered(), "{}", name);
        assert!(delivery.replans >= 1, "{}", name);
        assert_reached_goal(&env, &delivery.executed);
        assert_eq!(env.path_cost(&delivery.executed, 0), delivery.cost, "{}", name);
    }
}

#[test]
fn parked_van_in_single_lane_blocks_delivery() {
    let grid = Grid::from_rows(vec![vec![1, 1, 1, 1]]).unwrap();
    let van = MovingObstacle::new("van", Position::new(0, 2), vec![Position::new(0, 2)]);
    let env = Environment::new(grid, Position::new(0, 0), Position::new(0, 3), vec![van]).unwrap();
    let lane: Path = (0..4).map(|c| Position::new(0, c)).collect();

    let mut events: Vec<ReplanEvent> = Vec::new();
    let delivery = DeliveryAgent::new(Box::new(AStar::new())).deliver(&env, lane, &mut events);

    assert_eq!(delivery.outcome, DeliveryOutcome::Blocked { step: 2 });
    assert_eq!(delivery.executed, vec![Position::new(0, 0), Position::new(0, 1)]);
    assert_eq!(delivery.cost, Cost::Finite(1));
    assert_eq!(delivery.replans, 0);
    assert_eq!(
        events,
        vec![
            ReplanEvent::Blocked {
                step: 2,
                at: Position::new(0, 2),
                from: Position::new(0, 1),
            },
            ReplanEvent::ReplanFailed {
                step: 2,
                from: Position::new(0, 1),
            },
        ]
    );
}

#[test]
fn truncated_commitment_is_extended_to_the_goal() {
    let env = crossing();
    let mut events: Vec<ReplanEvent> = Vec::new();
    let partial = vec![Position::new(1, 0), Position::new(1, 1)];
    let delivery = DeliveryAgent::new(Box::new(AStar::new())).deliver(&env, partial, &mut events);

    assert!(delivery.is_delivered());
    assert_reached_goal(&env, &delivery.executed);
    assert!(matches!(events[0], ReplanEvent::Replanned { step: 2, .. }));
}

#[test]
fn time_aware_plan_needs_no_replans_on_dynamic_map() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("maps");
    let (map, dynamics) = map_files(&dir, "dynamic");
    let env = load_environment(&map, dynamics.as_deref()).unwrap();

    let mut agent = DeliveryAgent::new(Box::new(AStar::new()));
    let path = agent.plan(&env, env.start());
    let planned_cost = env.path_cost(&path, 0);
    let delivery = agent.deliver(&env, path, &mut LogSink);

    assert!(delivery.is_delivered());
    assert_eq!(delivery.replans, 0);
    assert_eq!(delivery.cost, planned_cost);
    assert_reached_goal(&env, &delivery.executed);
}

#[test]
fn commitment_jumping_a_wall_is_not_walked() {
    let grid = Grid::from_rows(vec![vec![1, -1, 1, 1]]).unwrap();
    let env = Environment::new(grid, Position::new(0, 0), Position::new(0, 3), vec![]).unwrap();
    let jump = vec![Position::new(0, 0), Position::new(0, 2), Position::new(0, 3)];

    let mut events: Vec<ReplanEvent> = Vec::new();
    let delivery = DeliveryAgent::new(Box::new(AStar::new())).deliver(&env, jump, &mut events);

    assert_eq!(delivery.outcome, DeliveryOutcome::Blocked { step: 1 });
    assert_eq!(delivery.executed, vec![Position::new(0, 0)]);
    assert_eq!(
        events[0],
        ReplanEvent::Blocked {
            step: 1,
            at: Position::new(0, 2),
            from: Position::new(0, 0),
        }
    );
}

#[test]
fn gap_in_commitment_is_bridged_by_a_replan() {
    let grid = Grid::from_rows(vec![vec![1, -1, 1, 1], vec![1, 1, 1, 1]]).unwrap();
    let env = Environment::new(grid, Position::new(0, 0), Position::new(0, 3), vec![]).unwrap();
    let jump = vec![Position::new(0, 0), Position::new(0, 2), Position::new(0, 3)];

    let mut events: Vec<ReplanEvent> = Vec::new();
    let delivery = DeliveryAgent::new(Box::new(AStar::new())).deliver(&env, jump, &mut events);

    assert!(delivery.is_delivered());
    assert_eq!(delivery.replans, 1);
    assert!(delivery.executed.windows(2).all(|w| w[0].is_adjacent(&w[1])));
    assert!(!delivery.executed.contains(&Position::new(0, 1)));
    assert_eq!(delivery.cost, Cost::Finite(5));
    assert_eq!(env.path_cost(&delivery.executed, 0), delivery.cost);
}
