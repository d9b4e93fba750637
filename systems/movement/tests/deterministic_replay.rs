use std::time::Duration;

use motherboard_defense_core::{AgentSnapshot, CellCoord, Command, Event};
use motherboard_defense_system_movement::Movement;
use motherboard_defense_world::{self as world, query, World};

const WALL: CellCoord = CellCoord::new(2, 2);

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn scripted_session_reaches_goal_around_obstacle() {
    let outcome = replay(scripted_commands());

    assert_eq!(outcome.ticks, 5);
    assert!(outcome.occupied.contains(&WALL));
    assert!(outcome
        .events
        .contains(&Event::ObstaclePlaced { cell: WALL }));
    assert!(outcome
        .events
        .iter()
        .any(|event| matches!(event, Event::AgentReachedGoal { cell } if cell.y() == 3)));
    assert!(outcome
        .events
        .contains(&Event::AgentReturnedToSpawn { cell: CellCoord::new(2, 0) }));
    assert!(!outcome
        .events
        .iter()
        .any(|event| matches!(event, Event::AgentAdvanced { to, .. } if *to == WALL)));
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut movement = Movement::default();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().cloned());
        process_movement(&mut world, &mut movement, events, &mut log);
    }

    ReplayOutcome {
        agent: query::agent_snapshot(&world),
        occupied: query::grid(&world).occupied_cells().collect(),
        ticks: query::tick_index(&world),
        events: log,
    }
}

fn process_movement(
    world: &mut World,
    movement: &mut Movement,
    pending_events: Vec<Event>,
    log: &mut Vec<Event>,
) {
    let mut events = pending_events;

    while !events.is_empty() {
        let agent = query::agent_snapshot(world);
        let mut commands = Vec::new();
        movement.handle(
            &events,
            &agent,
            query::grid(world),
            query::goals(world),
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        log.extend(events.iter().cloned());
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::ConfigureGrid {
            width: 5,
            length: 4,
            spawn: CellCoord::new(2, 0),
        },
        Command::PlaceObstacle { cell: WALL },
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        Command::Tick {
            dt: Duration::from_secs(1),
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    agent: AgentSnapshot,
    occupied: Vec<CellCoord>,
    ticks: u64,
    events: Vec<Event>,
}
