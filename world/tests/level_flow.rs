use std::collections::{HashMap, VecDeque};

use find_gold_core::{CellCoord, Command, Direction, Event, MazeSnapshot, ProgressionPhase};
use find_gold_world::{apply, move_east, move_north, move_south, move_west, query, World};

#[derive(Clone, Copy)]
enum Drive {
    Discrete,
    Continuous,
}

fn route(snapshot: &MazeSnapshot, from: CellCoord, to: CellCoord) -> Vec<Direction> {
    let mut came_from: HashMap<CellCoord, (CellCoord, Direction)> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    while let Some(cell) = queue.pop_front() {
        if cell == to {
            break;
        }
        let walls = snapshot.cell(cell).expect("cell in bounds").walls;
        for direction in Direction::ALL {
            if walls.is_closed(direction) {
                continue;
            }
            let Some(next) = cell.neighbor(direction, snapshot.columns(), snapshot.rows()) else {
                continue;
            };
            if next == from || came_from.contains_key(&next) {
                continue;
            }
            let _ = came_from.insert(next, (cell, direction));
            queue.push_back(next);
        }
    }

    let mut path = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let (previous, direction) = came_from[&cursor];
        path.push(direction);
        cursor = previous;
    }
    path.reverse();
    path
}

fn walk(world: &mut World, target: CellCoord, drive: Drive, events: &mut Vec<Event>) {
    let path = route(query::maze_snapshot(world), query::current_cell(world), target);
    for direction in path {
        match drive {
            Drive::Discrete => {
                let moved = match direction {
                    Direction::North => move_north(world, events),
                    Direction::South => move_south(world, events),
                    Direction::West => move_west(world, events),
                    Direction::East => move_east(world, events),
                };
                assert!(moved, "open passage {direction:?} was reported as blocked");
            }
            Drive::Continuous => {
                let (dx, dz) = match direction {
                    Direction::North => (0.0, -1.0),
                    Direction::South => (0.0, 1.0),
                    Direction::West => (-1.0, 0.0),
                    Direction::East => (1.0, 0.0),
                };
                apply(world, Command::MovePlayer { dx, dz }, events);
            }
        }
    }
    assert_eq!(query::current_cell(world), target);
}

fn clear_level(world: &mut World, drive: Drive) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        let snapshot = query::maze_snapshot(world);
        let Some(next) = snapshot.gold().iter().find(|gold| gold.show).map(|gold| gold.cell)
        else {
            break;
        };
        walk(world, next, drive, &mut events);
    }
    assert_eq!(query::phase(world), ProgressionPhase::ExitUnlocked);

    let exit = query::maze_snapshot(world).exit().expect("level has an exit");
    walk(world, exit, drive, &mut events);
    events
}

fn count<F: Fn(&Event) -> bool>(events: &[Event], predicate: F) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

fn assert_cleared(world: &mut World, events: &[Event], gold: usize) {
    let collected: u32 = events
        .iter()
        .filter_map(|event| match event {
            Event::GoldCollected { collected, .. } => Some(*collected),
            _ => None,
        })
        .sum();
    assert_eq!(collected as usize, gold);
    assert_eq!(count(events, |event| matches!(event, Event::ExitUnlocked { .. })), 1);
    assert_eq!(count(events, |event| matches!(event, Event::LevelCompleted { .. })), 1);
    assert!(matches!(events.last(), Some(Event::LevelCompleted { .. })));
    assert_eq!(query::phase(world), ProgressionPhase::LevelComplete);
    assert_eq!(query::nearest_gold_distance(world), None);

    let steps = count(events, |event| matches!(event, Event::PlayerStepped { .. }));
    assert_eq!(query::steps(world) as usize, steps);
    assert!(matches!(
        events.last(),
        Some(Event::LevelCompleted { steps: reported, .. }) if *reported as usize == steps
    ));
}

#[test]
fn discrete_moves_clear_levels_and_advance() {
    let mut world = World::new();

    for level in 1..=3 {
        assert_eq!(query::level(&world), level);
        let events = clear_level(&mut world, Drive::Discrete);
        assert_cleared(&mut world, &events, level as usize);

        let mut advance = Vec::new();
        apply(&mut world, Command::AdvanceLevel, &mut advance);
        assert!(matches!(
            advance.as_slice(),
            [Event::LevelStarted { level: started, .. }] if *started == level + 1
        ));
        assert_eq!(query::phase(&world), ProgressionPhase::Exploring);
        assert_eq!(query::steps(&world), 0);
    }
}

#[test]
fn continuous_moves_clear_a_level() {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(&mut world, Command::StartLevel { level: 4 }, &mut events);

    let events = clear_level(&mut world, Drive::Continuous);
    assert_cleared(&mut world, &events, 4);
}

#[test]
fn collecting_gold_replaces_the_snapshot_without_moving_anything() {
    let mut world = World::new();
    let before = query::maze_snapshot(&world).clone();
    let gold = before.gold()[0].cell;

    let mut events = Vec::new();
    walk(&mut world, gold, Drive::Discrete, &mut events);

    let after = query::maze_snapshot(&world);
    assert!(before.gold()[0].show);
    assert!(!after.gold()[0].show);
    assert_eq!(after.cells(), before.cells());
    assert_eq!(after.exit(), before.exit());
    assert!(events.contains(&Event::GoldCollected {
        cell: gold,
        collected: 1,
        remaining: 0,
    }));
    assert!(events.contains(&Event::ExitUnlocked {
        exit: before.exit()
    }));
}

#[test]
fn completed_levels_ignore_further_movement() {
    let mut world = World::new();
    let _ = clear_level(&mut world, Drive::Discrete);

    let mut events = Vec::new();
    let direction = Direction::ALL
        .into_iter()
        .find(|direction| {
            let snapshot = query::maze_snapshot(&world);
            let cell = query::current_cell(&world);
            !snapshot.cell(cell).expect("cell").walls.is_closed(*direction)
        })
        .expect("exit cell has an opening");
    apply(&mut world, Command::StepPlayer { direction }, &mut events);

    assert_eq!(query::phase(&world), ProgressionPhase::LevelComplete);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::LevelCompleted { .. } | Event::ExitUnlocked { .. })));
}
