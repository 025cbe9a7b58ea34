//! Drives the world through whole levels along breadth-first routes.

use std::collections::VecDeque;

use anyhow::{bail, Context, Result};
use find_gold_core::{CellCoord, Command, Direction, Event, MazeSnapshot, ProgressionPhase};
use find_gold_world::{apply, query, World};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one automatically played level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct LevelReport {
    pub(crate) level: u32,
    pub(crate) gold: u32,
    pub(crate) steps: u32,
    pub(crate) events: usize,
}

/// Plays `levels` consecutive levels starting from the world's current one.
pub(crate) fn autoplay(world: &mut World, levels: u32) -> Result<Vec<LevelReport>> {
    let mut reports = Vec::new();
    for played in 0..levels {
        if played > 0 {
            let mut events = Vec::new();
            apply(world, Command::AdvanceLevel, &mut events);
            log_events(&events);
        }
        reports.push(play_level(world)?);
    }
    Ok(reports)
}

fn play_level(world: &mut World) -> Result<LevelReport> {
    let level = query::level(world);
    let gold = u32::try_from(query::maze_snapshot(world).gold().len()).unwrap_or(u32::MAX);
    let mut events = Vec::new();

    while let Some(target) = nearest_visible_gold(world) {
        walk_to(world, target, &mut events)
            .with_context(|| format!("level {level}: collecting gold at {target:?}"))?;
    }

    if query::phase(world) != ProgressionPhase::ExitUnlocked {
        bail!("level {level}: exit did not unlock after collecting all gold");
    }

    let exit = query::maze_snapshot(world)
        .exit()
        .with_context(|| format!("level {level} has no exit"))?;
    walk_to(world, exit, &mut events).with_context(|| format!("level {level}: reaching exit"))?;

    if query::phase(world) != ProgressionPhase::LevelComplete {
        bail!("level {level}: standing on the exit did not complete the level");
    }

    let steps = query::steps(world);
    info!(level, gold, steps, "autoplay cleared level");
    Ok(LevelReport {
        level,
        gold,
        steps,
        events: events.len(),
    })
}

fn nearest_visible_gold(world: &World) -> Option<CellCoord> {
    let here = query::current_cell(world);
    query::maze_snapshot(world)
        .gold()
        .iter()
        .filter(|gold| gold.show)
        .min_by_key(|gold| gold.cell.manhattan_distance(here))
        .map(|gold| gold.cell)
}

fn walk_to(world: &mut World, target: CellCoord, events: &mut Vec<Event>) -> Result<()> {
    let from = query::current_cell(world);
    let path = route(query::maze_snapshot(world), from, target)
        .with_context(|| format!("no passage from {from:?} to {target:?}"))?;
    let cell_size = query::config(world).collision.cell_size;

    for direction in path {
        let (dx, dz) = match direction {
            Direction::North => (0.0, -cell_size),
            Direction::South => (0.0, cell_size),
            Direction::West => (-cell_size, 0.0),
            Direction::East => (cell_size, 0.0),
        };
        let start = events.len();
        apply(world, Command::MovePlayer { dx, dz }, events);
        log_events(&events[start..]);
    }

    let reached = query::current_cell(world);
    if reached != target {
        bail!("walked to {reached:?} instead of {target:?}");
    }
    Ok(())
}

/// Directions leading from `from` to `to` through open walls, shortest first found.
pub(crate) fn route(
    snapshot: &MazeSnapshot,
    from: CellCoord,
    to: CellCoord,
) -> Option<Vec<Direction>> {
    let start = snapshot.index(from)?;
    let goal = snapshot.index(to)?;
    let mut came_from: Vec<Option<(usize, Direction)>> = vec![None; snapshot.cells().len()];
    let mut seen = vec![false; snapshot.cells().len()];
    seen[start] = true;

    let mut queue = VecDeque::from([from]);
    while let Some(cell) = queue.pop_front() {
        if cell == to {
            break;
        }
        let Some(current) = snapshot.index(cell) else {
            continue;
        };
        let walls = snapshot.cells()[current].walls;
        for direction in Direction::ALL {
            if walls.is_closed(direction) {
                continue;
            }
            let Some(next) = cell.neighbor(direction, snapshot.columns(), snapshot.rows()) else {
                continue;
            };
            let Some(index) = snapshot.index(next) else {
                continue;
            };
            if seen[index] {
                continue;
            }
            seen[index] = true;
            came_from[index] = Some((current, direction));
            queue.push_back(next);
        }
    }

    if !seen[goal] {
        return None;
    }

    let mut path = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        let (previous, direction) = came_from[cursor]?;
        path.push(direction);
        cursor = previous;
    }
    path.reverse();
    Some(path)
}

fn log_events(events: &[Event]) {
    for event in events {
        debug!(?event, "world event");
    }
}
