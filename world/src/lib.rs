#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Find Gold.
//!
//! Adapters never touch state directly: they submit [`Command`] values through
//! [`apply`] and read results back through the [`query`] module. Every level is
//! built in one go and swapped in atomically, so a partially built maze is
//! never observable.

mod config;
mod level;

use find_gold_core::{CellCoord, Command, Direction, Event, ProgressionPhase};
use find_gold_system_collision::{move_with_grid_collisions, player_at_cell_center};
use find_gold_system_generation::MazeGenerator;
use find_gold_system_placement::ItemPlacer;
use find_gold_system_progression::{collect_at_cell, remaining_gold};
use tracing::{debug, info};

pub use config::{ConfigError, WorldConfig, MAX_DIMENSION, MIN_CELLS};
pub use level::derive_level_seed;

use level::{build_level, LevelState};

/// Represents the authoritative Find Gold world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    generator: MazeGenerator,
    placer: ItemPlacer,
    level: LevelState,
}

impl World {
    /// Creates a world on level 1 using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates a world on level 1 after validating `config`.
    pub fn with_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let mut generator = MazeGenerator::new();
        let mut placer = ItemPlacer::new(config.placement.clone());
        let level = build_level(&config, 1, &mut generator, &mut placer);
        Self {
            config,
            generator,
            placer,
            level,
        }
    }

    fn start_level(&mut self, number: u32, out_events: &mut Vec<Event>) {
        self.level = build_level(&self.config, number, &mut self.generator, &mut self.placer);

        let exit = self.level.snapshot.exit();
        let gold = remaining_gold(self.level.snapshot.gold());
        info!(level = number, ?exit, gold, "level started");
        out_events.push(Event::LevelStarted {
            level: number,
            exit,
            gold,
        });
    }

    fn current_cell(&self) -> CellCoord {
        self.level.current_cell(self.config.collision.cell_size)
    }

    fn step(&mut self, direction: Direction, out_events: &mut Vec<Event>) -> bool {
        let snapshot = &self.level.snapshot;
        let from = self.current_cell();
        let target = from
            .neighbor(direction, snapshot.columns(), snapshot.rows())
            .filter(|target| {
                let leaving = snapshot
                    .cell(from)
                    .is_some_and(|cell| !cell.walls.is_closed(direction));
                let entering = snapshot
                    .cell(*target)
                    .is_some_and(|cell| !cell.walls.is_closed(direction.opposite()));
                leaving && entering
            });

        let Some(target) = target else {
            debug!(?direction, cell = ?from, "move blocked");
            out_events.push(Event::MoveBlocked { direction });
            return false;
        };

        let height = self.level.player.y;
        self.level.player = player_at_cell_center(target, self.config.collision.cell_size);
        self.level.player.y = height;
        self.settle(out_events);
        true
    }

    /// Runs step counting, gold collection and phase transitions for the
    /// player's current position.
    fn settle(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.current_cell();
        let from = self.level.progression.last_cell();
        let outcome = self.level.progression.record_cell(cell);
        if outcome.stepped {
            out_events.push(Event::PlayerStepped {
                from,
                to: cell,
                steps: outcome.steps,
            });
        }

        let collection = collect_at_cell(self.level.snapshot.gold(), cell);
        if collection.collected > 0 {
            let remaining = remaining_gold(&collection.gold);
            self.level.snapshot = self.level.snapshot.with_gold(collection.gold);
            out_events.push(Event::GoldCollected {
                cell,
                collected: collection.collected,
                remaining,
            });
        }

        let exit = self.level.snapshot.exit();
        let changes = self
            .level
            .progression
            .evaluate(self.level.snapshot.gold(), cell, exit);
        if changes.exit_unlocked {
            info!(level = self.level.number, ?exit, "exit unlocked");
            out_events.push(Event::ExitUnlocked { exit });
        }
        if changes.level_completed {
            let steps = self.level.progression.steps();
            info!(level = self.level.number, steps, "level completed");
            out_events.push(Event::LevelCompleted {
                level: self.level.number,
                steps,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel { level } => world.start_level(level.max(1), out_events),
        Command::AdvanceLevel => {
            let current = world.level.number;
            if world.level.progression.phase() == ProgressionPhase::LevelComplete {
                world.start_level(current.saturating_add(1), out_events);
            } else {
                debug!(level = current, "advance rejected before completion");
                out_events.push(Event::LevelAdvanceRejected { level: current });
            }
        }
        Command::MovePlayer { dx, dz } => {
            world.level.player = move_with_grid_collisions(
                &world.level.snapshot,
                &world.config.collision,
                world.level.player,
                dx,
                dz,
            );
            world.settle(out_events);
        }
        Command::StepPlayer { direction } => {
            let _ = world.step(direction, out_events);
        }
    }
}

/// Moves the player one cell north. Returns `false` when a wall or the grid edge blocks it.
pub fn move_north(world: &mut World, out_events: &mut Vec<Event>) -> bool {
    world.step(Direction::North, out_events)
}

/// Moves the player one cell south. Returns `false` when a wall or the grid edge blocks it.
pub fn move_south(world: &mut World, out_events: &mut Vec<Event>) -> bool {
    world.step(Direction::South, out_events)
}

/// Moves the player one cell east. Returns `false` when a wall or the grid edge blocks it.
pub fn move_east(world: &mut World, out_events: &mut Vec<Event>) -> bool {
    world.step(Direction::East, out_events)
}

/// Moves the player one cell west. Returns `false` when a wall or the grid edge blocks it.
pub fn move_west(world: &mut World, out_events: &mut Vec<Event>) -> bool {
    world.step(Direction::West, out_events)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use find_gold_core::{
        CellCoord, MazeSnapshot, PlayerState, ProgressionPhase, SecondaryItem,
    };
    use find_gold_system_camera::{compute_frustum, OrthoFrustum};

    use super::{World, WorldConfig};

    /// Frozen description of the current level.
    #[must_use]
    pub fn maze_snapshot(world: &World) -> &MazeSnapshot {
        &world.level.snapshot
    }

    /// Current level number, starting at 1.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level.number
    }

    /// Continuous player position.
    #[must_use]
    pub fn player(world: &World) -> PlayerState {
        world.level.player
    }

    /// Cell the player currently stands in.
    #[must_use]
    pub fn current_cell(world: &World) -> CellCoord {
        world.current_cell()
    }

    /// Cell changes counted during the current level.
    #[must_use]
    pub fn steps(world: &World) -> u32 {
        world.level.progression.steps()
    }

    /// Progression phase of the current level.
    #[must_use]
    pub fn phase(world: &World) -> ProgressionPhase {
        world.level.progression.phase()
    }

    /// Supplies followed by hazards placed for the current level.
    #[must_use]
    pub fn secondary_items(world: &World) -> &[SecondaryItem] {
        &world.level.secondary
    }

    /// Manhattan distance from the player to the closest uncollected gold.
    #[must_use]
    pub fn nearest_gold_distance(world: &World) -> Option<u32> {
        find_gold_system_progression::nearest_gold_distance(
            world.level.snapshot.gold(),
            world.current_cell(),
        )
    }

    /// Overhead camera frustum framing the current maze.
    #[must_use]
    pub fn frustum(world: &World, aspect: f32, zoom: f32) -> OrthoFrustum {
        let snapshot = &world.level.snapshot;
        compute_frustum(
            snapshot.columns() as f32,
            snapshot.rows() as f32,
            aspect,
            zoom,
        )
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }
}
