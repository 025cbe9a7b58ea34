//! Per-level state and the pipeline that builds it.

use find_gold_core::{CellCoord, MazeSnapshot, PlayerState, SecondaryItem, START_CELL};
use find_gold_system_collision::player_at_cell_center;
use find_gold_system_generation::{farthest_cell, is_fully_connected, MazeGenerator};
use find_gold_system_placement::ItemPlacer;
use find_gold_system_progression::Progression;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use sha2::{Digest, Sha256};
use tracing::error;

use crate::config::WorldConfig;

/// Everything owned by one level. Replaced wholesale when a level starts.
#[derive(Clone, Debug)]
pub(crate) struct LevelState {
    pub(crate) number: u32,
    pub(crate) snapshot: MazeSnapshot,
    pub(crate) secondary: Vec<SecondaryItem>,
    pub(crate) player: PlayerState,
    pub(crate) progression: Progression,
}

/// Builds a level from scratch: carve, choose the exit, verify, place items, freeze.
pub(crate) fn build_level(
    config: &WorldConfig,
    number: u32,
    generator: &mut MazeGenerator,
    placer: &mut ItemPlacer,
) -> LevelState {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_level_seed(config.seed, number));
    let mut grid = generator.generate(config.columns, config.rows, &mut rng);

    let exit = farthest_cell(&mut grid, START_CELL).map(|farthest| farthest.cell);
    if !is_fully_connected(&mut grid, START_CELL) {
        error!(
            level = number,
            columns = config.columns,
            rows = config.rows,
            "generated maze is not fully connected"
        );
    }

    let placement = placer.place(&grid, exit, number, &mut rng);
    let snapshot = grid.snapshot(config.cell_size_px, exit, placement.gold);

    let mut secondary = placement.supplies;
    secondary.extend(placement.hazards);

    LevelState {
        number,
        snapshot,
        secondary,
        player: player_at_cell_center(START_CELL, config.collision.cell_size),
        progression: Progression::new(START_CELL),
    }
}

/// Seed of the random stream used to build `level`.
#[must_use]
pub fn derive_level_seed(seed: u64, level: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(level.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

impl LevelState {
    pub(crate) fn current_cell(&self, cell_size: f32) -> CellCoord {
        find_gold_system_collision::cell_from_world(
            self.player.x,
            self.player.z,
            cell_size,
            self.snapshot.columns(),
            self.snapshot.rows(),
        )
    }
}
