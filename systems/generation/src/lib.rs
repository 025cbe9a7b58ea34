#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Perfect-maze carving and breadth-first exit selection.
//!
//! [`MazeGenerator`] turns a fully walled [`Grid`] into a spanning tree using a
//! randomized iterative depth-first carve. [`farthest_cell`] then walks the
//! carved passages to pick the exit, and [`is_fully_connected`] re-walks them
//! to confirm every cell is reachable from the start.

use find_gold_core::{CellCoord, Grid, START_CELL};
use rand::Rng;

mod navigation;

pub use navigation::{farthest_cell, is_fully_connected, FarthestCell};

/// Randomized depth-first maze carver.
///
/// The randomness source is supplied per call so callers can inject seeded or
/// mocked generators.
#[derive(Debug, Default)]
pub struct MazeGenerator {
    stack: Vec<CellCoord>,
    candidates: Vec<CellCoord>,
}

impl MazeGenerator {
    /// Creates a generator with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh grid of the requested size and carves a maze into it.
    pub fn generate<R>(&mut self, columns: u32, rows: u32, rng: &mut R) -> Grid
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::new(columns, rows);
        self.carve(&mut grid, rng);
        grid
    }

    /// Carves a spanning tree into `grid`, starting from the top-left cell.
    ///
    /// Every cell ends up visited exactly once and the grid gains exactly
    /// `columns * rows - 1` open edges. Empty grids are left untouched.
    pub fn carve<R>(&mut self, grid: &mut Grid, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        grid.reset_marks();
        self.stack.clear();

        let Some(start) = grid.cell_mut(START_CELL) else {
            return;
        };
        start.mark_visited();
        self.stack.push(START_CELL);

        while let Some(&current) = self.stack.last() {
            self.candidates.clear();
            self.candidates.extend(
                grid.neighbors(current)
                    .filter(|neighbor| grid.cell(*neighbor).is_some_and(|cell| !cell.is_visited())),
            );

            if self.candidates.is_empty() {
                let _ = self.stack.pop();
                continue;
            }

            let chosen = self.candidates[rng.gen_range(0..self.candidates.len())];
            if let Some(cell) = grid.cell_mut(chosen) {
                cell.mark_visited();
            }
            let _ = grid.remove_wall_between(current, chosen);
            self.stack.push(chosen);
        }
    }
}
