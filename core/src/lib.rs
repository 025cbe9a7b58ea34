#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Find Gold engine.
//!
//! This crate defines the data model that connects the level pipeline, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! happened. Systems read the [`Grid`] while a level is being built and the
//! immutable [`MazeSnapshot`] once it has been frozen.

use serde::{Deserialize, Serialize};

mod grid;

pub use grid::{Cell, CellMark, Grid};

/// Cell every level starts in and that item placement never uses.
pub const START_CELL: CellCoord = CellCoord::new(0, 0);

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Serialized as `{ "i": column, "j": row }` to match the exported snapshot shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    #[serde(rename = "i")]
    column: u32,
    #[serde(rename = "j")]
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the adjacent coordinate in the provided direction, if it lies
    /// within a grid of the given dimensions.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
        };

        let (column, row) = (column?, row?);
        if column < columns && row < rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }

    /// Direction that leads from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.column > self.column {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if other.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Cardinal directions, ordered to match the wall array layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
    /// Toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in wall-array order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    const fn wall_slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::West => 2,
            Self::East => 3,
        }
    }
}

/// Wall flags of a single cell in `[north, south, west, east]` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Walls([bool; 4]);

impl Walls {
    /// All four walls standing.
    pub const CLOSED: Walls = Walls([true; 4]);

    /// Builds wall flags from a raw `[north, south, west, east]` array.
    #[must_use]
    pub const fn from_array(walls: [bool; 4]) -> Self {
        Self(walls)
    }

    /// Raw `[north, south, west, east]` flags.
    #[must_use]
    pub const fn as_array(&self) -> [bool; 4] {
        self.0
    }

    /// Reports whether the wall on the given side is standing.
    #[must_use]
    pub const fn is_closed(&self, side: Direction) -> bool {
        self.0[side.wall_slot()]
    }

    /// Knocks down the wall on the given side.
    pub fn open(&mut self, side: Direction) {
        self.0[side.wall_slot()] = false;
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Wall layout of one cell as exported in a [`MazeSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Location of the cell.
    #[serde(flatten)]
    pub cell: CellCoord,
    /// Wall flags of the cell.
    pub walls: Walls,
}

/// A collectible gold piece. `show == false` means it has been collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldItem {
    /// Cell holding the gold. Never changes after placement.
    #[serde(flatten)]
    pub cell: CellCoord,
    /// Whether the gold is still waiting to be collected.
    pub show: bool,
}

impl GoldItem {
    /// Creates a visible gold piece at the provided cell.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self { cell, show: true }
    }
}

/// Categories of non-gold items scattered through a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryKind {
    /// Helpful pickup; spaced apart from other supplies.
    Supply,
    /// Threat that must spawn away from the start cell.
    Hazard,
}

/// A supply or hazard item placed for the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryItem {
    /// Cell holding the item. Never changes after placement.
    #[serde(flatten)]
    pub cell: CellCoord,
    /// Whether the item is still active.
    pub show: bool,
    /// Category of the item.
    pub kind: SecondaryKind,
}

impl SecondaryItem {
    /// Creates an active item of the given kind at the provided cell.
    #[must_use]
    pub const fn new(kind: SecondaryKind, cell: CellCoord) -> Self {
        Self {
            cell,
            show: true,
            kind,
        }
    }
}

/// What occupies a cell during item placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupantKind {
    /// The player's start cell.
    Start,
    /// The level exit.
    Exit,
    /// A gold piece.
    Gold,
    /// A supply item.
    Supply,
    /// A hazard item.
    Hazard,
}

impl From<SecondaryKind> for OccupantKind {
    fn from(kind: SecondaryKind) -> Self {
        match kind {
            SecondaryKind::Supply => Self::Supply,
            SecondaryKind::Hazard => Self::Hazard,
        }
    }
}

/// Immutable, exported description of a finished level.
///
/// Produced once per level and replaced wholesale rather than edited in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeSnapshot {
    cols: u32,
    rows: u32,
    cell_size_px: f32,
    exit: Option<CellCoord>,
    gold: Vec<GoldItem>,
    cells: Vec<CellSnapshot>,
}

impl MazeSnapshot {
    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.cols
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Rendering scale of a single cell in pixels.
    #[must_use]
    pub const fn cell_size_px(&self) -> f32 {
        self.cell_size_px
    }

    /// Exit cell of the level, if one was chosen.
    #[must_use]
    pub const fn exit(&self) -> Option<CellCoord> {
        self.exit
    }

    /// Gold pieces of the level in placement order.
    #[must_use]
    pub fn gold(&self) -> &[GoldItem] {
        &self.gold
    }

    /// Cell wall layouts in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellSnapshot] {
        &self.cells
    }

    /// Row-major index of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        grid::row_major_index(self.cols, self.rows, cell)
    }

    /// Looks up a cell, returning `None` for out-of-bounds coordinates.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&CellSnapshot> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Produces a new snapshot that differs only in its gold collection.
    #[must_use]
    pub fn with_gold(&self, gold: Vec<GoldItem>) -> Self {
        Self {
            gold,
            ..self.clone()
        }
    }

    /// Reports whether the cell list covers the grid exactly once in row-major order.
    ///
    /// Snapshots built from a [`Grid`] always satisfy this; decoded snapshots may not.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let expected = u64::from(self.cols) * u64::from(self.rows);
        if self.cells.len() as u64 != expected {
            return false;
        }

        let ordered = self
            .cells
            .iter()
            .enumerate()
            .all(|(index, cell)| self.index(cell.cell) == Some(index));
        let exit_in_bounds = self.exit.map_or(true, |exit| self.index(exit).is_some());
        ordered && exit_in_bounds
    }
}

/// Continuous world position of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Horizontal position along the column axis.
    pub x: f32,
    /// Horizontal position along the row axis.
    pub z: f32,
    /// Vertical position; not constrained by collision.
    pub y: f32,
}

impl PlayerState {
    /// Creates a player state from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, z: f32, y: f32) -> Self {
        Self { x, z, y }
    }
}

/// Dimensions of the player's collision cylinder and the grid it moves in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Side length of a cell in world units.
    pub cell_size: f32,
    /// Radius of the player's cylinder.
    pub radius: f32,
    /// Height of the player's cylinder.
    pub height: f32,
    /// Gap kept between the cylinder and a wall it rests against.
    pub epsilon: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            radius: 0.2,
            height: 1.6,
            epsilon: 0.001,
        }
    }
}

/// Progression phases of a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressionPhase {
    /// Gold remains to be collected.
    Exploring,
    /// All gold is collected and the exit accepts the player.
    ExitUnlocked,
    /// The player reached the unlocked exit. Terminal until the next level starts.
    LevelComplete,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current level and builds the requested one from scratch.
    StartLevel {
        /// One-based level number; doubles as the difficulty knob.
        level: u32,
    },
    /// Starts the next level if the current one is complete.
    AdvanceLevel,
    /// Moves the player continuously, resolving collisions against the walls.
    MovePlayer {
        /// Requested displacement along the column axis.
        dx: f32,
        /// Requested displacement along the row axis.
        dz: f32,
    },
    /// Nudges the player exactly one cell in the provided direction.
    StepPlayer {
        /// Direction of the nudge.
        direction: Direction,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A fresh level replaced the previous one.
    LevelStarted {
        /// Number of the level that started.
        level: u32,
        /// Exit chosen for the level.
        exit: Option<CellCoord>,
        /// Number of gold pieces placed.
        gold: u32,
    },
    /// The player's discretized cell changed.
    PlayerStepped {
        /// Cell recorded before the move.
        from: CellCoord,
        /// Cell the player occupies now.
        to: CellCoord,
        /// Step count after this step.
        steps: u32,
    },
    /// A discrete nudge was refused by a wall or the grid edge.
    MoveBlocked {
        /// Direction that was blocked.
        direction: Direction,
    },
    /// Gold was picked up in the player's cell.
    GoldCollected {
        /// Cell where the gold was collected.
        cell: CellCoord,
        /// Pieces collected by this move.
        collected: u32,
        /// Pieces still waiting to be collected.
        remaining: u32,
    },
    /// Every gold piece is collected; the exit now accepts the player.
    ExitUnlocked {
        /// Exit that was unlocked.
        exit: Option<CellCoord>,
    },
    /// The player stood on the unlocked exit with all gold collected.
    LevelCompleted {
        /// Number of the completed level.
        level: u32,
        /// Steps taken during the level.
        steps: u32,
    },
    /// An advance was requested before the current level was complete.
    LevelAdvanceRejected {
        /// Number of the level that is still in progress.
        level: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_respects_grid_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North, 3, 3), None);
        assert_eq!(corner.neighbor(Direction::West, 3, 3), None);
        assert_eq!(
            corner.neighbor(Direction::East, 3, 3),
            Some(CellCoord::new(1, 0))
        );

        let far = CellCoord::new(2, 2);
        assert_eq!(far.neighbor(Direction::South, 3, 3), None);
        assert_eq!(far.neighbor(Direction::East, 3, 3), None);
        assert_eq!(
            far.neighbor(Direction::North, 3, 3),
            Some(CellCoord::new(2, 1))
        );
    }

    #[test]
    fn direction_to_rejects_non_adjacent_cells() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(
            origin.direction_to(CellCoord::new(3, 2)),
            Some(Direction::East)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(2, 1)),
            Some(Direction::North)
        );
        assert_eq!(origin.direction_to(CellCoord::new(3, 3)), None);
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn walls_follow_north_south_west_east_order() {
        let mut walls = Walls::CLOSED;
        walls.open(Direction::West);
        assert_eq!(walls.as_array(), [true, true, false, true]);
        assert!(!walls.is_closed(Direction::West));
        assert!(walls.is_closed(Direction::East));
    }

    #[test]
    fn snapshot_serializes_to_exported_shape() {
        let mut grid = Grid::new(2, 1);
        assert!(grid.remove_wall_between(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        let snapshot = grid.snapshot(
            32.0,
            Some(CellCoord::new(1, 0)),
            vec![GoldItem::at(CellCoord::new(1, 0))],
        );

        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "cols": 2,
                "rows": 1,
                "cellSizePx": 32.0,
                "exit": { "i": 1, "j": 0 },
                "gold": [{ "i": 1, "j": 0, "show": true }],
                "cells": [
                    { "i": 0, "j": 0, "walls": [true, true, true, false] },
                    { "i": 1, "j": 0, "walls": [true, true, false, true] }
                ]
            })
        );

        let restored: MazeSnapshot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, snapshot);
        assert!(restored.is_well_formed());
    }

    #[test]
    fn with_gold_leaves_original_snapshot_untouched() {
        let grid = Grid::new(3, 1);
        let original = grid.snapshot(16.0, None, vec![GoldItem::at(CellCoord::new(2, 0))]);
        let collected = GoldItem {
            show: false,
            ..original.gold()[0]
        };

        let updated = original.with_gold(vec![collected]);

        assert!(original.gold()[0].show);
        assert!(!updated.gold()[0].show);
        assert_eq!(updated.cells(), original.cells());
    }

    #[test]
    fn malformed_snapshot_is_detected() {
        let json = serde_json::json!({
            "cols": 2,
            "rows": 2,
            "cellSizePx": 8.0,
            "exit": null,
            "gold": [],
            "cells": [{ "i": 0, "j": 0, "walls": [true, true, true, true] }]
        });
        let snapshot: MazeSnapshot = serde_json::from_value(json).expect("deserialize");
        assert!(!snapshot.is_well_formed());
    }
}
