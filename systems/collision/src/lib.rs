#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Continuous player movement against the discrete wall grid.
//!
//! The player is a vertical cylinder moving over the `x`/`z` plane. Movement is
//! split into substeps no longer than a quarter cell and each substep resolves
//! the column axis before the row axis, so a closed wall is never skipped no
//! matter how large the requested displacement.

use find_gold_core::{CellCoord, CollisionConfig, Direction, MazeSnapshot, PlayerState};

/// Fraction of a cell a single substep may cover.
const SUBSTEP_FRACTION: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Column,
    Row,
}

impl Axis {
    const fn sides(self) -> (Direction, Direction) {
        match self {
            Self::Column => (Direction::West, Direction::East),
            Self::Row => (Direction::North, Direction::South),
        }
    }
}

/// Unclamped cell index containing a world coordinate along one axis.
///
/// Negative and past-the-end indices are returned as is. Non-finite inputs
/// saturate.
#[must_use]
pub fn cell_index_from_world(value: f32, cell_size: f32) -> i64 {
    (value / cell_size).floor() as i64
}

/// World coordinate of the center of the cell at `index` along one axis.
#[must_use]
pub fn world_from_cell_center(index: u32, cell_size: f32) -> f32 {
    index as f32 * cell_size + cell_size / 2.0
}

/// Cell containing the world position, clamped into the grid.
#[must_use]
pub fn cell_from_world(x: f32, z: f32, cell_size: f32, columns: u32, rows: u32) -> CellCoord {
    CellCoord::new(
        clamp_index(cell_index_from_world(x, cell_size), columns),
        clamp_index(cell_index_from_world(z, cell_size), rows),
    )
}

/// Player standing on the floor at the center of `cell`.
#[must_use]
pub fn player_at_cell_center(cell: CellCoord, cell_size: f32) -> PlayerState {
    PlayerState::new(
        world_from_cell_center(cell.column(), cell_size),
        world_from_cell_center(cell.row(), cell_size),
        0.0,
    )
}

/// Number of substeps needed so none covers more than a quarter cell.
#[must_use]
pub fn substep_count(dx: f32, dz: f32, cell_size: f32) -> u32 {
    let largest = dx.abs().max(dz.abs());
    let limit = SUBSTEP_FRACTION * cell_size;
    if !largest.is_finite() || !limit.is_finite() || limit <= 0.0 {
        return 1;
    }
    ((largest / limit).ceil() as u32).max(1)
}

/// Moves the player by `(dx, dz)` without letting it pass through a closed wall.
///
/// `y` is carried through untouched. Displacements are bounded by the world
/// extent and non-finite deltas are treated as zero. A non-positive cell size
/// leaves the player where it is.
#[must_use]
pub fn move_with_grid_collisions(
    snapshot: &MazeSnapshot,
    config: &CollisionConfig,
    player: PlayerState,
    dx: f32,
    dz: f32,
) -> PlayerState {
    let size = config.cell_size;
    if !size.is_finite() || size <= 0.0 {
        return player;
    }

    let dx = bounded_delta(dx, snapshot.columns() as f32 * size);
    let dz = bounded_delta(dz, snapshot.rows() as f32 * size);
    let steps = substep_count(dx, dz, size);
    let (step_x, step_z) = (dx / steps as f32, dz / steps as f32);

    let mut next = player;
    for _ in 0..steps {
        next.x = resolve_axis(snapshot, config, next.x, next.z, step_x, Axis::Column);
        next.z = resolve_axis(snapshot, config, next.x, next.z, step_z, Axis::Row);
    }
    next
}

fn resolve_axis(
    snapshot: &MazeSnapshot,
    config: &CollisionConfig,
    x: f32,
    z: f32,
    delta: f32,
    axis: Axis,
) -> f32 {
    let current = match axis {
        Axis::Column => x,
        Axis::Row => z,
    };
    if delta == 0.0 {
        return current;
    }

    let size = config.cell_size;
    let radius = config.radius;
    let epsilon = config.epsilon;
    let count = match axis {
        Axis::Column => snapshot.columns(),
        Axis::Row => snapshot.rows(),
    };
    let extent = count as f32 * size;

    let mut value = (current + delta)
        .max(radius + epsilon)
        .min(extent - radius - epsilon);

    let cell = cell_from_world(x, z, size, snapshot.columns(), snapshot.rows());
    let Some(walls) = snapshot.cell(cell).map(|cell| cell.walls) else {
        return value;
    };

    let index = match axis {
        Axis::Column => cell.column(),
        Axis::Row => cell.row(),
    };
    let base = index as f32 * size;
    let local = current - base;
    let (near, far) = axis.sides();

    if local + delta < radius && walls.is_closed(near) {
        value = base + radius + epsilon;
    }
    if local + delta > size - radius && walls.is_closed(far) {
        value = base + (size - radius) - epsilon;
    }

    value
}

fn bounded_delta(delta: f32, extent: f32) -> f32 {
    if !delta.is_finite() || !extent.is_finite() {
        return 0.0;
    }
    delta.max(-extent).min(extent)
}

fn clamp_index(index: i64, count: u32) -> u32 {
    let last = i64::from(count.saturating_sub(1));
    u32::try_from(index.clamp(0, last)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_positions_map_to_cells() {
        assert_eq!(cell_from_world(0.01, 0.01, 1.0, 4, 3), CellCoord::new(0, 0));
        assert_eq!(cell_from_world(3.99, 2.99, 1.0, 4, 3), CellCoord::new(3, 2));
        assert_eq!(cell_from_world(-7.0, -0.5, 1.0, 4, 3), CellCoord::new(0, 0));
        assert_eq!(cell_from_world(40.0, 9.0, 1.0, 4, 3), CellCoord::new(3, 2));
        assert_eq!(cell_from_world(f32::NAN, 1.5, 1.0, 4, 3), CellCoord::new(0, 1));
    }

    #[test]
    fn raw_index_is_not_clamped() {
        assert_eq!(cell_index_from_world(-0.5, 1.0), -1);
        assert_eq!(cell_index_from_world(9.5, 2.0), 4);
        assert_eq!(cell_index_from_world(2.0, 1.0), 2);
    }

    #[test]
    fn cell_centers() {
        assert!((world_from_cell_center(0, 1.0) - 0.5).abs() < f32::EPSILON);
        assert!((world_from_cell_center(3, 2.0) - 7.0).abs() < f32::EPSILON);

        let player = player_at_cell_center(CellCoord::new(2, 1), 1.0);
        assert_eq!(player, PlayerState::new(2.5, 1.5, 0.0));
    }

    #[test]
    fn substeps_cover_at_most_a_quarter_cell() {
        assert_eq!(substep_count(0.0, 0.0, 1.0), 1);
        assert_eq!(substep_count(0.1, 0.0, 1.0), 1);
        assert_eq!(substep_count(0.25, 0.0, 1.0), 1);
        assert_eq!(substep_count(0.3, -0.1, 1.0), 2);
        assert_eq!(substep_count(0.0, -2.0, 1.0), 8);
        assert_eq!(substep_count(1.0, 0.0, 2.0), 2);
        assert_eq!(substep_count(f32::INFINITY, 0.0, 1.0), 1);
        assert_eq!(substep_count(1.0, 0.0, 0.0), 1);
    }

    #[test]
    fn deltas_are_bounded_by_extent() {
        assert_eq!(bounded_delta(1.0e9, 4.0), 4.0);
        assert_eq!(bounded_delta(-1.0e9, 4.0), -4.0);
        assert_eq!(bounded_delta(f32::NAN, 4.0), 0.0);
        assert_eq!(bounded_delta(0.5, 4.0), 0.5);
    }
}
