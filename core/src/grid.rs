//! Mutable cell/wall grid used while a level is being built.

use crate::{CellCoord, CellSnapshot, Direction, GoldItem, MazeSnapshot, Walls};

/// Transient traversal marker carried by every cell.
///
/// Only meaningful during a single traversal; callers reset marks with
/// [`Grid::reset_marks`] before starting a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellMark {
    /// Not reached by the current traversal.
    #[default]
    Unseen,
    /// Discovered and waiting in the traversal frontier.
    Queued,
    /// Removed from the frontier and fully processed.
    Settled,
}

/// A single cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    walls: Walls,
    visited: bool,
    mark: CellMark,
}

impl Cell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            walls: Walls::CLOSED,
            visited: false,
            mark: CellMark::Unseen,
        }
    }

    /// Location of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Whether the maze carver has already claimed the cell.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Marks the cell as claimed by the maze carver.
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }

    /// Current traversal marker.
    #[must_use]
    pub const fn mark(&self) -> CellMark {
        self.mark
    }

    /// Replaces the traversal marker.
    pub fn set_mark(&mut self, mark: CellMark) {
        self.mark = mark;
    }
}

/// Row-major collection of `columns * rows` cells.
///
/// Neighbors are addressed by coordinate and index, never by reference.
/// Walls are only ever removed in pairs so both sides of an interior edge agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every wall standing.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(Cell::new(CellCoord::new(column, row)));
            }
        }

        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row-major index of `cell`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        row_major_index(self.columns, self.rows, cell)
    }

    /// Looks up a cell, returning `None` for out-of-bounds coordinates.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&Cell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Mutable lookup of a cell.
    pub fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        self.index(cell).and_then(|index| self.cells.get_mut(index))
    }

    /// In-bounds orthogonal neighbors in north, south, west, east order,
    /// regardless of wall state.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let (columns, rows) = (self.columns, self.rows);
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.neighbor(direction, columns, rows))
    }

    /// Neighbors reachable through a removed wall, in north, south, west, east order.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let walls = self.cell(cell).map(Cell::walls);
        Direction::ALL.into_iter().filter_map(move |direction| {
            let walls = walls?;
            if walls.is_closed(direction) {
                return None;
            }
            cell.neighbor(direction, self.columns, self.rows)
        })
    }

    /// Removes the wall shared by two adjacent cells on both sides.
    ///
    /// Returns `false` and leaves the grid untouched when the cells are not
    /// orthogonally adjacent or either lies outside the grid.
    pub fn remove_wall_between(&mut self, a: CellCoord, b: CellCoord) -> bool {
        let Some(direction) = a.direction_to(b) else {
            return false;
        };
        let (Some(first), Some(second)) = (self.index(a), self.index(b)) else {
            return false;
        };

        self.cells[first].walls.open(direction);
        self.cells[second].walls.open(direction.opposite());
        true
    }

    /// Clears the carver flag and traversal marker of every cell.
    pub fn reset_marks(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
            cell.mark = CellMark::Unseen;
        }
    }

    /// Counts interior edges whose wall has been removed.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|direction| {
                        !cell.walls.is_closed(*direction)
                            && cell
                                .coord
                                .neighbor(*direction, self.columns, self.rows)
                                .is_some()
                    })
                    .count()
            })
            .sum()
    }

    /// Reports whether every interior edge agrees on both sides.
    #[must_use]
    pub fn walls_are_symmetric(&self) -> bool {
        self.cells.iter().all(|cell| {
            [Direction::East, Direction::South]
                .into_iter()
                .all(|direction| {
                    match cell
                        .coord
                        .neighbor(direction, self.columns, self.rows)
                        .and_then(|neighbor| self.cell(neighbor))
                    {
                        Some(neighbor) => {
                            cell.walls.is_closed(direction)
                                == neighbor.walls.is_closed(direction.opposite())
                        }
                        None => true,
                    }
                })
        })
    }

    /// Freezes the wall layout together with the level's exit and gold.
    #[must_use]
    pub fn snapshot(
        &self,
        cell_size_px: f32,
        exit: Option<CellCoord>,
        gold: Vec<GoldItem>,
    ) -> MazeSnapshot {
        let cells = self
            .cells
            .iter()
            .map(|cell| CellSnapshot {
                cell: cell.coord,
                walls: cell.walls,
            })
            .collect();

        MazeSnapshot {
            cols: self.columns,
            rows: self.rows,
            cell_size_px,
            exit,
            gold,
            cells,
        }
    }
}

pub(crate) fn row_major_index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major_with_out_of_bounds_sentinel() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.index(CellCoord::new(0, 0)), Some(0));
        assert_eq!(grid.index(CellCoord::new(3, 0)), Some(3));
        assert_eq!(grid.index(CellCoord::new(1, 2)), Some(9));
        assert_eq!(grid.index(CellCoord::new(4, 0)), None);
        assert_eq!(grid.index(CellCoord::new(0, 3)), None);

        for (index, cell) in grid.cells().iter().enumerate() {
            let coord = cell.coord();
            assert_eq!((coord.column() + coord.row() * 4) as usize, index);
        }
    }

    #[test]
    fn neighbors_ignore_walls_but_open_neighbors_do_not() {
        let mut grid = Grid::new(3, 3);
        let center = CellCoord::new(1, 1);

        let all: Vec<_> = grid.neighbors(center).collect();
        assert_eq!(
            all,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(1, 2),
                CellCoord::new(0, 1),
                CellCoord::new(2, 1),
            ]
        );
        assert_eq!(grid.open_neighbors(center).count(), 0);

        assert!(grid.remove_wall_between(center, CellCoord::new(2, 1)));
        let open: Vec<_> = grid.open_neighbors(center).collect();
        assert_eq!(open, vec![CellCoord::new(2, 1)]);
        let back: Vec<_> = grid.open_neighbors(CellCoord::new(2, 1)).collect();
        assert_eq!(back, vec![center]);
    }

    #[test]
    fn corner_neighbors_stay_in_bounds() {
        let grid = Grid::new(2, 2);
        let neighbors: Vec<_> = grid.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(neighbors, vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]);
    }

    #[test]
    fn wall_removal_updates_both_sides() {
        let mut grid = Grid::new(2, 2);
        let a = CellCoord::new(0, 0);
        let east = CellCoord::new(1, 0);
        let south = CellCoord::new(0, 1);

        assert!(grid.remove_wall_between(a, east));
        assert!(!grid.cell(a).expect("cell").walls().is_closed(Direction::East));
        assert!(!grid.cell(east).expect("cell").walls().is_closed(Direction::West));

        assert!(grid.remove_wall_between(south, a));
        assert!(!grid.cell(a).expect("cell").walls().is_closed(Direction::South));
        assert!(!grid.cell(south).expect("cell").walls().is_closed(Direction::North));

        assert!(grid.walls_are_symmetric());
        assert_eq!(grid.open_edge_count(), 2);
    }

    #[test]
    fn wall_removal_rejects_non_adjacent_cells() {
        let mut grid = Grid::new(3, 3);
        let before = grid.clone();
        assert!(!grid.remove_wall_between(CellCoord::new(0, 0), CellCoord::new(1, 1)));
        assert!(!grid.remove_wall_between(CellCoord::new(2, 0), CellCoord::new(3, 0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn reset_marks_clears_traversal_state() {
        let mut grid = Grid::new(2, 1);
        if let Some(cell) = grid.cell_mut(CellCoord::new(1, 0)) {
            cell.mark_visited();
            cell.set_mark(CellMark::Settled);
        }

        grid.reset_marks();

        assert!(grid
            .cells()
            .iter()
            .all(|cell| !cell.is_visited() && cell.mark() == CellMark::Unseen));
    }

    #[test]
    fn outer_border_is_never_counted_as_an_edge() {
        let mut grid = Grid::new(1, 1);
        if let Some(cell) = grid.cell_mut(CellCoord::new(0, 0)) {
            cell.walls.open(Direction::East);
        }
        assert_eq!(grid.open_edge_count(), 0);
    }
}
