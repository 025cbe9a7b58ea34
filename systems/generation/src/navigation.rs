//! Breadth-first traversal over carved passages.

use std::collections::VecDeque;

use find_gold_core::{CellCoord, CellMark, Grid};

/// The deepest cell found by [`farthest_cell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FarthestCell {
    /// The chosen cell.
    pub cell: CellCoord,
    /// Number of passages between the start and the chosen cell.
    pub depth: u32,
}

/// Finds the cell with the greatest passage distance from `start`.
///
/// Among cells sharing the maximum depth, the one dequeued first wins, so the
/// result is deterministic for a given maze. Returns `None` when `start` lies
/// outside the grid.
pub fn farthest_cell(grid: &mut Grid, start: CellCoord) -> Option<FarthestCell> {
    let mut best: Option<FarthestCell> = None;
    let _ = breadth_first(grid, start, |cell, depth| {
        if best.map_or(true, |current| depth > current.depth) {
            best = Some(FarthestCell { cell, depth });
        }
    })?;
    best
}

/// Reports whether every cell can be reached from `start` through open walls.
pub fn is_fully_connected(grid: &mut Grid, start: CellCoord) -> bool {
    let total = grid.len();
    breadth_first(grid, start, |_, _| {}).is_some_and(|settled| settled == total)
}

/// Walks open passages from `start`, reporting each cell with its depth in
/// dequeue order. Returns the number of settled cells.
fn breadth_first<F>(grid: &mut Grid, start: CellCoord, mut visit: F) -> Option<usize>
where
    F: FnMut(CellCoord, u32),
{
    grid.reset_marks();
    grid.cell_mut(start)?.set_mark(CellMark::Queued);

    let mut queue = VecDeque::new();
    queue.push_back((start, 0_u32));
    let mut settled = 0;
    let mut frontier = Vec::with_capacity(4);

    while let Some((cell, depth)) = queue.pop_front() {
        if let Some(entry) = grid.cell_mut(cell) {
            entry.set_mark(CellMark::Settled);
        }
        settled += 1;
        visit(cell, depth);

        frontier.clear();
        frontier.extend(grid.open_neighbors(cell));
        for &neighbor in &frontier {
            let Some(entry) = grid.cell_mut(neighbor) else {
                continue;
            };
            if entry.mark() != CellMark::Unseen {
                continue;
            }
            entry.set_mark(CellMark::Queued);
            queue.push_back((neighbor, depth + 1));
        }
    }

    Some(settled)
}
