//! Plain-text rendering of a maze snapshot.

use std::fmt::Write as _;

use find_gold_core::{
    CellCoord, Direction, MazeSnapshot, SecondaryItem, SecondaryKind, START_CELL,
};

const PLAYER: char = '@';
const START: char = 'S';
const EXIT: char = 'E';
const GOLD: char = 'G';
const SUPPLY: char = 'o';
const HAZARD: char = 'x';

/// Draws the maze as box-drawing ASCII, one text row per wall line and cell line.
///
/// Markers, highest priority first: player `@`, gold `G`, supply `o`,
/// hazard `x`, exit `E`, start `S`.
pub(crate) fn render_ascii(
    snapshot: &MazeSnapshot,
    secondary: &[SecondaryItem],
    player: Option<CellCoord>,
) -> String {
    let mut out = String::new();
    let (columns, rows) = (snapshot.columns(), snapshot.rows());

    for row in 0..rows {
        for column in 0..columns {
            let closed = is_closed(snapshot, CellCoord::new(column, row), Direction::North);
            out.push('+');
            out.push_str(if closed { "---" } else { "   " });
        }
        out.push_str("+\n");

        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            out.push(if is_closed(snapshot, cell, Direction::West) {
                '|'
            } else {
                ' '
            });
            let _ = write!(out, " {} ", marker(snapshot, secondary, player, cell));
        }
        let last = CellCoord::new(columns.saturating_sub(1), row);
        out.push(if is_closed(snapshot, last, Direction::East) {
            '|'
        } else {
            ' '
        });
        out.push('\n');
    }

    for column in 0..columns {
        let cell = CellCoord::new(column, rows.saturating_sub(1));
        out.push('+');
        out.push_str(if is_closed(snapshot, cell, Direction::South) {
            "---"
        } else {
            "   "
        });
    }
    out.push_str("+\n");
    out
}

fn is_closed(snapshot: &MazeSnapshot, cell: CellCoord, side: Direction) -> bool {
    snapshot
        .cell(cell)
        .map_or(true, |cell| cell.walls.is_closed(side))
}

fn marker(
    snapshot: &MazeSnapshot,
    secondary: &[SecondaryItem],
    player: Option<CellCoord>,
    cell: CellCoord,
) -> char {
    if player == Some(cell) {
        return PLAYER;
    }
    if snapshot
        .gold()
        .iter()
        .any(|gold| gold.show && gold.cell == cell)
    {
        return GOLD;
    }
    if let Some(item) = secondary.iter().find(|item| item.show && item.cell == cell) {
        return match item.kind {
            SecondaryKind::Supply => SUPPLY,
            SecondaryKind::Hazard => HAZARD,
        };
    }
    if snapshot.exit() == Some(cell) {
        return EXIT;
    }
    if cell == START_CELL {
        return START;
    }
    ' '
}
