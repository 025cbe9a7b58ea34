use std::collections::BTreeMap;

use find_gold_core::{CellCoord, OccupantKind};

/// Cells already claimed during placement, keyed by coordinate.
///
/// Lives for the duration of one level's placement pass.
#[derive(Clone, Debug, Default)]
pub struct PositionRegistry {
    occupants: BTreeMap<CellCoord, OccupantKind>,
}

impl PositionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `cell` for `kind`. Returns `false` if the cell was already taken.
    pub fn claim(&mut self, cell: CellCoord, kind: OccupantKind) -> bool {
        if self.occupants.contains_key(&cell) {
            return false;
        }
        let _ = self.occupants.insert(cell, kind);
        true
    }

    /// Occupant recorded at `cell`, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<OccupantKind> {
        self.occupants.get(&cell).copied()
    }

    /// Whether `cell` has not been claimed.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        !self.occupants.contains_key(&cell)
    }

    /// Number of claimed cells. Only in-grid cells are ever claimed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupants.len()
    }
}
