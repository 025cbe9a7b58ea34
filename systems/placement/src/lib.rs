#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Item placement for a freshly carved level.
//!
//! Gold goes first, preferring a fixed list of canonical cells and falling back
//! to random free cells. Supplies and hazards follow, one item at a time, under
//! spacing and start-distance constraints that relax rather than fail. Every
//! placement is recorded in one shared [`PositionRegistry`] so nothing overlaps
//! the start, the exit, or any other item.

use find_gold_core::{
    CellCoord, GoldItem, Grid, OccupantKind, SecondaryItem, SecondaryKind, START_CELL,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod registry;

pub use registry::PositionRegistry;

/// Level thresholds at which a category gains its first, second and third item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountThresholds {
    /// Level at which one item appears.
    pub first: u32,
    /// Level at which two items appear.
    pub second: u32,
    /// Level at which three items appear.
    pub third: u32,
}

impl CountThresholds {
    /// Creates a threshold ladder.
    #[must_use]
    pub const fn new(first: u32, second: u32, third: u32) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    /// Number of items requested at the provided level. Never decreases as the level grows.
    #[must_use]
    pub const fn count_for_level(&self, level: u32) -> u32 {
        if level >= self.third {
            3
        } else if level >= self.second {
            2
        } else if level >= self.first {
            1
        } else {
            0
        }
    }
}

/// Tuning knobs for secondary item placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    /// Count ladder for supplies.
    pub supply: CountThresholds,
    /// Count ladder for hazards.
    pub hazard: CountThresholds,
    /// Minimum Manhattan distance between a hazard and the start at level 1.
    pub hazard_base_distance: u32,
    /// Additional hazard start distance demanded per level after the first.
    pub hazard_distance_per_level: u32,
    /// Lower bound on the spacing between items of the same category.
    pub min_spacing: u32,
    /// Rows per unit of same-category spacing on tall grids.
    pub spacing_row_divisor: u32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            supply: CountThresholds::new(3, 6, 10),
            hazard: CountThresholds::new(2, 5, 8),
            hazard_base_distance: 4,
            hazard_distance_per_level: 1,
            min_spacing: 3,
            spacing_row_divisor: 6,
        }
    }
}

impl PlacementTuning {
    /// Minimum Manhattan distance between two items of the same category.
    #[must_use]
    pub fn spacing(&self, rows: u32) -> u32 {
        let scaled = rows.checked_div(self.spacing_row_divisor).unwrap_or(0);
        self.min_spacing.max(scaled)
    }

    /// Minimum Manhattan distance between a hazard and the start cell.
    ///
    /// Capped at the largest distance the grid can offer.
    #[must_use]
    pub fn hazard_start_distance(&self, level: u32, columns: u32, rows: u32) -> u32 {
        let scaled = self.hazard_base_distance.saturating_add(
            self.hazard_distance_per_level
                .saturating_mul(level.saturating_sub(1)),
        );
        let reachable = (columns + rows).saturating_sub(2);
        scaled.min(reachable)
    }

    fn thresholds(&self, kind: SecondaryKind) -> CountThresholds {
        match kind {
            SecondaryKind::Supply => self.supply,
            SecondaryKind::Hazard => self.hazard,
        }
    }
}

/// Items chosen for one level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPlacement {
    /// Gold pieces, canonical positions first.
    pub gold: Vec<GoldItem>,
    /// Supply items.
    pub supplies: Vec<SecondaryItem>,
    /// Hazard items.
    pub hazards: Vec<SecondaryItem>,
}

/// Places gold and secondary items on a finished grid.
#[derive(Debug, Default)]
pub struct ItemPlacer {
    tuning: PlacementTuning,
    scratch: Vec<CellCoord>,
}

impl ItemPlacer {
    /// Creates a placer with the provided tuning surface.
    #[must_use]
    pub fn new(tuning: PlacementTuning) -> Self {
        Self {
            tuning,
            scratch: Vec::new(),
        }
    }

    /// Current tuning surface.
    #[must_use]
    pub fn tuning(&self) -> &PlacementTuning {
        &self.tuning
    }

    /// Places every item for `level` on `grid`, keeping clear of the start and `exit`.
    ///
    /// Requested counts are met whenever enough free cells exist; otherwise
    /// the surplus is skipped.
    pub fn place<R>(
        &mut self,
        grid: &Grid,
        exit: Option<CellCoord>,
        level: u32,
        rng: &mut R,
    ) -> ItemPlacement
    where
        R: Rng + ?Sized,
    {
        let mut registry = PositionRegistry::new();
        if grid.cell(START_CELL).is_some() {
            let _ = registry.claim(START_CELL, OccupantKind::Start);
        }
        if let Some(exit) = exit.filter(|exit| grid.cell(*exit).is_some()) {
            let _ = registry.claim(exit, OccupantKind::Exit);
        }

        let gold = self.place_gold(grid, level, &mut registry, rng);
        let supplies =
            self.place_secondary(SecondaryKind::Supply, grid, level, &mut registry, rng);
        let hazards = self.place_secondary(SecondaryKind::Hazard, grid, level, &mut registry, rng);

        ItemPlacement {
            gold,
            supplies,
            hazards,
        }
    }

    fn place_gold<R>(
        &mut self,
        grid: &Grid,
        level: u32,
        registry: &mut PositionRegistry,
        rng: &mut R,
    ) -> Vec<GoldItem>
    where
        R: Rng + ?Sized,
    {
        let available = grid.cells().len().saturating_sub(registry.len());
        let target = usize::try_from(level).unwrap_or(usize::MAX).min(available);
        let mut gold = Vec::with_capacity(target);

        for candidate in canonical_gold_candidates(grid.columns(), grid.rows()) {
            if gold.len() == target {
                break;
            }
            if grid.cell(candidate).is_none() {
                continue;
            }
            if registry.claim(candidate, OccupantKind::Gold) {
                gold.push(GoldItem::at(candidate));
            } else {
                debug!(?candidate, occupant = ?registry.occupant(candidate), "canonical gold cell taken");
            }
        }

        if gold.len() < target {
            self.scratch.clear();
            self.scratch.extend(
                grid.cells()
                    .iter()
                    .map(|cell| cell.coord())
                    .filter(|cell| registry.is_free(*cell)),
            );

            while gold.len() < target && !self.scratch.is_empty() {
                let cell = self.scratch.swap_remove(rng.gen_range(0..self.scratch.len()));
                if registry.claim(cell, OccupantKind::Gold) {
                    gold.push(GoldItem::at(cell));
                }
            }
        }

        gold
    }

    fn place_secondary<R>(
        &mut self,
        kind: SecondaryKind,
        grid: &Grid,
        level: u32,
        registry: &mut PositionRegistry,
        rng: &mut R,
    ) -> Vec<SecondaryItem>
    where
        R: Rng + ?Sized,
    {
        let count = self.tuning.thresholds(kind).count_for_level(level);
        let spacing = self.tuning.spacing(grid.rows());
        let start_distance = match kind {
            SecondaryKind::Supply => 0,
            SecondaryKind::Hazard => {
                self.tuning
                    .hazard_start_distance(level, grid.columns(), grid.rows())
            }
        };

        let mut placed: Vec<SecondaryItem> = Vec::new();
        for _ in 0..count {
            self.scratch.clear();
            self.scratch.extend(
                grid.cells()
                    .iter()
                    .map(|cell| cell.coord())
                    .filter(|cell| *cell != START_CELL && registry.is_free(*cell))
                    .filter(|cell| {
                        placed
                            .iter()
                            .all(|item| item.cell.manhattan_distance(*cell) >= spacing)
                    })
                    .filter(|cell| cell.manhattan_distance(START_CELL) >= start_distance),
            );

            if self.scratch.is_empty() {
                debug!(?kind, level, spacing, start_distance, "relaxing placement constraints");
                self.scratch.extend(
                    grid.cells()
                        .iter()
                        .map(|cell| cell.coord())
                        .filter(|cell| *cell != START_CELL && registry.is_free(*cell)),
                );
            }

            if self.scratch.is_empty() {
                debug!(?kind, level, "no free cell left; skipping remaining items");
                break;
            }

            let cell = self.scratch[rng.gen_range(0..self.scratch.len())];
            if registry.claim(cell, kind.into()) {
                placed.push(SecondaryItem::new(kind, cell));
            }
        }

        placed
    }
}

/// Canonical gold cells in preference order: center, corners, then third-points.
///
/// Cells may repeat on small grids; the registry rejects duplicates.
#[must_use]
pub fn canonical_gold_candidates(columns: u32, rows: u32) -> Vec<CellCoord> {
    if columns == 0 || rows == 0 {
        return Vec::new();
    }

    let last_column = columns - 1;
    let last_row = rows - 1;
    let (third_column, third_row) = (columns / 3, rows / 3);
    let (two_thirds_column, two_thirds_row) = (columns * 2 / 3, rows * 2 / 3);

    vec![
        CellCoord::new(columns / 2, rows / 2),
        CellCoord::new(0, 0),
        CellCoord::new(last_column, 0),
        CellCoord::new(0, last_row),
        CellCoord::new(last_column, last_row),
        CellCoord::new(third_column, third_row),
        CellCoord::new(two_thirds_column, third_row),
        CellCoord::new(third_column, two_thirds_row),
        CellCoord::new(two_thirds_column, two_thirds_row),
    ]
}
