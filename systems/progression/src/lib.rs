#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gold bookkeeping, exit gating and step counting for a single level.
//!
//! The free functions are pure and never mutate their inputs. [`Progression`]
//! strings them together into the `Exploring -> ExitUnlocked -> LevelComplete`
//! state machine, firing each transition at most once per level.

use find_gold_core::{CellCoord, GoldItem, ProgressionPhase};

/// Result of feeding a cell into [`step_counter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step total after the observation.
    pub steps: u32,
    /// Cell to compare the next observation against.
    pub last_cell: CellCoord,
    /// Whether the observation counted as a step.
    pub stepped: bool,
}

/// Counts a step only when the discretized cell changes.
///
/// Distance travelled is irrelevant: any change of cell adds exactly one.
#[must_use]
pub fn step_counter(steps: u32, last_cell: CellCoord, cell: CellCoord) -> StepOutcome {
    if cell == last_cell {
        StepOutcome {
            steps,
            last_cell,
            stepped: false,
        }
    } else {
        StepOutcome {
            steps: steps.saturating_add(1),
            last_cell: cell,
            stepped: true,
        }
    }
}

/// Gold after a collection attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    /// Updated gold; collected pieces have `show == false`.
    pub gold: Vec<GoldItem>,
    /// Pieces collected by this call.
    pub collected: u32,
}

/// Collects every visible gold piece lying on `cell`.
#[must_use]
pub fn collect_at_cell(gold: &[GoldItem], cell: CellCoord) -> Collection {
    let mut collected = 0;
    let gold = gold
        .iter()
        .map(|item| {
            if item.show && item.cell == cell {
                collected += 1;
                GoldItem {
                    show: false,
                    ..*item
                }
            } else {
                *item
            }
        })
        .collect();

    Collection { gold, collected }
}

/// Gold pieces still waiting to be collected.
#[must_use]
pub fn remaining_gold(gold: &[GoldItem]) -> u32 {
    count(gold, true)
}

/// Gold pieces already collected.
#[must_use]
pub fn collected_gold(gold: &[GoldItem]) -> u32 {
    count(gold, false)
}

/// Whether the exit should open: there was gold to find and all of it is gone.
#[must_use]
pub fn should_unlock_exit(gold: &[GoldItem]) -> bool {
    !gold.is_empty() && remaining_gold(gold) == 0
}

/// Whether `cell` is the exit. A level without an exit has no exit cell.
#[must_use]
pub fn is_on_exit(cell: CellCoord, exit: Option<CellCoord>) -> bool {
    exit == Some(cell)
}

/// Whether the level is finished.
///
/// The gold condition is evaluated again rather than trusted from `exit_unlocked`.
#[must_use]
pub fn should_advance_level(
    gold: &[GoldItem],
    exit_unlocked: bool,
    cell: CellCoord,
    exit: Option<CellCoord>,
) -> bool {
    exit_unlocked && is_on_exit(cell, exit) && should_unlock_exit(gold)
}

/// Manhattan distance from `cell` to the closest uncollected gold.
#[must_use]
pub fn nearest_gold_distance(gold: &[GoldItem], cell: CellCoord) -> Option<u32> {
    gold.iter()
        .filter(|item| item.show)
        .map(|item| item.cell.manhattan_distance(cell))
        .min()
}

fn count(gold: &[GoldItem], show: bool) -> u32 {
    let total = gold.iter().filter(|item| item.show == show).count();
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Phase changes produced by one [`Progression::evaluate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseChanges {
    /// The exit opened during this call.
    pub exit_unlocked: bool,
    /// The level finished during this call.
    pub level_completed: bool,
}

/// Per-level progression state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    phase: ProgressionPhase,
    steps: u32,
    last_cell: CellCoord,
}

impl Progression {
    /// Starts a level with the player standing on `start`.
    #[must_use]
    pub const fn new(start: CellCoord) -> Self {
        Self {
            phase: ProgressionPhase::Exploring,
            steps: 0,
            last_cell: start,
        }
    }

    /// Returns to `Exploring` with no steps taken.
    pub fn reset(&mut self, start: CellCoord) {
        *self = Self::new(start);
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ProgressionPhase {
        self.phase
    }

    /// Cell changes counted so far this level.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Last cell the player was observed in.
    #[must_use]
    pub const fn last_cell(&self) -> CellCoord {
        self.last_cell
    }

    /// Records the player's current cell and reports whether it counted as a step.
    pub fn record_cell(&mut self, cell: CellCoord) -> StepOutcome {
        let outcome = step_counter(self.steps, self.last_cell, cell);
        self.steps = outcome.steps;
        self.last_cell = outcome.last_cell;
        outcome
    }

    /// Advances the phase machine for the player standing on `cell`.
    ///
    /// Both transitions may fire in one call when the last gold piece lies on
    /// the exit. A completed level ignores further input.
    pub fn evaluate(
        &mut self,
        gold: &[GoldItem],
        cell: CellCoord,
        exit: Option<CellCoord>,
    ) -> PhaseChanges {
        let mut changes = PhaseChanges::default();

        if self.phase == ProgressionPhase::Exploring && should_unlock_exit(gold) {
            self.phase = ProgressionPhase::ExitUnlocked;
            changes.exit_unlocked = true;
        }

        if self.phase == ProgressionPhase::ExitUnlocked
            && should_advance_level(gold, true, cell, exit)
        {
            self.phase = ProgressionPhase::LevelComplete;
            changes.level_completed = true;
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold(cells: &[(u32, u32, bool)]) -> Vec<GoldItem> {
        cells
            .iter()
            .map(|&(column, row, show)| GoldItem {
                cell: CellCoord::new(column, row),
                show,
            })
            .collect()
    }

    #[test]
    fn steps_only_count_cell_changes() {
        let last = CellCoord::new(0, 0);
        assert_eq!(
            step_counter(0, last, last),
            StepOutcome {
                steps: 0,
                last_cell: last,
                stepped: false
            }
        );
        assert_eq!(
            step_counter(0, last, CellCoord::new(1, 0)),
            StepOutcome {
                steps: 1,
                last_cell: CellCoord::new(1, 0),
                stepped: true
            }
        );
        assert_eq!(
            step_counter(10, CellCoord::new(2, 2), CellCoord::new(2, 3)).steps,
            11
        );
        // Jumping several cells at once is still a single step.
        assert_eq!(step_counter(3, last, CellCoord::new(4, 4)).steps, 4);
    }

    #[test]
    fn collection_touches_only_the_current_cell() {
        let before = gold(&[(0, 0, true), (1, 0, true), (2, 2, false)]);
        let after = collect_at_cell(&before, CellCoord::new(1, 0));

        assert_eq!(after.collected, 1);
        assert!(after.gold[0].show);
        assert!(!after.gold[1].show);
        assert!(!after.gold[2].show);
        assert!(before[1].show);
        assert_eq!(after.gold[1].cell, CellCoord::new(1, 0));
    }

    #[test]
    fn collected_gold_is_not_collected_twice() {
        let before = gold(&[(2, 2, false)]);
        assert_eq!(collect_at_cell(&before, CellCoord::new(2, 2)).collected, 0);
    }

    #[test]
    fn exit_unlocks_only_when_every_piece_is_gone() {
        assert!(!should_unlock_exit(&[]));

        let partial = gold(&[(0, 1, false), (1, 1, true)]);
        assert_eq!(remaining_gold(&partial), 1);
        assert_eq!(collected_gold(&partial), 1);
        assert!(!should_unlock_exit(&partial));

        let done = collect_at_cell(&partial, CellCoord::new(1, 1)).gold;
        assert_eq!(remaining_gold(&done), 0);
        assert_eq!(collected_gold(&done), 2);
        assert!(should_unlock_exit(&done));
    }

    #[test]
    fn advancing_needs_unlock_exit_cell_and_all_gold() {
        let exit = Some(CellCoord::new(2, 2));
        let on_exit = CellCoord::new(2, 2);
        let elsewhere = CellCoord::new(1, 2);
        let remaining = gold(&[(0, 1, true)]);
        let done = gold(&[(0, 1, false)]);

        assert!(is_on_exit(on_exit, exit));
        assert!(!is_on_exit(elsewhere, exit));
        assert!(!is_on_exit(on_exit, None));

        assert!(!should_advance_level(&remaining, true, on_exit, exit));
        assert!(!should_advance_level(&done, false, on_exit, exit));
        assert!(!should_advance_level(&done, true, elsewhere, exit));
        assert!(!should_advance_level(&done, true, on_exit, None));
        assert!(should_advance_level(&done, true, on_exit, exit));
    }

    #[test]
    fn nearest_gold_ignores_collected_pieces() {
        assert_eq!(nearest_gold_distance(&[], CellCoord::new(0, 0)), None);

        let pieces = gold(&[(2, 2, false), (5, 5, true), (1, 7, true)]);
        assert_eq!(nearest_gold_distance(&pieces, CellCoord::new(0, 0)), Some(8));
        assert_eq!(nearest_gold_distance(&pieces, CellCoord::new(5, 4)), Some(1));
        assert_eq!(
            nearest_gold_distance(&gold(&[(3, 3, false)]), CellCoord::new(0, 0)),
            None
        );
    }
}
