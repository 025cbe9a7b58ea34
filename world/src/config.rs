//! Tunable world configuration.

use find_gold_core::CollisionConfig;
use find_gold_system_placement::PlacementTuning;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported number of columns or rows.
pub const MAX_DIMENSION: u32 = 5000;

/// Smallest number of cells that still leaves room for gold beside the start and exit.
pub const MIN_CELLS: u64 = 3;

/// Everything needed to build and run levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of maze columns.
    pub columns: u32,
    /// Number of maze rows.
    pub rows: u32,
    /// Cell edge length reported to renderers, in pixels.
    pub cell_size_px: f32,
    /// Root seed; every level derives its own generator from it.
    pub seed: u64,
    /// Player cylinder and cell dimensions in world units.
    pub collision: CollisionConfig,
    /// Secondary item tuning.
    pub placement: PlacementTuning,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            cell_size_px: 48.0,
            seed: 0x5eed_9017_c0ff_ee00,
            collision: CollisionConfig::default(),
            placement: PlacementTuning::default(),
        }
    }
}

impl WorldConfig {
    /// Checks that the configuration describes a playable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("columns", self.columns), ("rows", self.rows)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(ConfigError::Dimension { axis, value });
            }
        }

        let cells = u64::from(self.columns) * u64::from(self.rows);
        if cells < MIN_CELLS {
            return Err(ConfigError::TooFewCells { cells });
        }

        if !self.cell_size_px.is_finite() || self.cell_size_px <= 0.0 {
            return Err(ConfigError::CellSizePx(self.cell_size_px));
        }

        let collision = &self.collision;
        if !collision.cell_size.is_finite() || collision.cell_size <= 0.0 {
            return Err(ConfigError::CellSize(collision.cell_size));
        }
        if !collision.radius.is_finite()
            || collision.radius <= 0.0
            || collision.radius >= collision.cell_size / 2.0
        {
            return Err(ConfigError::Radius {
                radius: collision.radius,
                cell_size: collision.cell_size,
            });
        }
        if !collision.epsilon.is_finite() || collision.epsilon <= 0.0 {
            return Err(ConfigError::Epsilon(collision.epsilon));
        }

        Ok(())
    }
}

/// Reasons a [`WorldConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A grid dimension is zero or above [`MAX_DIMENSION`].
    #[error("{axis} must be between 1 and {}, got {value}", MAX_DIMENSION)]
    Dimension {
        /// Name of the offending dimension.
        axis: &'static str,
        /// Rejected value.
        value: u32,
    },
    /// The grid is too small to hold a start, an exit and gold.
    #[error("maze needs at least {} cells, got {cells}", MIN_CELLS)]
    TooFewCells {
        /// Cells the grid would have.
        cells: u64,
    },
    /// The renderer cell size is not a positive finite number.
    #[error("cell_size_px must be positive and finite, got {0}")]
    CellSizePx(f32),
    /// The world cell size is not a positive finite number.
    #[error("collision.cell_size must be positive and finite, got {0}")]
    CellSize(f32),
    /// The player radius does not fit inside a cell.
    #[error("collision.radius must lie in (0, {}), got {radius}", .cell_size / 2.0)]
    Radius {
        /// Rejected radius.
        radius: f32,
        /// Cell size the radius was checked against.
        cell_size: f32,
    },
    /// The wall gap is not a positive finite number.
    #[error("collision.epsilon must be positive and finite, got {0}")]
    Epsilon(f32),
}
