use bevy::prelude::*;
use thiserror::Error;

/// Smallest grid dimension the core accepts, in cells.
pub const MIN_GRID_DIM: usize = 10;
/// Largest grid dimension the core accepts, in cells.
pub const MAX_GRID_DIM: usize = 200;

/// Default edge length of one cell in world units.
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Construction-time grid configuration, supplied once by the host and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Grid width in cells (columns).
    pub width: usize,
    /// Grid height in cells (rows).
    pub height: usize,
    /// Edge length of one cell in world units.
    pub cell_size: f32,
    /// World-space position of the (0, 0) cell's minimum corner.
    pub origin: Vec2,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            cell_size: DEFAULT_CELL_SIZE,
            origin: Vec2::ZERO,
        }
    }
}

impl GridConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Reject dimensions outside [MIN_GRID_DIM, MAX_GRID_DIM].
    ///
    /// This is the only fatal-error path in the crate: everything after
    /// construction degrades to no-ops or `None` instead of failing.
    pub fn validate(&self) -> Result<(), GridError> {
        let dim_ok = |d: usize| (MIN_GRID_DIM..=MAX_GRID_DIM).contains(&d);
        if !dim_ok(self.width) || !dim_ok(self.height) {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error(
        "grid dimensions {width}x{height} outside supported range \
         {MIN_GRID_DIM}..={MAX_GRID_DIM}"
    )]
    InvalidDimensions { width: usize, height: usize },
}
