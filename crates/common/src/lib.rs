//! Shared value types for the pixelsand workspace.

mod types;

pub use types::{CellCoord, GRID_MULTIPLIER, Rgb};
