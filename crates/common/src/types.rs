use serde::{Deserialize, Serialize};

/// Sub-cell resolution: particles move in a grid this many times finer than
/// the display grid, which gives smooth acceleration with integer math.
pub const GRID_MULTIPLIER: i32 = 256;

/// Integer coordinate of a display cell. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
}

impl CellCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Cell containing the given particle-space position.
    ///
    /// Negative coordinates saturate to cell 0.
    pub fn from_particle_space(x: i32, y: i32) -> Self {
        Self {
            x: (x.max(0) / GRID_MULTIPLIER) as u32,
            y: (y.max(0) / GRID_MULTIPLIER) as u32,
        }
    }

    /// Row-major linear index for a grid `width` cells wide.
    pub fn linear_index(self, width: u32) -> i64 {
        self.y as i64 * width as i64 + self.x as i64
    }
}

/// Linear RGB colour with components nominally in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0);
    /// Default particle colour.
    pub const SAND: Self = Self::new(1.0, 0.8, 0.3);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}
