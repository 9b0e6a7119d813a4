use glam::Vec3;

/// Maps a cursor position inside the window to a gravity vector.
///
/// The window centre is zero gravity; the edges reach `±range / 2`, so
/// `range` is the peak-to-peak span on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityMapper {
    pub range: f32,
}

impl Default for GravityMapper {
    fn default() -> Self {
        Self { range: 64.0 }
    }
}

impl GravityMapper {
    pub fn new(range: f32) -> Self {
        Self { range }
    }

    /// `x`, `y` are window coordinates with `y` growing downward (winit's
    /// convention); the result has `y` pointing up. `z` is carried over from
    /// the current gravity.
    pub fn from_cursor(&self, x: f64, y: f64, width: u32, height: u32, current: Vec3) -> Vec3 {
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        let gx = (x / w - 0.5) * self.range as f64;
        let gy = ((h - y) / h - 0.5) * self.range as f64;
        let gravity = Vec3::new(gx as f32, gy as f32, current.z);
        tracing::trace!(?gravity, "cursor gravity");
        gravity
    }
}
