//! Point-sprite pipeline: point in, axis-aligned quad out, fixed colour stage.
//!
//! This is the CPU model of what the GPU backends run. The wgpu backend
//! mirrors these constants in WGSL; the software rasterizer calls these
//! functions directly.

use glam::Vec2;
use pixelsand_common::Rgb;

/// Vertex attribute location of the 2D point position.
pub const POSITION_LOCATION: u32 = 0;
/// Vertex attribute location of the RGB point colour.
pub const COLOR_LOCATION: u32 = 3;
/// Vertices emitted per input point.
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// Unit quad corners in triangle-strip order: bottom-left, bottom-right,
/// top-left, top-right.
pub const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

/// Errors from sprite parameter validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("point size must be finite and positive, got {0}")]
    InvalidPointSize(f32),
    #[error("framebuffer dimensions must be non-zero, got {width}x{height}")]
    EmptyFramebuffer { width: u32, height: u32 },
}

/// One input point: clip-space position plus colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSprite {
    pub position: Vec2,
    pub color: Rgb,
}

impl PointSprite {
    pub fn new(position: Vec2, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Draw-call-wide uniform: half-extent of every emitted quad, in clip units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteParams {
    point_size: f32,
}

impl SpriteParams {
    pub fn new(point_size: f32) -> Result<Self, RenderError> {
        if !point_size.is_finite() || point_size <= 0.0 {
            return Err(RenderError::InvalidPointSize(point_size));
        }
        Ok(Self { point_size })
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }
}

/// A vertex produced by point expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVertex {
    pub position: Vec2,
    pub color: Rgb,
}

/// Expand one point into the four vertices of an axis-aligned quad centred
/// on it. The colour is forwarded unchanged to every vertex.
pub fn expand_point(point: &PointSprite, params: &SpriteParams) -> [QuadVertex; 4] {
    QUAD_CORNERS.map(|corner| QuadVertex {
        position: point.position + Vec2::from(corner) * params.point_size,
        color: point.color,
    })
}

/// Decode a 4-vertex strip into its two triangles.
pub fn strip_triangles(strip: &[QuadVertex; 4]) -> [[Vec2; 3]; 2] {
    let p = strip.map(|v| v.position);
    [[p[0], p[1], p[2]], [p[1], p[2], p[3]]]
}

/// Fixed colour transform of the sprite fragment stage.
pub fn tint(color: Rgb) -> [f32; 4] {
    [0.5 * color.r, color.g, color.b, 1.0]
}

/// Which fragment stage a batch is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorStage {
    /// Red halved, alpha forced to 1.
    #[default]
    Tinted,
    /// Colour passed through, alpha forced to 1.
    Plain,
}

impl ColorStage {
    pub fn shade(self, color: Rgb) -> [f32; 4] {
        match self {
            Self::Tinted => tint(color),
            Self::Plain => [color.r, color.g, color.b, 1.0],
        }
    }
}
