use pixelsand_common::CellCoord;
use pixelsand_sim::Simulation;

use crate::frame::FrameBuilder;
use crate::raster::Framebuffer;
use crate::sprite::RenderError;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads simulation state and produces output. It never
/// mutates the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given simulation state.
    fn render(&self, sim: &Simulation) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
///
/// Prints a header line, then the grid with the top row first:
/// `#` for occupied cells, `.` for empty ones.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, sim: &Simulation) -> String {
        let g = sim.gravity();
        let mut out = format!(
            "=== Simulation (tick={}, particles={}) gravity=({:.1}, {:.1}, {:.1}) ===\n",
            sim.tick_count(),
            sim.particles().len(),
            g.x,
            g.y,
            g.z
        );
        for y in (0..sim.height()).rev() {
            out.extend((0..sim.width()).map(|x| {
                if sim.is_occupied(CellCoord::new(x, y)) {
                    '#'
                } else {
                    '.'
                }
            }));
            out.push('\n');
        }
        out
    }
}

/// CPU reference renderer: runs the sprite pipeline into a [`Framebuffer`].
#[derive(Debug, Clone, Copy)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFramebuffer { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Renderer for SoftwareRenderer {
    type Output = Result<Framebuffer, RenderError>;

    fn render(&self, sim: &Simulation) -> Self::Output {
        let frame = FrameBuilder::for_grid(sim.width())?.build(sim);
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.draw_frame(&frame);
        tracing::debug!(
            sprites = frame.sprite_count(),
            width = self.width,
            height = self.height,
            "software frame rendered"
        );
        Ok(fb)
    }
}
