use glam::Vec2;
use pixelsand_common::{CellCoord, GRID_MULTIPLIER, Rgb};
use pixelsand_sim::Simulation;

use crate::sprite::{ColorStage, PointSprite, RenderError, SpriteParams};

/// Colour of an occupied cell.
pub const OCCUPIED_COLOR: Rgb = Rgb::new(1.0, 1.0, 0.5);
/// Colour of the particle overlay points.
pub const PARTICLE_COLOR: Rgb = Rgb::MAGENTA;
/// Background clear colour (RGBA).
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Colour of an empty cell: a faint gradient across the grid.
pub fn empty_cell_color(cell: CellCoord) -> Rgb {
    Rgb::new(0.5, cell.x as f32 / 128.0, cell.y as f32 / 128.0)
}

/// Clip-space centre of a cell, `y = 0` at the bottom.
pub fn cell_center_ndc(cell: CellCoord, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (cell.x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
        (cell.y as f32 + 0.5) / height as f32 * 2.0 - 1.0,
    )
}

/// Clip-space position of a particle-space point.
pub fn particle_to_ndc(x: i32, y: i32, width: u32, height: u32) -> Vec2 {
    let g = GRID_MULTIPLIER as f32;
    Vec2::new(
        (x as f32 / g + 0.5) / width as f32 * 2.0 - 1.0,
        (y as f32 / g + 0.5) / height as f32 * 2.0 - 1.0,
    )
}

/// Points drawn with one set of sprite parameters and one colour stage.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteBatch {
    pub label: &'static str,
    pub params: SpriteParams,
    pub stage: ColorStage,
    pub sprites: Vec<PointSprite>,
}

/// Everything a backend needs to draw one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub layers: Vec<SpriteBatch>,
}

impl Frame {
    /// Total points across all layers.
    pub fn sprite_count(&self) -> usize {
        self.layers.iter().map(|l| l.sprites.len()).sum()
    }
}

/// Builds [`Frame`]s from simulation state: a cell layer showing the whole
/// grid, then a particle overlay.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuilder {
    cell_params: SpriteParams,
    particle_params: SpriteParams,
}

impl FrameBuilder {
    /// Sprite sizes for a `width x height` grid: cells get a half-extent of
    /// `1 / (width + 1)` so neighbours keep a thin gap, particles a quarter of that.
    pub fn for_grid(width: u32) -> Result<Self, RenderError> {
        let half = 1.0 / (width as f32 + 1.0);
        Ok(Self {
            cell_params: SpriteParams::new(half)?,
            particle_params: SpriteParams::new(half / 4.0)?,
        })
    }

    pub fn build(&self, sim: &Simulation) -> Frame {
        let (w, h) = (sim.width(), sim.height());

        // x-major so cell (x, y) lives at x * h + y.
        let mut colors: Vec<Rgb> = (0..w)
            .flat_map(|x| (0..h).map(move |y| CellCoord::new(x, y)))
            .map(|cell| {
                if sim.is_occupied(cell) {
                    OCCUPIED_COLOR
                } else {
                    empty_cell_color(cell)
                }
            })
            .collect();
        for p in sim.particles() {
            let cell = p.cell();
            colors[(cell.x * h + cell.y) as usize] = p.color;
        }

        let cells = (0..w)
            .flat_map(|x| (0..h).map(move |y| CellCoord::new(x, y)))
            .zip(colors)
            .map(|(cell, color)| PointSprite::new(cell_center_ndc(cell, w, h), color))
            .collect();

        let particles = sim
            .particles()
            .iter()
            .map(|p| PointSprite::new(particle_to_ndc(p.x, p.y, w, h), PARTICLE_COLOR))
            .collect();

        Frame {
            clear_color: CLEAR_COLOR,
            layers: vec![
                SpriteBatch {
                    label: "cells",
                    params: self.cell_params,
                    stage: ColorStage::Tinted,
                    sprites: cells,
                },
                SpriteBatch {
                    label: "particles",
                    params: self.particle_params,
                    stage: ColorStage::Plain,
                    sprites: particles,
                },
            ],
        }
    }
}
