use crate::frame::{Frame, SpriteBatch};
use crate::sprite::{RenderError, expand_point};

/// RGBA float framebuffer, row 0 at the top like an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFramebuffer { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Pixel at column `x`, row `y` (top-down).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Pack to 8-bit RGBA, clamping each channel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    /// Draw every layer of a frame after clearing to its clear colour.
    pub fn draw_frame(&mut self, frame: &Frame) {
        self.clear(frame.clear_color);
        for layer in &frame.layers {
            self.draw_batch(layer);
        }
    }

    /// Rasterize one batch. A pixel is covered when its centre falls inside
    /// the quad's half-open extent; covered pixels are replaced, no blending.
    pub fn draw_batch(&mut self, batch: &SpriteBatch) {
        let (w, h) = (self.width as f32, self.height as f32);
        for sprite in &batch.sprites {
            let quad = expand_point(sprite, &batch.params);
            // Bottom-left and top-right corners in strip order.
            let (min, max) = (quad[0].position, quad[3].position);
            let color = batch.stage.shade(quad[0].color);

            // Clip x in [-1, 1] maps to 0..w; clip y is flipped for top-down rows.
            let px_min = ((min.x + 1.0) * 0.5 * w - 0.5).ceil().max(0.0) as u32;
            let px_max = ((max.x + 1.0) * 0.5 * w - 0.5).ceil().min(w) as u32;
            let py_min = ((1.0 - max.y) * 0.5 * h - 0.5).ceil().max(0.0) as u32;
            let py_max = ((1.0 - min.y) * 0.5 * h - 0.5).ceil().min(h) as u32;

            for y in py_min..py_max {
                let row = (y * self.width) as usize;
                for x in px_min..px_max {
                    self.pixels[row + x as usize] = color;
                }
            }
        }
    }
}
