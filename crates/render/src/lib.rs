//! Rendering Adapter: renderer-agnostic point-sprite pipeline.
//!
//! Every frame is a list of point batches. Each point is expanded into a
//! quad of fixed half-extent and coloured by a fixed fragment stage.
//!
//! # Invariants
//! - Renderers cannot mutate simulation state.
//! - Exactly four vertices per input point; colour is uniform over the quad.
//! - Tinted fragments are `(0.5 * r, g, b, 1.0)`.

mod frame;
mod raster;
mod renderer;
pub mod sprite;

pub use frame::{
    CLEAR_COLOR, Frame, FrameBuilder, OCCUPIED_COLOR, PARTICLE_COLOR, SpriteBatch,
    cell_center_ndc, empty_cell_color, particle_to_ndc,
};
pub use raster::Framebuffer;
pub use renderer::{DebugTextRenderer, Renderer, SoftwareRenderer};
pub use sprite::{ColorStage, PointSprite, QuadVertex, RenderError, SpriteParams};

pub fn crate_info() -> &'static str {
    "pixelsand-render v0.1.0"
}
