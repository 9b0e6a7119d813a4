//! wgpu render backend for pixelsand.
//!
//! Draws [`pixelsand_render::Frame`] layers as instanced point sprites:
//! one instance per point, four strip vertices per instance.
//!
//! # Invariants
//! - Instance attributes sit at shader locations 0 (position) and 3 (colour).
//! - Each layer is one draw of four strip vertices per point, in frame order.
//! - Sprite pixels replace what is below them; there is no blending or depth.

mod gpu;
mod shaders;

pub use gpu::SpriteRenderer;
pub use shaders::SPRITE_SHADER;
