//! GPU rendering.
//!
//! Renderers consume a `scene::DrawList` and own their GPU resources
//! (pipelines, buffers, uploaded textures).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.
//! - Every pass restricts itself to the letterboxed logical area.

mod common;
mod ctx;
mod sprite;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::{sprite_quad, SpriteQuad, SpriteRenderer};
pub use texture::{Flip, Texture, TextureId, TextureStore};
