//! Coordinate and geometry types shared by the runtime, renderers and sprites.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to NDC in shaders using a viewport uniform.

mod letterbox;
mod rect;
mod transform;
mod vec2;
mod viewport;

pub use letterbox::Letterbox;
pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
