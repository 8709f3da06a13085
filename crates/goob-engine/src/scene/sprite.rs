use crate::coords::{Transform, Vec2};
use crate::render::TextureId;
use crate::scene::{DrawList, ZIndex};

/// One textured quad.
///
/// `anchor` picks the point of the quad placed at `transform.pos` and
/// `pivot` the rotation centre, both normalised to the quad (`0..1`).
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCmd {
    pub texture: TextureId,
    pub transform: Transform,
    pub anchor: Vec2,
    pub pivot: Vec2,
}

impl SpriteCmd {
    /// Sprite anchored and pivoting at its top-left corner.
    #[inline]
    pub fn new(texture: TextureId, transform: Transform) -> Self {
        Self { texture, transform, anchor: Vec2::zero(), pivot: Vec2::zero() }
    }

    #[inline]
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    #[inline]
    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }
}

impl DrawList {
    /// Records a sprite draw.
    #[inline]
    pub fn push_sprite(&mut self, z: ZIndex, cmd: SpriteCmd) {
        self.push(z, cmd);
    }
}
