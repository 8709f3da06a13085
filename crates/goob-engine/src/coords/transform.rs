use super::Vec2;

/// Placement of a sprite: position, rotation (radians) and scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub pos: Vec2,
    pub rot: f32,
    pub scale: Vec2,
}

impl Transform {
    #[inline]
    pub const fn at(pos: Vec2) -> Self {
        Self { pos, rot: 0.0, scale: Vec2::splat(1.0) }
    }

    #[inline]
    pub const fn with_rot(mut self, rot: f32) -> Self {
        self.rot = rot;
        self
    }

    #[inline]
    pub const fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::zero())
    }
}
