use std::f32::consts::TAU;

use goob_engine::coords::{Rect, Transform, Vec2};
use rand::Rng;

/// Identifier of a sprite within its [`SpriteSet`](crate::SpriteSet).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u64);

/// A dot moving in a straight line, reflecting off the bounds it is
/// updated with, and spinning at a constant rate.
///
/// `pos` is the centre of the sprite's rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    pub pos: Vec2,
    /// Unit direction of travel.
    pub dir: Vec2,
    /// Radians, in `[0, 2π)`.
    pub rot: f32,
    /// Logical pixels per second.
    pub speed: f32,
    /// Radians per second.
    pub angle_speed: f32,
    pub size: Vec2,
}

impl Sprite {
    pub const DEFAULT_SPEED: f32 = 240.0;
    pub const DEFAULT_ANGLE_SPEED: f32 = 1.5;

    pub fn new(id: SpriteId, pos: Vec2, dir: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            dir: dir.normalized_or(Vec2::new(1.0, 0.0)),
            rot: 0.0,
            speed: Self::DEFAULT_SPEED,
            angle_speed: Self::DEFAULT_ANGLE_SPEED,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos - self.size * 0.5, self.size)
    }

    /// Advances by `dt` seconds.
    ///
    /// On contact with an edge of `bounds` the matching direction component
    /// is pointed back inwards and the sprite is pushed back inside.
    pub fn update(&mut self, dt: f32, bounds: Rect) {
        self.pos += self.dir * (self.speed * dt);

        let half = self.size * 0.5;
        let (min, max) = (bounds.min(), bounds.max());

        if self.pos.x - half.x < min.x {
            self.pos.x = min.x + half.x;
            self.dir.x = self.dir.x.abs();
        } else if self.pos.x + half.x > max.x {
            self.pos.x = max.x - half.x;
            self.dir.x = -self.dir.x.abs();
        }

        if self.pos.y - half.y < min.y {
            self.pos.y = min.y + half.y;
            self.dir.y = self.dir.y.abs();
        } else if self.pos.y + half.y > max.y {
            self.pos.y = max.y - half.y;
            self.dir.y = -self.dir.y.abs();
        }

        self.rot = wrap_angle(self.rot + self.angle_speed * dt);
    }

    /// Placement for drawing with a centre anchor and pivot. `scale` maps
    /// the texture's clip size onto `size`.
    pub fn transform(&self, texture_size: Vec2) -> Transform {
        let scale = Vec2::new(
            if texture_size.x > 0.0 { self.size.x / texture_size.x } else { 1.0 },
            if texture_size.y > 0.0 { self.size.y / texture_size.y } else { 1.0 },
        );
        Transform::at(self.pos).with_rot(self.rot).with_scale(scale)
    }
}

/// `angle` reduced into `[0, 2π)`.
fn wrap_angle(angle: f32) -> f32 {
    let r = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if r >= TAU { 0.0 } else { r }
}

/// Random direction with both components drawn from `[-1, 1]`, normalised.
///
/// A draw too short to normalise becomes `(1, 0)`.
pub fn random_unit_dir<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let v = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0));
    v.normalized_or(Vec2::new(1.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 50.0)
    }

    fn sprite(pos: Vec2, dir: Vec2) -> Sprite {
        Sprite::new(SpriteId(0), pos, dir, Vec2::splat(10.0))
    }

    #[test]
    fn moves_along_direction() {
        let mut s = sprite(Vec2::new(50.0, 25.0), Vec2::new(1.0, 0.0));
        s.speed = 10.0;
        s.update(0.5, bounds());
        assert_eq!(s.pos, Vec2::new(55.0, 25.0));
    }

    #[test]
    fn bounces_off_right_edge() {
        let mut s = sprite(Vec2::new(90.0, 25.0), Vec2::new(1.0, 0.0));
        s.speed = 100.0;
        s.update(0.1, bounds());
        assert_eq!(s.pos.x, 95.0);
        assert_eq!(s.dir.x, -1.0);
        assert!(bounds().contains_rect(s.rect()));
    }

    #[test]
    fn bounces_off_top_and_left() {
        let mut s = sprite(Vec2::new(6.0, 6.0), Vec2::new(-1.0, -1.0));
        s.speed = 50.0;
        s.update(0.1, bounds());
        assert_eq!(s.pos, Vec2::new(5.0, 5.0));
        assert!(s.dir.x > 0.0 && s.dir.y > 0.0);
    }

    #[test]
    fn stays_inside_over_many_frames() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut s = sprite(Vec2::new(50.0, 25.0), random_unit_dir(&mut rng));
        s.speed = 900.0;
        for _ in 0..500 {
            s.update(1.0 / 60.0, bounds());
            assert!(bounds().contains_rect(s.rect()), "escaped at {:?}", s.pos);
        }
    }

    #[test]
    fn rotation_wraps() {
        let mut s = sprite(Vec2::new(50.0, 25.0), Vec2::new(1.0, 0.0));
        s.speed = 0.0;
        s.rot = 6.0;
        s.angle_speed = 1.0;
        s.update(0.5, bounds());
        assert!((s.rot - (6.5 - TAU)).abs() < 1e-5);

        s.angle_speed = -1.0;
        s.update(0.5, bounds());
        assert!(s.rot >= 0.0 && s.rot < TAU);
    }

    #[test]
    fn wrap_angle_range() {
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
        assert!((wrap_angle(-1.0) - (TAU - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn new_normalises_direction() {
        let s = sprite(Vec2::zero(), Vec2::new(3.0, 4.0));
        assert!((s.dir.length() - 1.0).abs() < 1e-6);
        let s = sprite(Vec2::zero(), Vec2::zero());
        assert_eq!(s.dir, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn random_dirs_are_unit() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let d = random_unit_dir(&mut rng);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn transform_scales_texture_to_size() {
        let s = sprite(Vec2::new(3.0, 4.0), Vec2::new(1.0, 0.0));
        let t = s.transform(Vec2::new(20.0, 5.0));
        assert_eq!(t.pos, Vec2::new(3.0, 4.0));
        assert_eq!(t.scale, Vec2::new(0.5, 2.0));
    }
}
