use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 2D vector in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `fallback` when the length is
    /// below `1e-8`.
    #[inline]
    pub fn normalized_or(self, fallback: Vec2) -> Vec2 {
        let len = self.length();
        if len < 1e-8 { fallback } else { self / len }
    }

    /// Component-wise product.
    #[inline]
    pub fn mul_elem(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }

    /// Rotates around the origin by `radians` (clockwise on screen, +Y down).
    #[inline]
    pub fn rotated(self, radians: f32) -> Vec2 {
        let (s, c) = radians.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized_or(Vec2::new(1.0, 0.0));
        assert!(approx(v, Vec2::new(0.6, 0.8)));
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_normalize_uses_fallback() {
        let v = Vec2::new(1e-10, -1e-10).normalized_or(Vec2::new(1.0, 0.0));
        assert_eq!(v, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotated(core::f32::consts::FRAC_PI_2);
        assert!(approx(v, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn elementwise_mul() {
        assert_eq!(Vec2::new(2.0, 3.0).mul_elem(Vec2::new(4.0, -1.0)), Vec2::new(8.0, -3.0));
    }
}
