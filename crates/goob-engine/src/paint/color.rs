/// Linear premultiplied RGBA color.
///
/// Invariant: `r`, `g` and `b` are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    /// Creates a premultiplied color from straight 8-bit RGBA, the form
    /// colours take on the command line and in clear calls.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight-alpha components. Inputs
    /// are clamped to `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Scales opacity by `factor` (clamped to `[0, 1]`), keeping the
    /// premultiplied invariant.
    #[inline]
    pub fn with_alpha_mul(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self { r: self.r * f, g: self.g * f, b: self.b * f, a: self.a * f }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_bytes_are_premultiplied() {
        let c = Color::from_srgb_u8(255, 0, 255, 51);
        assert!((c.a - 0.2).abs() < 1e-6);
        assert!((c.r - 0.2).abs() < 1e-6);
        assert_eq!(c.g, 0.0);
    }

    #[test]
    fn opaque_bytes_keep_channels() {
        assert_eq!(Color::from_srgb_u8(0, 0, 0, 255), Color::BLACK);
        assert_eq!(Color::from_srgb_u8(255, 255, 255, 255), Color::WHITE);
    }

    #[test]
    fn alpha_mul_scales_every_channel() {
        let c = Color::WHITE.with_alpha_mul(0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.5, 0.5, 0.5));
        assert_eq!(Color::WHITE.with_alpha_mul(2.0), Color::WHITE);
    }
}
