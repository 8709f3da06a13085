use super::{Rect, Vec2, Viewport};

/// Mapping between physical surface pixels and logical drawing space.
///
/// With a fixed logical resolution the logical area is scaled uniformly to
/// fit the surface and centred; the leftover strips are the bars. Without
/// one, logical space is simply the window in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Letterbox {
    logical: Viewport,
    /// Physical pixels per logical pixel.
    scale: f32,
    /// Top-left of the logical area on the surface, in physical pixels.
    offset: Vec2,
}

impl Letterbox {
    /// Logical space follows the window: `physical / scale_factor`.
    pub fn window(physical: Vec2, scale_factor: f32) -> Self {
        let scale = if scale_factor > 0.0 && scale_factor.is_finite() { scale_factor } else { 1.0 };
        Self {
            logical: Viewport::new(physical.x / scale, physical.y / scale),
            scale,
            offset: Vec2::zero(),
        }
    }

    /// Fits a fixed `logical` resolution into a `physical` surface,
    /// preserving aspect ratio.
    pub fn fit(logical: Viewport, physical: Vec2) -> Self {
        if !logical.is_valid() || physical.x <= 0.0 || physical.y <= 0.0 {
            return Self { logical, scale: 1.0, offset: Vec2::zero() };
        }

        let scale = (physical.x / logical.width).min(physical.y / logical.height);
        let used = logical.size() * scale;
        Self {
            logical,
            scale,
            offset: (physical - used) * 0.5,
        }
    }

    #[inline]
    pub fn logical(&self) -> Viewport {
        self.logical
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Logical area on the surface, in physical pixels.
    pub fn physical_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.logical.size() * self.scale)
    }

    #[inline]
    pub fn to_logical(&self, physical: Vec2) -> Vec2 {
        (physical - self.offset) / self.scale
    }

    #[inline]
    pub fn to_physical(&self, logical: Vec2) -> Vec2 {
        logical * self.scale + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_aspect_fills_surface() {
        let lb = Letterbox::fit(Viewport::new(800.0, 600.0), Vec2::new(1600.0, 1200.0));
        assert_eq!(lb.scale(), 2.0);
        assert_eq!(lb.physical_rect(), Rect::new(0.0, 0.0, 1600.0, 1200.0));
    }

    #[test]
    fn wider_surface_gets_side_bars() {
        let lb = Letterbox::fit(Viewport::new(800.0, 600.0), Vec2::new(1000.0, 600.0));
        assert_eq!(lb.scale(), 1.0);
        assert_eq!(lb.physical_rect(), Rect::new(100.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn taller_surface_gets_top_and_bottom_bars() {
        let lb = Letterbox::fit(Viewport::new(800.0, 600.0), Vec2::new(400.0, 600.0));
        assert_eq!(lb.scale(), 0.5);
        assert_eq!(lb.physical_rect(), Rect::new(0.0, 150.0, 400.0, 300.0));
    }

    #[test]
    fn pointer_mapping_round_trips() {
        let lb = Letterbox::fit(Viewport::new(800.0, 600.0), Vec2::new(1000.0, 600.0));
        assert_eq!(lb.to_logical(Vec2::new(100.0, 0.0)), Vec2::zero());
        assert_eq!(lb.to_logical(Vec2::new(500.0, 300.0)), Vec2::new(400.0, 300.0));
        // Points over the bars map outside the logical area.
        assert!(lb.to_logical(Vec2::new(50.0, 10.0)).x < 0.0);
        assert_eq!(lb.to_physical(Vec2::new(400.0, 300.0)), Vec2::new(500.0, 300.0));
    }

    #[test]
    fn window_mode_divides_by_scale_factor() {
        let lb = Letterbox::window(Vec2::new(2560.0, 1440.0), 2.0);
        assert_eq!(lb.logical(), Viewport::new(1280.0, 720.0));
        assert_eq!(lb.to_logical(Vec2::new(200.0, 100.0)), Vec2::new(100.0, 50.0));
        assert_eq!(lb.physical_rect(), Rect::new(0.0, 0.0, 2560.0, 1440.0));
    }

    #[test]
    fn zero_surface_does_not_divide_by_zero() {
        let lb = Letterbox::fit(Viewport::new(800.0, 600.0), Vec2::zero());
        assert_eq!(lb.scale(), 1.0);
        assert!(lb.to_logical(Vec2::new(1.0, 1.0)).is_finite());
    }
}
