use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Flips negative extents so width and height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let Rect { mut origin, mut size } = self;
        if size.x < 0.0 {
            origin.x += size.x;
            size.x = -size.x;
        }
        if size.y < 0.0 {
            origin.y += size.y;
            size.y = -size.y;
        }
        Rect { origin, size }
    }

    /// Half-open containment: `[min, max)`.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        b.origin.x >= a.origin.x
            && b.origin.y >= a.origin.y
            && b.max().x <= a.max().x
            && b.max().y <= a.max().y
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = a.max().x.min(b.max().x);
        let y1 = a.max().y.min(b.max().y);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn normalized_flips_negative_extents() {
        assert_eq!(r(10.0, 10.0, -4.0, -3.0).normalized(), r(6.0, 7.0, 4.0, 3.0));
        assert_eq!(r(1.0, 2.0, 3.0, 4.0).normalized(), r(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn contains_is_half_open() {
        let area = r(0.0, 0.0, 10.0, 10.0);
        assert!(area.contains(Vec2::new(0.0, 0.0)));
        assert!(area.contains(Vec2::new(9.99, 5.0)));
        assert!(!area.contains(Vec2::new(10.0, 5.0)));
        assert!(!area.contains(Vec2::new(5.0, -0.1)));
    }

    #[test]
    fn contains_rect_allows_touching_edges() {
        let bounds = r(0.0, 0.0, 100.0, 50.0);
        assert!(bounds.contains_rect(r(0.0, 0.0, 100.0, 50.0)));
        assert!(bounds.contains_rect(r(90.0, 40.0, 10.0, 10.0)));
        assert!(!bounds.contains_rect(r(91.0, 40.0, 10.0, 10.0)));
    }

    #[test]
    fn intersect_overlap_and_disjoint() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(r(5.0, 5.0, 10.0, 10.0)), Some(r(5.0, 5.0, 5.0, 5.0)));
        // Shared edge only: zero-area overlap.
        assert_eq!(a.intersect(r(10.0, 0.0, 10.0, 10.0)), None);
        assert_eq!(a.intersect(r(20.0, 20.0, 1.0, 1.0)), None);
    }

    #[test]
    fn center_and_empty() {
        assert_eq!(r(2.0, 4.0, 6.0, 8.0).center(), Vec2::new(5.0, 8.0));
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
