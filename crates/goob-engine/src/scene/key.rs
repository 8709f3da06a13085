/// Z layer. Higher values are painted on top.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const BACKGROUND: ZIndex = ZIndex(-100);
    pub const DEFAULT: ZIndex = ZIndex(0);
    pub const OVERLAY: ZIndex = ZIndex(100);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

/// Paint-order key: `z` first, then insertion `order`.
///
/// Field order matters: the derived `Ord` compares `z` before `order`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_dominates_insertion_order() {
        let back_late = SortKey::new(ZIndex(-1), 10);
        let front_early = SortKey::new(ZIndex(1), 0);
        assert!(back_late < front_early);
    }

    #[test]
    fn equal_z_keeps_insertion_order() {
        assert!(SortKey::new(ZIndex::DEFAULT, 1) < SortKey::new(ZIndex::DEFAULT, 2));
    }
}
