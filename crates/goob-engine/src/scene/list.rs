use super::{SortKey, SpriteCmd, ZIndex};

/// A recorded sprite with its paint-order key.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: SpriteCmd,
}

/// Sprites recorded for one frame.
///
/// `push` is O(1). Paint-order iteration sorts an index buffer that is kept
/// across frames, so a warmed-up list does not allocate.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded items, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.sorted_indices.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: SpriteCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem { key: SortKey::new(z, order), cmd });
        self.sorted_dirty = true;
    }

    /// Items back-to-front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted_indices.clear();
            self.sorted_indices.extend(0..self.items.len());
            let items = &self.items;
            // Keys are unique (insertion order), so an unstable sort is deterministic.
            self.sorted_indices.sort_unstable_by_key(|&i| items[i].key);
            self.sorted_dirty = false;
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Transform, Vec2};
    use crate::render::TextureId;

    fn sprite_at(x: f32) -> SpriteCmd {
        SpriteCmd::new(TextureId::from_raw(0), Transform::at(Vec2::new(x, 0.0)))
    }

    fn paint_xs(list: &mut DrawList) -> Vec<f32> {
        list.iter_in_paint_order().map(|i| i.cmd.transform.pos.x).collect()
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut list = DrawList::new();
        list.push(ZIndex(1), sprite_at(0.0));
        list.push(ZIndex(0), sprite_at(1.0));
        list.push(ZIndex(1), sprite_at(2.0));
        list.push(ZIndex(-5), sprite_at(3.0));

        assert_eq!(paint_xs(&mut list), vec![3.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn clear_resets_order_and_items() {
        let mut list = DrawList::new();
        list.push(ZIndex::DEFAULT, sprite_at(0.0));
        list.clear();
        assert!(list.is_empty());
        assert!(paint_xs(&mut list).is_empty());

        list.push(ZIndex::DEFAULT, sprite_at(7.0));
        assert_eq!(list.items()[0].key.order, 0);
        assert_eq!(paint_xs(&mut list), vec![7.0]);
    }
}
