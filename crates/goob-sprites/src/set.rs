use goob_engine::coords::{Rect, Vec2};
use goob_engine::render::TextureId;
use goob_engine::scene::{DrawList, SpriteCmd, ZIndex};
use rand::Rng;

use crate::sprite::{random_unit_dir, Sprite, SpriteId};

/// Ordered collection of bouncing sprites.
///
/// Sprites keep spawn order. Ids increase monotonically and are never
/// handed out again, even after the sprite holding one is removed.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    sprites: Vec<Sprite>,
    next_id: u64,
    sprite_size: Vec2,
}

impl SpriteSet {
    pub fn new(sprite_size: Vec2) -> Self {
        Self { sprites: Vec::new(), next_id: 0, sprite_size }
    }

    /// Adds a sprite centred on `pos`, heading in a random direction.
    pub fn spawn<R: Rng + ?Sized>(&mut self, pos: Vec2, rng: &mut R) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.push(Sprite::new(id, pos, random_unit_dir(rng), self.sprite_size));
        id
    }

    /// Removes the sprite with `id`. Returns `false` if there is none.
    pub fn remove(&mut self, id: SpriteId) -> bool {
        // Spawn order keeps ids sorted.
        match self.sprites.binary_search_by_key(&id, |s| s.id) {
            Ok(index) => {
                self.sprites.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Keeps the `len` oldest sprites.
    pub fn truncate(&mut self, len: usize) {
        self.sprites.truncate(len);
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn oldest(&self) -> Option<SpriteId> {
        self.sprites.first().map(|s| s.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn update(&mut self, dt: f32, bounds: Rect) {
        for sprite in &mut self.sprites {
            sprite.update(dt, bounds);
        }
    }

    /// Records one centred, centre-pivoted sprite command per sprite.
    pub fn draw(&self, draw_list: &mut DrawList, texture: TextureId, texture_size: Vec2) {
        for sprite in &self.sprites {
            let cmd = SpriteCmd::new(texture, sprite.transform(texture_size))
                .with_anchor(Vec2::splat(0.5))
                .with_pivot(Vec2::splat(0.5));
            draw_list.push_sprite(ZIndex::DEFAULT, cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn filled(n: usize) -> SpriteSet {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut set = SpriteSet::new(Vec2::splat(8.0));
        for i in 0..n {
            set.spawn(Vec2::new(i as f32 * 10.0, 20.0), &mut rng);
        }
        set
    }

    fn ids(set: &SpriteSet) -> Vec<u64> {
        set.iter().map(|s| s.id.0).collect()
    }

    #[test]
    fn ids_increase_in_spawn_order() {
        let set = filled(4);
        assert_eq!(ids(&set), vec![0, 1, 2, 3]);
        assert_eq!(set.iter().nth(2).map(|s| s.pos), Some(Vec2::new(20.0, 20.0)));
    }

    #[test]
    fn remove_by_id() {
        let mut set = filled(4);
        assert!(set.remove(SpriteId(1)));
        assert!(!set.remove(SpriteId(1)));
        assert!(!set.remove(SpriteId(99)));
        assert_eq!(ids(&set), vec![0, 2, 3]);
        assert_eq!(set.oldest(), Some(SpriteId(0)));
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut set = filled(2);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.spawn(Vec2::zero(), &mut rng), SpriteId(2));
        set.truncate(0);
        assert_eq!(set.spawn(Vec2::zero(), &mut rng), SpriteId(3));
    }

    #[test]
    fn truncate_keeps_oldest() {
        let mut set = filled(5);
        set.truncate(set.len() / 2);
        assert_eq!(ids(&set), vec![0, 1]);
        set.truncate(10);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn draw_records_one_centred_command_each() {
        let set = filled(3);
        let mut list = DrawList::new();
        set.draw(&mut list, TextureId::from_raw(0), Vec2::splat(16.0));
        assert_eq!(list.len(), 3);
        let cmd = &list.items()[0].cmd;
        assert_eq!(cmd.anchor, Vec2::splat(0.5));
        assert_eq!(cmd.transform.scale, Vec2::splat(0.5));
    }

    #[test]
    fn update_moves_every_sprite() {
        let mut set = filled(3);
        let before: Vec<Vec2> = set.iter().map(|s| s.pos).collect();
        set.update(0.01, Rect::new(-100.0, -100.0, 400.0, 400.0));
        let after: Vec<Vec2> = set.iter().map(|s| s.pos).collect();
        assert!(before.iter().zip(&after).all(|(a, b)| a != b));
    }
}
