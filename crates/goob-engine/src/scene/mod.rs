//! Per-frame draw stream.
//!
//! Apps record sprites into a `DrawList`; renderers read it back in paint
//! order (z ascending, then insertion order).

mod key;
mod list;
mod sprite;

pub use key::{SortKey, ZIndex};
pub use list::{DrawItem, DrawList};
pub use sprite::SpriteCmd;
