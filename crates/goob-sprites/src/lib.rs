//! Sprite state for the goob programs.
//!
//! - [`Sprite`] / [`SpriteSet`]: individually simulated dots that bounce
//!   inside a rectangle and spin
//! - [`InkSprites`]: a struct-of-arrays batch whose per-frame behaviour is an
//!   Ink script run over every sprite at once
//!
//! Both only record draw commands; rendering is the engine's job.

mod batch;
mod set;
mod sprite;

pub use batch::InkSprites;
pub use set::SpriteSet;
pub use sprite::{random_unit_dir, Sprite, SpriteId};
