//! Colour model shared by the clear pass and the sprite renderer.
//!
//! Colours are linear, premultiplied-alpha RGBA. Geometry types live in
//! `coords`.

pub mod color;

pub use color::Color;
