//! Sprite texture selection.

use std::path::Path;

use anyhow::Result;
use goob_engine::render::{Texture, TextureId, TextureStore};

pub const DOT_SIZE: u32 = 32;

/// A soft-edged round dot, warm orange on transparent.
pub fn dot_texture(size: u32) -> Result<Texture> {
    let r = size as f32 * 0.5;
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - r;
            let dy = y as f32 + 0.5 - r;
            // One-pixel antialiased rim.
            let coverage = (r - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            pixels.extend_from_slice(&[255, 176, 64, (coverage * 255.0).round() as u8]);
        }
    }
    Texture::from_rgba8(size, size, pixels)
}

/// Loads `path` if given, otherwise registers a generated dot.
pub fn sprite_texture(store: &mut TextureStore, path: Option<&Path>) -> Result<TextureId> {
    match path {
        Some(path) => store.load(path),
        None => Ok(store.insert(dot_texture(DOT_SIZE)?)),
    }
}
