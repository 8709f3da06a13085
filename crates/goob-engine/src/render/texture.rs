use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::coords::{Rect, Vec2};

/// Handle to a texture in a [`TextureStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Flip {
    pub h: bool,
    pub v: bool,
}

/// Decoded RGBA8 image plus the draw state that applies to every sprite
/// using it.
///
/// Pixels are stored premultiplied. They reach the GPU the first time a
/// renderer draws the texture.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,

    /// Sub-rectangle drawn, in texels. Defaults to the whole image.
    pub clip: Rect,
    pub flip: Flip,
    /// Opacity multiplier in `[0, 1]`.
    alpha: f32,
}

impl Texture {
    /// Builds a texture from straight-alpha RGBA8 pixels, row-major.
    pub fn from_rgba8(width: u32, height: u32, mut pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("texture size must be non-zero, got {width}x{height}");
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            bail!(
                "texture {width}x{height} needs {expected} bytes of RGBA8, got {}",
                pixels.len()
            );
        }

        premultiply(&mut pixels);
        Ok(Self {
            width,
            height,
            pixels,
            clip: Rect::new(0.0, 0.0, width as f32, height as f32),
            flip: Flip::default(),
            alpha: 1.0,
        })
    }

    /// Decodes an image file (PNG, JPEG, BMP or GIF).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            bail!("texture path cannot be empty");
        }

        let img = image::open(path)
            .with_context(|| format!("failed to load image {}", path.display()))?
            .into_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.into_raw())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Premultiplied RGBA8 texels.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }
}

/// Premultiplies in linear space. Texels are sampled through an sRGB view,
/// so the stored value must be the sRGB encoding of `linear * alpha`.
fn premultiply(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        match px[3] {
            255 => {}
            0 => px[..3].fill(0),
            a => {
                let a = a as f32 / 255.0;
                for c in &mut px[..3] {
                    let linear = srgb_to_linear(*c as f32 / 255.0) * a;
                    *c = (linear_to_srgb(linear) * 255.0).round() as u8;
                }
            }
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 { c * 12.92 } else { 1.055 * c.powf(1.0 / 2.4) - 0.055 }
}

/// Owns textures and hands out [`TextureId`]s.
///
/// Ids are indices and are never reused.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }

    /// Decodes `path` and registers the result.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<TextureId> {
        let texture = Texture::load(path.as_ref())?;
        log::debug!(
            "loaded texture {} ({}x{})",
            path.as_ref().display(),
            texture.width(),
            texture.height()
        );
        Ok(self.insert(texture))
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut Texture> {
        self.textures.get_mut(id.0 as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        let err = Texture::load("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = TextureStore::new().load("does/not/exist.png").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.png"));
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let path = std::env::temp_dir().join("goob-engine-not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(Texture::load(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rgba_length_must_match_size() {
        assert!(Texture::from_rgba8(2, 2, vec![0; 15]).is_err());
        assert!(Texture::from_rgba8(0, 2, vec![]).is_err());
    }

    #[test]
    fn defaults_cover_whole_image() {
        let tex = Texture::from_rgba8(3, 2, vec![255; 24]).unwrap();
        assert_eq!(tex.clip, Rect::new(0.0, 0.0, 3.0, 2.0));
        assert_eq!(tex.flip, Flip::default());
        assert_eq!(tex.alpha(), 1.0);
        assert_eq!(tex.size(), Vec2::new(3.0, 2.0));
    }

    #[test]
    fn pixels_are_premultiplied_in_linear_space() {
        let tex = Texture::from_rgba8(3, 1, vec![255, 255, 0, 128, 10, 200, 30, 255, 90, 90, 90, 0]).unwrap();
        let px = tex.pixels();
        // Half-covered white is sRGB(0.5 linear), not 128.
        assert_eq!(&px[0..4], &[188, 188, 0, 128]);
        assert_eq!(&px[4..8], &[10, 200, 30, 255]);
        assert_eq!(&px[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn alpha_is_clamped() {
        let mut tex = Texture::from_rgba8(1, 1, vec![0; 4]).unwrap();
        tex.set_alpha(3.0);
        assert_eq!(tex.alpha(), 1.0);
        tex.set_alpha(-1.0);
        assert_eq!(tex.alpha(), 0.0);
    }

    #[test]
    fn store_ids_are_sequential() {
        let mut store = TextureStore::new();
        let a = store.insert(Texture::from_rgba8(1, 1, vec![0; 4]).unwrap());
        let b = store.insert(Texture::from_rgba8(2, 1, vec![0; 8]).unwrap());
        assert_ne!(a, b);
        assert_eq!(store.get(b).map(|t| t.width()), Some(2));
        assert!(store.get(TextureId::from_raw(9)).is_none());
    }
}
