//! Ink-scripted sprites: left click adds a batch, right click removes one.

use anyhow::Result;
use goob_engine::coords::{Rect, Vec2};
use goob_engine::core::{App, AppControl, FrameCtx};
use goob_engine::input::{Key, MouseButton};
use goob_engine::paint::Color;
use goob_engine::render::{SpriteRenderer, TextureId, TextureStore};
use goob_engine::scene::DrawList;
use goob_engine::time::FpsCounter;
use goob_engine::window::Runtime;
use goob_sprites::InkSprites;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::assets::sprite_texture;
use crate::cli::{InkArgs, WindowArgs};

const BUNDLED_SCRIPT: &str = include_str!("../scripts/bounce.ink");

struct InkApp {
    textures: TextureStore,
    texture: TextureId,
    renderer: SpriteRenderer,
    draw_list: DrawList,
    sprites: InkSprites,
    count: usize,
    scale: f64,
    rng: ChaCha8Rng,
    fps: FpsCounter,
}

impl App for InkApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        self.sprites.set_bounds(Rect::from_origin_size(Vec2::zero(), ctx.viewport().size()));

        for (button, _) in ctx.input_frame.clicks() {
            match button {
                MouseButton::Left => self.sprites.add(self.count, self.scale, &mut self.rng),
                MouseButton::Right => self.sprites.remove(self.count),
                _ => {}
            }
        }

        if let Err(e) = self.sprites.update(ctx.time.dt as f64) {
            log::error!("behavior '{}' failed: {e}", self.sprites.behavior_name());
            return AppControl::Exit;
        }

        if let Some(fps) = self.fps.record(ctx.time.dt) {
            println!("FPS: {fps:.0}  sprites: {}", self.sprites.len());
        }

        self.draw_list.clear();
        self.sprites.draw(&mut self.draw_list, self.texture, Vec2::zero(), Vec2::splat(0.5));

        let (renderer, draw_list, textures) = (&mut self.renderer, &mut self.draw_list, &self.textures);
        ctx.render(Color::from_srgb_u8(12, 12, 20, 255), |rctx, target| {
            renderer.render(rctx, target, draw_list, textures);
        })
    }
}

pub fn run(window: &WindowArgs, args: &InkArgs) -> Result<()> {
    let mut textures = TextureStore::new();
    let texture = sprite_texture(&mut textures, args.texture.as_deref())?;
    let texture_size = textures.get(texture).map(|t| t.clip.size).unwrap_or(Vec2::splat(1.0));

    let config = window.runtime_config("goob ink");
    let initial = config.logical_size.map(|vp| vp.size()).unwrap_or(Vec2::new(
        config.initial_size.width as f32,
        config.initial_size.height as f32,
    ));
    let bounds = Rect::from_origin_size(Vec2::zero(), initial);

    let sprites = match &args.script {
        Some(path) => InkSprites::from_path(texture_size, bounds, path)?,
        None => InkSprites::new(texture_size, bounds, BUNDLED_SCRIPT)?,
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("ink: behavior '{}', seed {seed}", sprites.behavior_name());

    let app = InkApp {
        textures,
        texture,
        renderer: SpriteRenderer::new(),
        draw_list: DrawList::new(),
        sprites,
        count: args.count,
        scale: args.scale,
        rng: ChaCha8Rng::seed_from_u64(seed),
        fps: FpsCounter::default(),
    };

    Runtime::run(config, window.gpu_init(), app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_script_is_valid() {
        let s = InkSprites::new(Vec2::splat(32.0), Rect::new(0.0, 0.0, 800.0, 600.0), BUNDLED_SCRIPT).unwrap();
        assert_eq!(s.behavior_name(), "bounce");
    }

    #[test]
    fn bundled_script_keeps_sprites_inside() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        let mut s = InkSprites::new(Vec2::splat(10.0), bounds, BUNDLED_SCRIPT).unwrap();
        s.add(50, 1.0, &mut ChaCha8Rng::seed_from_u64(11));
        for _ in 0..300 {
            s.update(1.0 / 30.0).unwrap();
        }
        for i in 0..s.len() {
            let (x, y) = (s.get("pos.x", i).unwrap(), s.get("pos.y", i).unwrap());
            assert!((0.0..=190.0).contains(&x), "x = {x}");
            assert!((0.0..=90.0).contains(&y), "y = {y}");
            let rot = s.get("rot", i).unwrap();
            assert!((0.0..2.0 * std::f64::consts::PI).contains(&rot));
        }
    }
}
