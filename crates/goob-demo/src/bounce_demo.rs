//! Bouncing dots: left click spawns, right click halves, middle click
//! clears, `Delete` removes the oldest.

use anyhow::Result;
use goob_engine::coords::{Rect, Vec2};
use goob_engine::core::{App, AppControl, FrameCtx};
use goob_engine::input::{Key, MouseButton};
use goob_engine::paint::Color;
use goob_engine::render::{SpriteRenderer, TextureId, TextureStore};
use goob_engine::scene::DrawList;
use goob_engine::time::FpsCounter;
use goob_engine::window::Runtime;
use goob_sprites::SpriteSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::assets::sprite_texture;
use crate::cli::{BounceArgs, WindowArgs};

struct BounceApp {
    textures: TextureStore,
    texture: TextureId,
    renderer: SpriteRenderer,
    draw_list: DrawList,
    sprites: SpriteSet,
    rng: ChaCha8Rng,
    fps: FpsCounter,
}

impl App for BounceApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        for (button, pos) in ctx.input_frame.clicks() {
            match button {
                MouseButton::Left => {
                    let id = self.sprites.spawn(pos, &mut self.rng);
                    log::debug!("spawned {id:?} at {pos:?}");
                }
                MouseButton::Right => self.sprites.truncate(self.sprites.len() / 2),
                MouseButton::Middle => self.sprites.clear(),
                _ => {}
            }
        }

        if ctx.input_frame.keys_pressed.contains(&Key::Delete) {
            if let Some(id) = self.sprites.oldest() {
                self.sprites.remove(id);
            }
        }

        let bounds = Rect::from_origin_size(Vec2::zero(), ctx.viewport().size());
        self.sprites.update(ctx.time.dt, bounds);

        if let Some(fps) = self.fps.record(ctx.time.dt) {
            println!("FPS: {fps:.0}  sprites: {}", self.sprites.len());
        }

        let texture_size = self.textures.get(self.texture).map(|t| t.clip.size).unwrap_or(Vec2::splat(1.0));
        self.draw_list.clear();
        self.sprites.draw(&mut self.draw_list, self.texture, texture_size);

        let (renderer, draw_list, textures) = (&mut self.renderer, &mut self.draw_list, &self.textures);
        ctx.render(Color::from_srgb_u8(16, 18, 28, 255), |rctx, target| {
            renderer.render(rctx, target, draw_list, textures);
        })
    }
}

pub fn run(window: &WindowArgs, args: &BounceArgs) -> Result<()> {
    let mut textures = TextureStore::new();
    let texture = sprite_texture(&mut textures, args.texture.as_deref())?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("bounce: seed {seed}");

    let app = BounceApp {
        textures,
        texture,
        renderer: SpriteRenderer::new(),
        draw_list: DrawList::new(),
        sprites: SpriteSet::new(Vec2::splat(args.size.max(1.0))),
        rng: ChaCha8Rng::seed_from_u64(seed),
        fps: FpsCounter::default(),
    };

    Runtime::run(window.runtime_config("goob bounce"), window.gpu_init(), app)
}
