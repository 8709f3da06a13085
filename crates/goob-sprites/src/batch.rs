use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use goob_engine::coords::{Rect, Transform, Vec2};
use goob_engine::render::TextureId;
use goob_engine::scene::{DrawList, SpriteCmd, ZIndex};
use goob_ink::{parse_str, Behavior, Bindings, InkError, Interpreter};
use rand::Rng;

use crate::sprite::random_unit_dir;

/// Mutable per-sprite fields a script can read and assign.
pub const FIELDS: [&str; 9] = [
    "pos.x", "pos.y", "dir.x", "dir.y", "rot", "scale.x", "scale.y", "speed", "angle_speed",
];

/// Read-only names bound for every update.
pub const CONSTANTS: [&str; 8] = [
    "dt", "bounds.x", "bounds.y", "bounds.w", "bounds.h", "rect_w", "rect_h", "PI",
];

#[derive(Debug, Default, Clone)]
struct Columns {
    pos_x: Vec<f64>,
    pos_y: Vec<f64>,
    dir_x: Vec<f64>,
    dir_y: Vec<f64>,
    rot: Vec<f64>,
    scale_x: Vec<f64>,
    scale_y: Vec<f64>,
    speed: Vec<f64>,
    angle_speed: Vec<f64>,
}

impl Columns {
    fn truncate(&mut self, len: usize) {
        for col in [
            &mut self.pos_x,
            &mut self.pos_y,
            &mut self.dir_x,
            &mut self.dir_y,
            &mut self.rot,
            &mut self.scale_x,
            &mut self.scale_y,
            &mut self.speed,
            &mut self.angle_speed,
        ] {
            col.truncate(len);
        }
    }
}

/// A batch of sprites driven by one Ink behaviour.
///
/// State is stored as struct-of-arrays, one `f64` column per field in
/// [`FIELDS`], all of length [`len`](Self::len). Each [`update`](Self::update)
/// runs the behaviour over the whole batch.
#[derive(Debug)]
pub struct InkSprites {
    columns: Columns,
    len: usize,
    texture_size: Vec2,
    bounds: Rect,
    behavior: Behavior,
    interpreter: Interpreter,
}

impl InkSprites {
    /// Parses `src` and checks it against the batch's fields and constants.
    pub fn new(texture_size: Vec2, bounds: Rect, src: &str) -> Result<Self> {
        let behavior = parse_str(src).context("failed to parse ink script")?;
        Interpreter::check(&behavior, &FIELDS, &CONSTANTS)
            .with_context(|| format!("ink behavior '{}' is invalid", behavior.name))?;

        Ok(Self {
            columns: Columns::default(),
            len: 0,
            texture_size,
            bounds,
            behavior,
            interpreter: Interpreter::new(),
        })
    }

    /// Reads the script at `path`, then as [`new`](Self::new).
    pub fn from_path(texture_size: Vec2, bounds: Rect, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("could not open ink script {}", path.display()))?;
        let batch = Self::new(texture_size, bounds, &src)
            .with_context(|| format!("in {}", path.display()))?;
        log::info!("loaded ink behavior '{}' from {}", batch.behavior.name, path.display());
        Ok(batch)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn behavior_name(&self) -> &str {
        &self.behavior.name
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Appends `count` sprites at uniform random positions inside the
    /// bounds, each with a random unit direction, speed in `[1, 7)`, angle
    /// speed in `[0.2, 3.5)`, rotation 0 and a uniform `scale`.
    pub fn add<R: Rng + ?Sized>(&mut self, count: usize, scale: f64, rng: &mut R) {
        let b = self.bounds.normalized();
        let c = &mut self.columns;

        for _ in 0..count {
            c.pos_x.push(uniform(rng, b.origin.x as f64, b.size.x as f64));
            c.pos_y.push(uniform(rng, b.origin.y as f64, b.size.y as f64));

            let dir = random_unit_dir(rng);
            c.dir_x.push(dir.x as f64);
            c.dir_y.push(dir.y as f64);

            c.rot.push(0.0);
            c.scale_x.push(scale);
            c.scale_y.push(scale);
            c.speed.push(rng.random_range(1.0..7.0));
            c.angle_speed.push(rng.random_range(0.2..3.5));
        }
        self.len += count;
    }

    /// Drops the `count` most recently added sprites, or all of them if
    /// there are fewer.
    pub fn remove(&mut self, count: usize) {
        self.len -= count.min(self.len);
        self.columns.truncate(self.len);
    }

    /// Runs the behaviour once with `dt` seconds elapsed.
    pub fn update(&mut self, dt: f64) -> Result<(), InkError> {
        if self.len == 0 {
            return Ok(());
        }

        // The sprite-0 scale stands in for the whole batch.
        let rect_w = self.texture_size.x as f64 * self.columns.scale_x[0];
        let rect_h = self.texture_size.y as f64 * self.columns.scale_y[0];

        let Columns { pos_x, pos_y, dir_x, dir_y, rot, scale_x, scale_y, speed, angle_speed } = &mut self.columns;
        let mut bindings = Bindings::new(self.len);
        for (name, col) in FIELDS.into_iter().zip([
            pos_x, pos_y, dir_x, dir_y, rot, scale_x, scale_y, speed, angle_speed,
        ]) {
            bindings.bind_field(name, col.as_mut_slice())?;
        }

        let b = self.bounds;
        for (name, value) in CONSTANTS.into_iter().zip([
            dt,
            b.origin.x as f64,
            b.origin.y as f64,
            b.size.x as f64,
            b.size.y as f64,
            rect_w,
            rect_h,
            PI,
        ]) {
            bindings.bind_constant(name, value);
        }

        self.interpreter.execute(&self.behavior, &mut bindings)
    }

    /// Records one sprite command per sprite.
    pub fn draw(&self, draw_list: &mut DrawList, texture: TextureId, anchor: Vec2, pivot: Vec2) {
        let c = &self.columns;
        for i in 0..self.len {
            let transform = Transform::at(Vec2::new(c.pos_x[i] as f32, c.pos_y[i] as f32))
                .with_rot(c.rot[i] as f32)
                .with_scale(Vec2::new(c.scale_x[i] as f32, c.scale_y[i] as f32));
            let cmd = SpriteCmd::new(texture, transform).with_anchor(anchor).with_pivot(pivot);
            draw_list.push_sprite(ZIndex::DEFAULT, cmd);
        }
    }

    /// Current value of `field` for sprite `index`.
    pub fn get(&self, field: &str, index: usize) -> Option<f64> {
        let c = &self.columns;
        let col = match field {
            "pos.x" => &c.pos_x,
            "pos.y" => &c.pos_y,
            "dir.x" => &c.dir_x,
            "dir.y" => &c.dir_y,
            "rot" => &c.rot,
            "scale.x" => &c.scale_x,
            "scale.y" => &c.scale_y,
            "speed" => &c.speed,
            "angle_speed" => &c.angle_speed,
            _ => return None,
        };
        col.get(index).copied()
    }
}

/// Uniform in `[start, start + extent)`, or `start` when that range is empty
/// or not finite.
fn uniform<R: Rng + ?Sized>(rng: &mut R, start: f64, extent: f64) -> f64 {
    let end = start + extent;
    if start.is_finite() && end.is_finite() && end > start {
        rng.random_range(start..end)
    } else {
        start
    }
}
