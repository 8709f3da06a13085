//! goob engine crate.
//!
//! The thin layer under the goob programs: one window with a wgpu surface,
//! platform-agnostic input, frame timing, and textured sprites drawn from a
//! per-frame draw list. There is no scene graph and no asset pipeline.
//!
//! A program implements [`core::App`] and hands it to
//! [`window::Runtime::run`]:
//!
//! ```no_run
//! use goob_engine::core::{App, AppControl, FrameCtx};
//! use goob_engine::device::GpuInit;
//! use goob_engine::paint::Color;
//! use goob_engine::window::{Runtime, RuntimeConfig};
//!
//! struct Blank;
//!
//! impl App for Blank {
//!     fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
//!         ctx.render(Color::BLACK, |_, _| {})
//!     }
//! }
//!
//! Runtime::run(RuntimeConfig::new("blank", 640.0, 480.0), GpuInit::default(), Blank).unwrap();
//! ```

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
