//! The contract between the runtime loop and a program.
//!
//! A program implements [`App`]; the runtime hands it a [`FrameCtx`] once
//! per redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
