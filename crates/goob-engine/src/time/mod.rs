//! Frame timing.
//!
//! - one `FrameClock` per window; `tick()` once per presented frame
//! - `FpsCounter` turns per-frame deltas into a periodic average for display

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
