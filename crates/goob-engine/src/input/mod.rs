//! Input subsystem.
//!
//! The public API does not expose winit types; `platform::winit` translates
//! window events into `InputEvent`s for the runtime.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
};
