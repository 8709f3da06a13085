use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, TextEvent};

/// Input transitions recorded during the current frame.
///
/// Cleared by the runtime after `App::on_frame` returns.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    pub text: Vec<TextEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.text.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Every button press this frame with its logical position, in order.
    ///
    /// Unlike `buttons_pressed`, two clicks of the same button within one
    /// frame are both reported.
    pub fn clicks(&self) -> impl Iterator<Item = (MouseButton, Vec2)> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state: MouseButtonState::Pressed,
                x,
                y,
                ..
            }) => Some((*button, Vec2::new(*x, *y))),
            _ => None,
        })
    }

    /// Key-down events this frame, including repeats, as `(key, code)`.
    pub fn key_downs(&self) -> impl Iterator<Item = (Key, u32)> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::Key { key, state: KeyState::Pressed, code, .. } => Some((*key, *code)),
            _ => None,
        })
    }
}
