use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

/// What is held right now for one window.
///
/// Transitions are also written into an [`InputFrame`] as events are applied.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Pointer position in logical pixels; `None` once it leaves the window.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `ev` and records any transition into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.pointer_pos = Some(Vec2::new(*x, *y));
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => self.modifiers = *modifiers,

            InputEvent::Text(t) => frame.text.push(t.clone()),
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat: false }
    }

    fn click(button: MouseButton, state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers: Modifiers::default() })
    }

    #[test]
    fn key_press_and_release_are_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        // Auto-repeat: still held, not a new transition.
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        assert!(state.key_down(Key::Space));
        assert_eq!(frame.keys_pressed.len(), 1);
        assert_eq!(frame.key_downs().count(), 2);

        frame.clear();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Released));
        assert!(!state.key_down(Key::Space));
        assert!(frame.keys_released.contains(&Key::Space));
    }

    #[test]
    fn clicks_keep_position_and_order() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, click(MouseButton::Left, MouseButtonState::Pressed, 10.0, 20.0));
        state.apply_event(&mut frame, click(MouseButton::Left, MouseButtonState::Released, 10.0, 20.0));
        state.apply_event(&mut frame, click(MouseButton::Left, MouseButtonState::Pressed, 30.0, 40.0));

        let clicks: Vec<_> = frame.clicks().collect();
        assert_eq!(
            clicks,
            vec![(MouseButton::Left, Vec2::new(10.0, 20.0)), (MouseButton::Left, Vec2::new(30.0, 40.0))]
        );
        assert_eq!(state.pointer_pos, Some(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed));
        state.apply_event(&mut frame, click(MouseButton::Right, MouseButtonState::Pressed, 0.0, 0.0));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(state.keys_down.is_empty());
        assert!(state.buttons_down.is_empty());
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        assert_eq!(state.pointer_pos, Some(Vec2::new(1.0, 2.0)));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
        assert_eq!(frame.events.len(), 2);

        // A release outside the window does not bring a position back.
        state.apply_event(&mut frame, click(MouseButton::Left, MouseButtonState::Released, 0.0, 0.0));
        assert_eq!(state.pointer_pos, None);
    }
}
