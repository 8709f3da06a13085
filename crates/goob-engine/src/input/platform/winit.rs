use winit::event::{ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::coords::{Letterbox, Vec2};
use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent, TextEvent,
};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Pointer coordinates go through `letterbox`, so the app always sees
/// logical positions. Returns `None` for events the input layer ignores.
pub(crate) fn translate_window_event(
    letterbox: &Letterbox,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let p = letterbox.to_logical(Vec2::new(position.x as f32, position.y as f32));
            Some(InputEvent::PointerMoved(PointerMoveEvent { x: p.x, y: p.y }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => pointer_button(state, *st, *button),

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let s = letterbox.scale();
                    MouseWheelDelta::Pixel { x: p.x as f32 / s, y: p.y as f32 / s }
                }
            };
            Some(InputEvent::MouseWheel { delta, modifiers: state.modifiers })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let (key, code) = map_key(event.physical_key);
            Some(InputEvent::Key {
                key,
                state: match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                },
                modifiers: state.modifiers,
                code,
                repeat: event.repeat,
            })
        }

        WindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => {
            Some(InputEvent::Text(TextEvent { text: text.clone() }))
        }

        _ => None,
    }
}

/// winit 0.30 does not report a position with button events, so the last
/// known pointer position is used. A press without one is dropped. A
/// release is always delivered so a held button cannot stick.
fn pointer_button(state: &InputState, st: ElementState, button: WinitMouseButton) -> Option<InputEvent> {
    let p = match (state.pointer_pos, st) {
        (Some(p), _) => p,
        (None, ElementState::Released) => Vec2::zero(),
        (None, ElementState::Pressed) => {
            log::debug!("dropping {button:?} press: pointer position unknown");
            return None;
        }
    };
    Some(InputEvent::PointerButton(PointerButtonEvent {
        button: map_mouse_button(button),
        state: match st {
            ElementState::Pressed => MouseButtonState::Pressed,
            ElementState::Released => MouseButtonState::Released,
        },
        x: p.x,
        y: p.y,
        modifiers: state.modifiers,
    }))
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

const LETTER_CODES: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
    KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
    KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
    KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
    KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [(KeyCode, Key); 10] = [
    (KeyCode::Digit0, Key::Digit0), (KeyCode::Digit1, Key::Digit1),
    (KeyCode::Digit2, Key::Digit2), (KeyCode::Digit3, Key::Digit3),
    (KeyCode::Digit4, Key::Digit4), (KeyCode::Digit5, Key::Digit5),
    (KeyCode::Digit6, Key::Digit6), (KeyCode::Digit7, Key::Digit7),
    (KeyCode::Digit8, Key::Digit8), (KeyCode::Digit9, Key::Digit9),
];

const FUNCTION_KEYS: [(KeyCode, Key); 12] = [
    (KeyCode::F1, Key::F1), (KeyCode::F2, Key::F2), (KeyCode::F3, Key::F3),
    (KeyCode::F4, Key::F4), (KeyCode::F5, Key::F5), (KeyCode::F6, Key::F6),
    (KeyCode::F7, Key::F7), (KeyCode::F8, Key::F8), (KeyCode::F9, Key::F9),
    (KeyCode::F10, Key::F10), (KeyCode::F11, Key::F11), (KeyCode::F12, Key::F12),
];

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    let PhysicalKey::Code(code) = pk else {
        // Native codes are platform-specific and not numeric in winit 0.30.
        return (Key::Unknown(0), 0);
    };

    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::Delete => Key::Delete,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        other => LETTER_CODES
            .iter()
            .position(|c| *c == other)
            .map(|i| LETTERS[i])
            .or_else(|| DIGITS.iter().chain(&FUNCTION_KEYS).find(|(c, _)| *c == other).map(|(_, k)| *k))
            .unwrap_or(Key::Unknown(other as u32)),
    };

    (key, code as u32)
}
