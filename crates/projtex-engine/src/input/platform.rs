use winit::event::ElementState;
use winit::keyboard::{Key as WinitKey, NamedKey, PhysicalKey};

use super::types::{Key, KeyEvent, KeyState};

/// Translates a winit keyboard event into the engine's `KeyEvent`.
pub(crate) fn translate_key_event(event: &winit::event::KeyEvent) -> KeyEvent {
    KeyEvent {
        key: map_key(&event.logical_key, event.physical_key),
        state: map_state(event.state),
        repeat: event.repeat,
    }
}

pub(crate) fn map_state(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    }
}

pub(crate) fn map_key(logical: &WinitKey, physical: PhysicalKey) -> Key {
    match logical {
        WinitKey::Named(named) => match named {
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Space,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::ArrowUp => Key::ArrowUp,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowRight => Key::ArrowRight,
            _ => unknown(physical),
        },
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(' '), None) => Key::Space,
                (Some(c), None) => Key::Char(c.to_lowercase().next().unwrap_or(c)),
                _ => unknown(physical),
            }
        }
        _ => unknown(physical),
    }
}

fn unknown(physical: PhysicalKey) -> Key {
    match physical {
        PhysicalKey::Code(code) => Key::Unknown(code as u32),
        // NativeKeyCode carries no portable numeric value.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}
