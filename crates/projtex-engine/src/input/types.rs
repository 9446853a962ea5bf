use std::fmt;

/// Keyboard key identifier.
///
/// Only keys with a stable meaning across layouts get their own variant.
/// Printable keys are reported as `Char` (lowercased); everything else keeps
/// the platform key code in `Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Char(char),

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A single key transition delivered to the application.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
    /// True when the event is an auto-repeat.
    pub repeat: bool,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "'{c}'"),
            Key::Unknown(code) => write!(f, "key#{code}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(Key::Char('q').to_string(), "'q'");
        assert_eq!(Key::Escape.to_string(), "Escape");
        assert_eq!(Key::Unknown(42).to_string(), "key#42");
    }
}
