//! Input events shared by the carousel and flip-card state machines.

/// Keys the interactive components react to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// - `"ArrowLeft"` → `ArrowLeft`
    /// - `" "` or `"Spacebar"` → `Space`
    /// - `"a"` → `Other`
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Pointer device. Drags are handled the same for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}
