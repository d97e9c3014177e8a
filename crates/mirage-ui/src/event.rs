use mirage_engine::coords::Vec2;
use mirage_engine::input::Key;

pub use mirage_engine::input::Modifiers;

/// Input events routed through the widget tree.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Primary button pressed and released without moving past the drag
    /// threshold.
    Click { pos: Vec2 },
    /// Pointer position, sent every frame.
    Hover { pos: Vec2 },
    /// Pointer moved while the primary button is held. `start` is the press
    /// position, `delta` the motion since the previous drag event.
    Drag { pos: Vec2, start: Vec2, delta: Vec2 },
    /// Primary button released after a drag. Sent even when `pos` is outside
    /// the widget; check `rect.contains(start)` for ownership.
    DragEnd { pos: Vec2, start: Vec2 },
    KeyPress { key: Key, modifiers: Modifiers },
    /// Sent last every frame. Containers stop at the first `Consumed`, so
    /// widgets reacting to this must return `Ignored`.
    Frame { dt: f32, elapsed: f32, keys_down: Vec<Key> },
}

impl UiEvent {
    /// Where a pointer interaction began: the click position or the press
    /// that started a drag.
    pub fn pointer_origin(&self) -> Option<Vec2> {
        match self {
            UiEvent::Click { pos } => Some(*pos),
            UiEvent::Drag { start, .. } | UiEvent::DragEnd { start, .. } => Some(*start),
            _ => None,
        }
    }
}

/// Result returned by `Widget::on_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}
