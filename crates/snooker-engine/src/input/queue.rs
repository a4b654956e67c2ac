use crate::rules::setup::Mode;

/// Input events the table understands. Coordinates are in table space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at (x, y).
    PointerDown { x: f32, y: f32 },
    /// Primary button released at (x, y).
    PointerUp { x: f32, y: f32 },
    /// Cursor moved to (x, y). Tracked for aiming.
    PointerMove { x: f32, y: f32 },
    /// A key was pressed. Digits `1`-`4` select a mode.
    KeyDown { key_code: u32 },
    /// Mode picked from the page rather than the keyboard.
    SelectMode { mode: Mode },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
