use bytemuck::{Pod, Zeroable};

/// Identifier shared by a table body (ball, pocket sensor or cushion) and
/// its Rapier rigid body. Stored in the body's `user_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// A sound event emitted by the game logic.
/// The value is the index of the hit-sound buffer the browser should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// A game event communicated from Rust to JavaScript.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

/// Game event kinds sent to the page.
pub mod event_kind {
    /// `a` = new score.
    pub const SCORE_CHANGED: f32 = 1.0;
    /// `a` = mode number (1-4).
    pub const MODE_CHANGED: f32 = 2.0;
    /// `a` = ball colour index, `b` = 1.0 when it will be respawned.
    pub const BALL_POCKETED: f32 = 3.0;
    /// `a` = 1.0 when a cue ball is on the table, 0.0 while it awaits placement.
    pub const CUE_BALL_PRESENT: f32 = 4.0;
    /// An alert was raised; the page should re-read the alert text.
    pub const ALERT_RAISED: f32 = 5.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
        let ev = GameEvent::new(event_kind::SCORE_CHANGED, -4.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&ev));
        assert_eq!(floats, &[1.0, -4.0, 0.0, 0.0]);
    }
}
