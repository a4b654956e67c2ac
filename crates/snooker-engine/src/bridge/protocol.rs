//! Frame data layout shared with the page.
//! Must stay in sync with the TypeScript reader.
//!
//! Each section is a flat array exposed through its own pointer:
//! ```text
//! [Balls:  max_balls × 4 floats]   x, y, radius, colour index
//! [Sounds: max_sounds × 1 byte]    hit-sound buffer index
//! [Events: max_events × 4 floats]  kind, a, b, c
//! ```
//!
//! Capacities come from [`GameConfig`]; the page reads them once at init.

use glam::Vec2;

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::rules::balls::BallColor;

/// Protocol version reported to the page.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball: x, y, radius, colour index (wire format, fixed).
pub const BALL_FLOATS: usize = 4;

/// Floats per game event: kind, a, b, c (wire format, fixed).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed section sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_balls: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    /// Size of the ball section in floats.
    pub ball_data_floats: usize,
    /// Size of the event section in floats.
    pub event_data_floats: usize,
}

impl ProtocolLayout {
    pub fn new(max_balls: usize, max_sounds: usize, max_events: usize) -> Self {
        Self {
            max_balls,
            max_sounds,
            max_events,
            ball_data_floats: max_balls * BALL_FLOATS,
            event_data_floats: max_events * EVENT_FLOATS,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_balls, config.max_sounds, config.max_events)
    }
}

/// Flat ball buffer, rebuilt every frame.
#[derive(Debug, Clone, Default)]
pub struct BallBuffer {
    data: Vec<f32>,
    capacity: usize,
}

impl BallBuffer {
    pub fn with_capacity(max_balls: usize) -> Self {
        Self {
            data: Vec::with_capacity(max_balls * BALL_FLOATS),
            capacity: max_balls,
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Append one ball. Returns `false` once the buffer is full.
    pub fn push(&mut self, pos: Vec2, radius: f32, color: BallColor) -> bool {
        if self.len() >= self.capacity {
            return false;
        }
        self.data
            .extend_from_slice(&[pos.x, pos.y, radius, color.index() as f32]);
        true
    }

    /// Number of balls written.
    pub fn len(&self) -> usize {
        self.data.len() / BALL_FLOATS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}
