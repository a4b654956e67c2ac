pub mod api;
pub mod core;
pub mod rules;
pub mod bridge;
pub mod input;
#[cfg(feature = "physics")]
pub mod game;

// Re-export key types at crate root for convenience
pub use api::game::{GameConfig, TableConfig, RulesConfig, ShotConfig, PhysicsConfig};
pub use api::types::{BodyId, SoundEvent, GameEvent, event_kind};
pub use core::time::{FixedTimestep, GameClock, Timestamp};
pub use input::queue::{InputEvent, InputQueue};
pub use input::shot::{ShotCharge, shot_magnitude, shot_impulse};
pub use bridge::protocol::{ProtocolLayout, BallBuffer, BALL_FLOATS, EVENT_FLOATS, PROTOCOL_VERSION};
pub use rules::balls::{Ball, BallColor, COLOR_ORDER};
pub use rules::classify::{classify, Contact};
pub use rules::error::RulesError;
pub use rules::pocketing::{on_ball_pocketed, on_cue_ball_pocketed};
pub use rules::setup::{configure, Mode, ModeSetup};
pub use rules::state::{GameState, HostCommand, HIT_SOUND_POOL};
pub use rules::table::TableLayout;

#[cfg(feature = "physics")]
pub use core::physics::{PhysicsWorld, CollisionPair};
#[cfg(feature = "physics")]
pub use game::SnookerGame;
