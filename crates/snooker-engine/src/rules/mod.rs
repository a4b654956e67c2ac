//! The snooker rules layer. Pure state transitions over [`state::GameState`];
//! nothing here touches the physics world directly.

pub mod alerts;
pub mod balls;
pub mod classify;
pub mod error;
pub mod pocketing;
pub mod registry;
pub mod respawn;
pub mod rng;
pub mod setup;
pub mod state;
pub mod table;
