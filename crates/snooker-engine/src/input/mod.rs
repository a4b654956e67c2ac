pub mod queue;
pub mod shot;
