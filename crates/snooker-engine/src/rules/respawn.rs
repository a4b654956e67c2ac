use glam::Vec2;

use crate::rules::balls::Ball;

/// A pocketed ball waiting to come back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRespawn {
    pub ball: Ball,
    pub pos: Vec2,
    pub due_ms: f64,
    /// Mode epoch the respawn was scheduled in.
    pub epoch: u32,
}

/// Deferred respawns. Each entry is an independent timer; no order is
/// promised between entries that fall due in the same tick.
#[derive(Debug, Clone, Default)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, respawn: PendingRespawn) {
        self.pending.push(respawn);
    }

    /// Remove and return every entry due at or before `now_ms`.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<PendingRespawn> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|r| r.due_ms <= now_ms);
        self.pending = waiting;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
