use glam::Vec2;

use crate::api::game::ShotConfig;

/// Cue charge: starts when the player presses on the cue ball, fires on release.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShotCharge {
    started_ms: Option<f64>,
}

impl ShotCharge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, now_ms: f64) {
        self.started_ms = Some(now_ms);
    }

    pub fn is_charging(&self) -> bool {
        self.started_ms.is_some()
    }

    /// Stop charging. Returns how long the cue was held, if it was.
    pub fn release(&mut self, now_ms: f64) -> Option<f64> {
        self.started_ms.take().map(|start| (now_ms - start).max(0.0))
    }

    /// Drop a charge without shooting (the cue ball went away).
    pub fn cancel(&mut self) {
        self.started_ms = None;
    }
}

/// Shot strength for a charge held `charged_ms`, clamped by both caps.
pub fn shot_magnitude(charged_ms: f64, config: &ShotConfig) -> f32 {
    (charged_ms as f32 * config.scale_per_ms)
        .min(config.power_cap)
        .min(config.force_cap)
}

/// Impulse for the cue ball: aimed from the ball towards the release point.
pub fn shot_impulse(cue_pos: Vec2, release: Vec2, charged_ms: f64, config: &ShotConfig) -> Vec2 {
    let d = release - cue_pos;
    let angle = d.y.atan2(d.x);
    Vec2::from_angle(angle) * shot_magnitude(charged_ms, config) * config.impulse_gain
}
