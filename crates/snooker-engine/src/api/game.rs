use serde::{Deserialize, Serialize};

/// Configuration for the table, provided once at startup.
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Physics steps per fixed tick. Small balls need a few substeps so
    /// fast shots do not tunnel past the pocket sensors.
    pub physics_substeps: u32,
    /// Seed for random ball placement in modes 2 and 3.
    pub seed: u64,
    /// Ball capacity of the bridge buffer.
    pub max_balls: usize,
    /// Maximum sound events per frame.
    pub max_sounds: usize,
    /// Maximum game events per frame.
    pub max_events: usize,
    pub table: TableConfig,
    pub rules: RulesConfig,
    pub shot: ShotConfig,
    pub physics: PhysicsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            physics_substeps: 4,
            seed: 0x5EED_CAFE,
            max_balls: 32,
            max_sounds: 16,
            max_events: 32,
            table: TableConfig::default(),
            rules: RulesConfig::default(),
            shot: ShotConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a config, falling back to the defaults when the document is malformed.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid game config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

/// Table geometry. Height is always half the width (2:1 table).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table width in world units (canvas pixels).
    pub width: f32,
    /// Wooden frame width, used to place the black spot.
    pub frame_width: f32,
    /// Cushion thickness; the play area starts this far in from each edge.
    pub cushion_thickness: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: 798.0,
            frame_width: 10.0,
            cushion_thickness: 20.0,
        }
    }
}

/// Scoring and timing constants for the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Ball count for the rack and the random layouts (cue ball excluded).
    pub number_of_balls: u32,
    /// Delay before a pocketed colour or cue ball reappears.
    pub respawn_delay_ms: f64,
    /// Points lost for potting the wrong ball.
    pub foul_penalty: i32,
    /// Points lost for potting the cue ball.
    pub cue_ball_penalty: i32,
    /// Maximum alerts shown at once.
    pub alert_capacity: usize,
    /// Alert lifetime.
    pub alert_ttl_ms: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            number_of_balls: 15,
            respawn_delay_ms: 500.0,
            foul_penalty: 4,
            cue_ball_penalty: 1,
            alert_capacity: 4,
            alert_ttl_ms: 30_000.0,
        }
    }
}

/// Cue power constants.
/// Magnitude = `min(charged_ms * scale_per_ms, power_cap, force_cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub scale_per_ms: f32,
    pub power_cap: f32,
    pub force_cap: f32,
    /// Converts the capped magnitude into a Rapier impulse.
    pub impulse_gain: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            scale_per_ms: 0.0003,
            power_cap: 5.0,
            force_cap: 0.5,
            impulse_gain: 4000.0,
        }
    }
}

/// Material and damping for balls and cushions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub ball_restitution: f32,
    pub ball_friction: f32,
    pub ball_density: f32,
    /// Felt friction (higher = balls stop faster).
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub cushion_restitution: f32,
    pub cushion_friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_restitution: 0.9,
            ball_friction: 0.05,
            ball_density: 0.01,
            linear_damping: 1.2,
            angular_damping: 1.0,
            cushion_restitution: 0.8,
            cushion_friction: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = GameConfig::default();
        assert_eq!(config.table.width, 798.0);
        assert_eq!(config.rules.number_of_balls, 15);
        assert_eq!(config.rules.respawn_delay_ms, 500.0);
        assert_eq!(config.rules.alert_capacity, 4);
        assert_eq!(config.rules.alert_ttl_ms, 30_000.0);
        assert_eq!(config.rules.foul_penalty, 4);
        assert_eq!(config.rules.cue_ball_penalty, 1);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "seed": 7,
            "rules": { "respawn_delay_ms": 250.0 },
            "table": { "width": 1000.0 }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.rules.respawn_delay_ms, 250.0);
        assert_eq!(config.rules.number_of_balls, 15);
        assert_eq!(config.table.width, 1000.0);
        assert_eq!(config.table.cushion_thickness, 20.0);
        assert_eq!(config.shot, ShotConfig::default());
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let config = GameConfig::from_json_or_default("{ not json");
        assert_eq!(config, GameConfig::default());
    }
}
