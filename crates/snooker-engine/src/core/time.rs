use std::fmt;

use chrono::{DateTime, Local, TimeZone};

/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// A point in time as the rules see it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp {
    /// Milliseconds of simulated time since the game started. Drives respawn
    /// delays and shot charging.
    pub game_ms: f64,
    /// Wall-clock milliseconds since the Unix epoch, as last read by the host.
    /// Labels alerts and drives their expiry.
    pub wall_ms: f64,
}

/// Game clock advanced by the fixed timestep, paired with the host's reading
/// of the real clock.
///
/// Simulated time falls behind real time when frames are slow (the timestep
/// caps the steps per frame), so anything the player times by the clock on
/// the wall must use `wall_ms`.
#[derive(Debug, Clone)]
pub struct GameClock {
    elapsed_ms: f64,
    wall_ms: f64,
}

impl GameClock {
    /// `wall_ms` is the wall-clock time at which the game started.
    pub fn new(wall_ms: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            wall_ms,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_ms += dt as f64 * 1000.0;
    }

    /// Record the host's current wall-clock reading. Called once per frame.
    pub fn set_wall_clock(&mut self, wall_ms: f64) {
        self.wall_ms = wall_ms;
    }

    pub fn now(&self) -> Timestamp {
        Timestamp {
            game_ms: self.elapsed_ms,
            wall_ms: self.wall_ms,
        }
    }
}

/// Format wall-clock milliseconds as `HH:MM:SS` in the given time zone.
pub fn format_time_of_day<Tz: TimeZone>(wall_ms: f64, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match DateTime::from_timestamp_millis(wall_ms as i64) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M:%S").to_string(),
        None => {
            log::warn!("Wall clock {} ms out of range", wall_ms);
            "--:--:--".to_owned()
        }
    }
}

/// Format wall-clock milliseconds as the player's local `HH:MM:SS`.
pub fn format_local_time(wall_ms: f64) -> String {
    format_time_of_day(wall_ms, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn clock_keeps_game_and_wall_time_apart() {
        let mut clock = GameClock::new(1_000.0);
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        let now = clock.now();
        assert!((now.game_ms - 1000.0).abs() < 0.1);
        // Wall time only moves when the host says so
        assert_eq!(now.wall_ms, 1_000.0);
        clock.set_wall_clock(45_000.0);
        assert_eq!(clock.now().wall_ms, 45_000.0);
        assert_eq!(clock.now().game_ms, now.game_ms);
    }

    #[test]
    fn time_of_day_follows_the_zone() {
        // 13:05:09 UTC on some day
        let ms = ((13 * 3600 + 5 * 60 + 9) as f64 + 86_400.0 * 3.0) * 1000.0;
        assert_eq!(format_time_of_day(ms, &chrono::Utc), "13:05:09");
        let bst = chrono::FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_time_of_day(ms, &bst), "14:05:09");
        let behind = chrono::FixedOffset::west_opt(14 * 3600).unwrap();
        assert_eq!(format_time_of_day(ms, &behind), "23:05:09");
    }

    #[test]
    fn local_time_is_hh_mm_ss() {
        let text = format_local_time(1_700_000_000_000.0);
        assert_eq!(text.len(), 8);
        assert_eq!(text.matches(':').count(), 2);
    }
}
