//! Seedable pseudo-random number generator (xorshift64) for ball placement.

use glam::Vec2;

use crate::rules::table::SafeArea;

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, so random layouts can be replayed from the config seed.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [min, max].
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform point inside `area`.
    pub fn point_in(&mut self, area: &SafeArea) -> Vec2 {
        let x = self.range(area.min.x, area.max.x);
        let y = self.range(area.min.y, area.max.y);
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_deterministic() {
        let mut rng1 = Rng::new(42);
        let mut rng2 = Rng::new(42);
        for _ in 0..10 {
            assert_eq!(rng1.next_f32(), rng2.next_f32());
        }
    }

    #[test]
    fn rng_zero_seed_handled() {
        let mut rng = Rng::new(0);
        let v = rng.next_f32();
        assert!((0.0..1.0).contains(&v));
    }

    #[test]
    fn points_stay_inside_area() {
        let area = SafeArea {
            min: Vec2::new(40.0, 40.0),
            max: Vec2::new(760.0, 360.0),
        };
        let mut rng = Rng::new(7);
        for _ in 0..500 {
            assert!(area.contains(rng.point_in(&area)));
        }
    }
}
