use glam::Vec2;

use crate::api::types::BodyId;
use crate::rules::balls::{Ball, BallColor, LiveBall};
use crate::rules::table::TableLayout;

/// Authoritative set of live balls plus the table they sit on.
/// Flat Vec storage: a snooker table never holds more than a couple dozen balls.
pub struct Registry {
    layout: TableLayout,
    balls: Vec<LiveBall>,
    pockets: Vec<BodyId>,
}

impl Registry {
    pub fn new(layout: TableLayout) -> Self {
        Self {
            layout,
            balls: Vec::with_capacity(32),
            pockets: Vec::with_capacity(6),
        }
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Record the body id of a pocket sensor.
    pub fn register_pocket(&mut self, id: BodyId) {
        if !self.pockets.contains(&id) {
            self.pockets.push(id);
        }
    }

    pub fn is_pocket(&self, id: BodyId) -> bool {
        self.pockets.contains(&id)
    }

    pub fn pocket_count(&self) -> usize {
        self.pockets.len()
    }

    /// Add a ball to the live set. A second cue ball is refused and the
    /// ball handed back, so at most one cue ball is ever live.
    pub fn insert(&mut self, ball: LiveBall) -> Result<(), LiveBall> {
        if ball.ball.is_cue() && self.cue().is_some() {
            return Err(ball);
        }
        self.balls.push(ball);
        Ok(())
    }

    /// Remove a ball by id. Returns the removed ball if it was live.
    pub fn remove(&mut self, id: BodyId) -> Option<LiveBall> {
        let idx = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.swap_remove(idx))
    }

    pub fn get(&self, id: BodyId) -> Option<&LiveBall> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn cue(&self) -> Option<&LiveBall> {
        self.balls.iter().find(|b| b.ball.is_cue())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveBall> {
        self.balls.iter()
    }

    pub fn count_color(&self, color: BallColor) -> usize {
        self.balls.iter().filter(|b| b.ball.color() == color).count()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Remove every ball, returning their ids so the host can drop the bodies.
    pub fn clear_balls(&mut self) -> Vec<BodyId> {
        self.balls.drain(..).map(|b| b.id).collect()
    }

    /// Home spot for a ball. Reds and the cue ball have none; the lookup
    /// logs and falls back to the origin.
    pub fn home_of(&self, ball: Ball) -> Vec2 {
        self.layout.home_positions().get_or_origin(ball.color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::TableConfig;

    fn registry() -> Registry {
        Registry::new(TableLayout::new(&TableConfig::default()))
    }

    fn live(id: u32, ball: Ball) -> LiveBall {
        LiveBall {
            id: BodyId(id),
            ball,
            spawn_pos: Vec2::ZERO,
            radius: 6.0,
        }
    }

    #[test]
    fn insert_get_remove() {
        let mut reg = registry();
        reg.insert(live(1, Ball::snooker(BallColor::Red))).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.get(BodyId(1)).is_some());
        assert!(reg.remove(BodyId(1)).is_some());
        assert!(reg.remove(BodyId(1)).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn only_one_cue_ball() {
        let mut reg = registry();
        reg.insert(live(1, Ball::Cue)).unwrap();
        let refused = reg.insert(live(2, Ball::Cue));
        assert_eq!(refused.map_err(|b| b.id), Err(BodyId(2)));
        assert_eq!(reg.cue().map(|b| b.id), Some(BodyId(1)));
    }

    #[test]
    fn pockets_are_tracked_separately() {
        let mut reg = registry();
        reg.register_pocket(BodyId(10));
        reg.register_pocket(BodyId(10));
        assert_eq!(reg.pocket_count(), 1);
        assert!(reg.is_pocket(BodyId(10)));
        assert!(reg.get(BodyId(10)).is_none());
    }

    #[test]
    fn clear_returns_all_ids() {
        let mut reg = registry();
        reg.insert(live(1, Ball::Cue)).unwrap();
        reg.insert(live(2, Ball::snooker(BallColor::Blue))).unwrap();
        let mut ids = reg.clear_balls();
        ids.sort();
        assert_eq!(ids, vec![BodyId(1), BodyId(2)]);
        assert!(reg.cue().is_none());
    }
}
