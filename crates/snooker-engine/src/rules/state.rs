use glam::Vec2;

use crate::api::game::{GameConfig, RulesConfig};
use crate::api::types::BodyId;
use crate::core::time::Timestamp;
use crate::rules::alerts::{Alert, AlertFeed};
use crate::rules::balls::{Ball, BallColor, LiveBall, COLOR_ORDER};
use crate::rules::error::RulesError;
use crate::rules::registry::Registry;
use crate::rules::respawn::{PendingRespawn, RespawnQueue};
use crate::rules::rng::Rng;
use crate::rules::setup::{configure, Mode};
use crate::rules::table::TableLayout;

/// Instructions from the rules to the physics/presentation host.
/// Drained once per tick and applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    RemoveBody(BodyId),
    AddBody {
        id: BodyId,
        ball: Ball,
        pos: Vec2,
        radius: f32,
    },
    ScoreChanged(i32),
    AlertRaised(String),
    ModeChanged(Mode),
    BallPocketed {
        color: BallColor,
        respawning: bool,
    },
    /// Play one of the [`HIT_SOUND_POOL`] hit-sound buffers.
    PlayHitSound(u32),
}

/// Number of hit-sound buffers, played round-robin so quick successive
/// strikes overlap instead of cutting each other off.
pub const HIT_SOUND_POOL: u32 = 3;

/// Every piece of mutable rules state, owned in one place.
/// Rules functions take `&mut GameState`; nothing lives in globals.
pub struct GameState {
    rules: RulesConfig,
    registry: Registry,
    mode: Mode,
    score: i32,
    reds_remaining: u32,
    expected_index: usize,
    /// Bumped on every mode switch. Respawns from an older epoch are dropped.
    epoch: u32,
    last_pocketed: Option<BallColor>,
    respawns: RespawnQueue,
    alerts: AlertFeed,
    rng: Rng,
    next_id: u32,
    next_hit_sound: u32,
    commands: Vec<HostCommand>,
}

impl GameState {
    /// An empty table in regular mode. Call [`GameState::switch_mode`] to rack up.
    pub fn new(config: &GameConfig) -> Self {
        let rules = config.rules;
        Self {
            rules,
            registry: Registry::new(TableLayout::new(&config.table)),
            mode: Mode::Regular,
            score: 0,
            reds_remaining: rules.number_of_balls,
            expected_index: 0,
            epoch: 0,
            last_pocketed: None,
            respawns: RespawnQueue::new(),
            alerts: AlertFeed::new(rules.alert_capacity, rules.alert_ttl_ms),
            rng: Rng::new(config.seed),
            next_id: 1,
            next_hit_sound: 0,
            commands: Vec::with_capacity(32),
        }
    }

    /// Generate the next unique body id. Balls, pockets and cushions share
    /// one id space.
    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    // -- Read access --

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn reds_remaining(&self) -> u32 {
        self.reds_remaining
    }

    pub fn expected_color_index(&self) -> usize {
        self.expected_index
    }

    pub fn expected_color(&self) -> BallColor {
        COLOR_ORDER[self.expected_index]
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn last_pocketed(&self) -> Option<BallColor> {
        self.last_pocketed
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn layout(&self) -> &TableLayout {
        self.registry.layout()
    }

    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    /// Alerts still on screen at wall-clock `now_ms`.
    pub fn alerts(&self, now_ms: f64) -> impl Iterator<Item = &Alert> {
        self.alerts.visible(now_ms)
    }

    pub fn has_cue_ball(&self) -> bool {
        self.registry.cue().is_some()
    }

    /// Take the commands queued since the last drain.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    // -- Table setup --

    /// Register a pocket sensor body so the classifier can recognise it.
    pub fn register_pocket(&mut self, id: BodyId) {
        self.registry.register_pocket(id);
    }

    /// Clear the table, reset score, reds and colour order, and lay out `mode`.
    /// Switching to the current mode again is a full reset as well.
    pub fn switch_mode(&mut self, mode: Mode) {
        for id in self.registry.clear_balls() {
            self.commands.push(HostCommand::RemoveBody(id));
        }
        self.epoch = self.epoch.wrapping_add(1);

        let setup = configure(mode, self.registry.layout(), &self.rules, &mut self.rng);
        self.mode = mode;
        self.score = 0;
        self.reds_remaining = setup.reds_remaining;
        self.expected_index = 0;
        self.last_pocketed = None;

        for placement in setup.placements {
            self.spawn(placement.ball, placement.pos);
        }

        log::info!(
            "Mode {} set up: {} balls, {} reds (epoch {})",
            mode.number(),
            self.registry.len(),
            self.reds_remaining,
            self.epoch
        );
        self.commands.push(HostCommand::ModeChanged(mode));
        self.commands.push(HostCommand::ScoreChanged(self.score));
    }

    /// Put the cue ball down by hand. Refused while one is already on the table.
    pub fn place_cue_ball(&mut self, pos: Vec2) -> Option<BodyId> {
        if self.has_cue_ball() {
            return None;
        }
        self.spawn(Ball::Cue, pos)
    }

    /// Run every respawn that has fallen due and expire old alerts.
    pub fn fire_due_respawns(&mut self, now: Timestamp) {
        for respawn in self.respawns.take_due(now.game_ms) {
            if respawn.epoch != self.epoch {
                log::debug!("Dropping {:?} respawn from epoch {}", respawn.ball, respawn.epoch);
                continue;
            }
            if respawn.ball.is_cue() && self.has_cue_ball() {
                log::warn!("Cue ball already placed, dropping scheduled respawn");
                continue;
            }
            if let Some(id) = self.spawn(respawn.ball, respawn.pos) {
                log::info!("{} ball respawned as {:?} at {:?}", respawn.ball.color().name(), id, respawn.pos);
            }
        }
        self.alerts.expire(now.wall_ms);
    }

    /// The cue ball struck a snooker ball.
    pub fn cue_strike(&mut self) {
        let sound = self.next_hit_sound;
        self.next_hit_sound = (sound + 1) % HIT_SOUND_POOL;
        self.commands.push(HostCommand::PlayHitSound(sound));
    }

    // -- Mutations used by the pocketing rules --

    pub(crate) fn spawn(&mut self, ball: Ball, pos: Vec2) -> Option<BodyId> {
        let id = self.next_id();
        let radius = self.registry.layout().ball_radius;
        let live = LiveBall {
            id,
            ball,
            spawn_pos: pos,
            radius,
        };
        match self.registry.insert(live) {
            Ok(()) => {
                self.commands.push(HostCommand::AddBody { id, ball, pos, radius });
                Some(id)
            }
            Err(refused) => {
                log::warn!("Refused to spawn a second cue ball at {:?}", refused.spawn_pos);
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, id: BodyId) -> Option<LiveBall> {
        let ball = self.registry.remove(id)?;
        self.commands.push(HostCommand::RemoveBody(id));
        Some(ball)
    }

    /// Apply a score change and re-publish the score. An update that would
    /// overflow is rejected and logged; the previous score stands.
    pub(crate) fn adjust_score(&mut self, delta: i32) {
        match self.score.checked_add(delta).ok_or(RulesError::InvalidScore {
            current: self.score,
            delta,
        }) {
            Ok(score) => self.score = score,
            Err(e) => log::error!("{}", e),
        }
        self.commands.push(HostCommand::ScoreChanged(self.score));
    }

    pub(crate) fn raise_alert(&mut self, message: &str, now: Timestamp) {
        let text = self.alerts.push(message, now);
        log::info!("Alert: {}", text);
        self.commands.push(HostCommand::AlertRaised(text));
    }

    pub(crate) fn schedule_respawn(&mut self, ball: Ball, pos: Vec2, now: Timestamp) {
        self.respawns.schedule(PendingRespawn {
            ball,
            pos,
            due_ms: now.game_ms + self.rules.respawn_delay_ms,
            epoch: self.epoch,
        });
    }

    pub(crate) fn advance_expected_color(&mut self) {
        self.expected_index = (self.expected_index + 1) % COLOR_ORDER.len();
    }

    pub(crate) fn pot_red(&mut self) {
        self.reds_remaining = self.reds_remaining.saturating_sub(1);
    }

    pub(crate) fn record_pocketed(&mut self, color: BallColor, respawning: bool) {
        self.last_pocketed = Some(color);
        self.commands.push(HostCommand::BallPocketed { color, respawning });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(&GameConfig::default())
    }

    fn at(ms: f64) -> Timestamp {
        Timestamp {
            game_ms: ms,
            wall_ms: ms,
        }
    }

    #[test]
    fn switch_mode_resets_everything() {
        let mut s = state();
        s.switch_mode(Mode::Regular);
        s.adjust_score(-9);
        s.pot_red();
        s.advance_expected_color();
        s.switch_mode(Mode::Regular);
        assert_eq!(s.score(), 0);
        assert_eq!(s.reds_remaining(), 15);
        assert_eq!(s.expected_color_index(), 0);
        assert_eq!(s.registry().len(), 21);
        assert!(!s.has_cue_ball());
    }

    #[test]
    fn switching_twice_matches_switching_once() {
        let mut once = state();
        once.switch_mode(Mode::ColorsOnly);
        let mut twice = state();
        twice.switch_mode(Mode::ColorsOnly);
        twice.switch_mode(Mode::ColorsOnly);

        assert_eq!(once.score(), twice.score());
        assert_eq!(once.reds_remaining(), twice.reds_remaining());
        assert_eq!(once.expected_color_index(), twice.expected_color_index());
        let spots = |s: &GameState| {
            let mut v: Vec<_> = s.registry().iter().map(|b| (b.ball.color().index(), b.spawn_pos.x as i32, b.spawn_pos.y as i32)).collect();
            v.sort();
            v
        };
        assert_eq!(spots(&once), spots(&twice));
    }

    #[test]
    fn switch_mode_removes_old_bodies() {
        let mut s = state();
        s.switch_mode(Mode::ColorsOnly);
        let cue = s.place_cue_ball(Vec2::new(100.0, 100.0)).unwrap();
        s.drain_commands();
        s.switch_mode(Mode::RedsOnly);
        let cmds = s.drain_commands();
        let removed = cmds.iter().filter(|c| matches!(c, HostCommand::RemoveBody(_))).count();
        assert_eq!(removed, 7);
        assert!(cmds.contains(&HostCommand::RemoveBody(cue)));
        assert!(cmds.contains(&HostCommand::ModeChanged(Mode::RedsOnly)));
    }

    #[test]
    fn stale_respawn_is_a_no_op() {
        let mut s = state();
        s.switch_mode(Mode::Regular);
        s.schedule_respawn(Ball::snooker(BallColor::Pink), Vec2::new(10.0, 10.0), at(0.0));
        s.switch_mode(Mode::RedsOnly);
        s.fire_due_respawns(at(1_000.0));
        assert_eq!(s.registry().count_color(BallColor::Pink), 0);
        assert_eq!(s.pending_respawns(), 0);
    }

    #[test]
    fn second_cue_ball_is_refused() {
        let mut s = state();
        assert!(s.place_cue_ball(Vec2::new(100.0, 100.0)).is_some());
        assert!(s.place_cue_ball(Vec2::new(120.0, 100.0)).is_none());
        assert_eq!(s.registry().count_color(BallColor::White), 1);
    }

    #[test]
    fn overflowing_score_is_rejected() {
        let mut s = state();
        s.adjust_score(i32::MAX);
        s.adjust_score(1);
        assert_eq!(s.score(), i32::MAX);
        let last = s.drain_commands().pop();
        assert_eq!(last, Some(HostCommand::ScoreChanged(i32::MAX)));
    }

    #[test]
    fn hit_sounds_cycle_through_the_pool() {
        let mut s = state();
        for _ in 0..4 {
            s.cue_strike();
        }
        let sounds: Vec<_> = s
            .drain_commands()
            .into_iter()
            .filter_map(|c| match c {
                HostCommand::PlayHitSound(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(sounds, vec![0, 1, 2, 0]);
    }

    #[test]
    fn alerts_expire_on_tick() {
        let mut s = state();
        s.raise_alert("Foul", at(0.0));
        assert_eq!(s.alerts(1_000.0).count(), 1);
        s.fire_due_respawns(at(30_000.0));
        assert_eq!(s.alerts(30_000.0).count(), 0);
    }

    #[test]
    fn alerts_expire_by_the_wall_clock() {
        let mut s = state();
        s.switch_mode(Mode::Regular);
        s.raise_alert("Foul", at(0.0));
        s.schedule_respawn(Ball::snooker(BallColor::Blue), Vec2::new(399.0, 199.5), at(0.0));
        // 31 s on the wall, barely any game time
        let late = Timestamp { game_ms: 100.0, wall_ms: 31_000.0 };
        s.fire_due_respawns(late);
        assert_eq!(s.alerts(late.wall_ms).count(), 0);
        // Respawns still wait for game time
        assert_eq!(s.pending_respawns(), 1);
    }
}
