//! The table host: owns the rules state and the Rapier world and keeps them
//! in step.

use glam::Vec2;

use crate::api::game::GameConfig;
use crate::api::types::{event_kind, BodyId, GameEvent, SoundEvent};
use crate::bridge::protocol::BallBuffer;
use crate::core::physics::{CollisionPair, PhysicsWorld};
use crate::core::time::{GameClock, Timestamp};
use crate::input::queue::InputEvent;
use crate::input::shot::{shot_impulse, ShotCharge};
use crate::rules::classify::{classify, Contact};
use crate::rules::pocketing::on_ball_pocketed;
use crate::rules::setup::Mode;
use crate::rules::state::{GameState, HostCommand};

pub struct SnookerGame {
    config: GameConfig,
    state: GameState,
    physics: PhysicsWorld,
    clock: GameClock,
    charge: ShotCharge,
    pointer: Vec2,
    cue_present: bool,
    collisions: Vec<CollisionPair>,
    sounds: Vec<SoundEvent>,
    events: Vec<GameEvent>,
}

impl SnookerGame {
    /// `wall_ms` is the wall-clock time at startup.
    pub fn new(config: GameConfig, wall_ms: f64) -> Self {
        let mut physics = PhysicsWorld::new();
        physics.set_dt(config.fixed_dt / config.physics_substeps.max(1) as f32);
        Self {
            state: GameState::new(&config),
            physics,
            clock: GameClock::new(wall_ms),
            charge: ShotCharge::new(),
            pointer: Vec2::ZERO,
            cue_present: false,
            collisions: Vec::with_capacity(32),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            config,
        }
    }

    /// Build the static table and rack up the regular game.
    pub fn init(&mut self) {
        let layout = self.state.layout().clone();
        for cushion in layout.cushions() {
            let id = self.state.next_id();
            self.physics
                .create_cushion(id, cushion.center, cushion.half_extents, &self.config.physics);
        }
        for pocket in &layout.pockets {
            let id = self.state.next_id();
            self.physics.create_pocket_sensor(id, pocket.center, pocket.sensor_radius);
            self.state.register_pocket(id);
        }
        log::info!(
            "Table {}x{} ready: {} pockets",
            layout.width,
            layout.height,
            self.state.registry().pocket_count()
        );

        self.state.switch_mode(Mode::Regular);
        self.apply_commands();
        self.publish_cue_presence();
    }

    /// Record the host's wall-clock reading. Alerts are stamped and expired
    /// against it; everything else runs on simulated time.
    pub fn set_wall_clock(&mut self, wall_ms: f64) {
        self.clock.set_wall_clock(wall_ms);
    }

    /// Run one fixed tick. Input is applied before the physics substeps.
    pub fn update(&mut self, input: &[InputEvent]) {
        self.clock.advance(self.config.fixed_dt);
        let now = self.clock.now();

        self.state.fire_due_respawns(now);
        self.apply_commands();

        for event in input {
            self.handle_input(*event, now);
            self.apply_commands();
        }

        for _ in 0..self.config.physics_substeps.max(1) {
            self.collisions.clear();
            self.physics.step_into(&mut self.collisions);
            self.resolve_collisions(now);
            self.apply_commands();
        }

        if !self.state.has_cue_ball() {
            self.charge.cancel();
        }
        self.publish_cue_presence();
    }

    fn handle_input(&mut self, event: InputEvent, now: Timestamp) {
        match event {
            InputEvent::KeyDown { key_code } => {
                if let Some(mode) = Mode::from_key_code(key_code) {
                    self.select_mode(mode);
                }
            }
            InputEvent::SelectMode { mode } => self.select_mode(mode),
            InputEvent::PointerMove { x, y } => self.pointer = Vec2::new(x, y),
            InputEvent::PointerDown { x, y } => {
                let at = Vec2::new(x, y);
                self.pointer = at;
                match self.state.registry().cue().map(|b| (b.id, b.radius)) {
                    None => {
                        if let Some(id) = self.state.place_cue_ball(at) {
                            log::info!("Cue ball placed as {:?} at {:?}", id, at);
                        }
                    }
                    Some((id, radius)) => {
                        let on_ball = self
                            .physics
                            .body_position(id)
                            .is_some_and(|pos| pos.distance(at) < radius);
                        if on_ball {
                            self.charge.begin(now.game_ms);
                        }
                    }
                }
            }
            InputEvent::PointerUp { x, y } => {
                let release = Vec2::new(x, y);
                self.pointer = release;
                let Some(charged_ms) = self.charge.release(now.game_ms) else {
                    return;
                };
                let Some(cue) = self.state.registry().cue().map(|b| b.id) else {
                    return;
                };
                if let Some(pos) = self.physics.body_position(cue) {
                    let impulse = shot_impulse(pos, release, charged_ms, &self.config.shot);
                    log::debug!("Shot after {:.0} ms: {:?}", charged_ms, impulse);
                    self.physics.apply_impulse(cue, impulse);
                }
            }
        }
    }

    fn select_mode(&mut self, mode: Mode) {
        self.charge.cancel();
        self.state.switch_mode(mode);
    }

    fn resolve_collisions(&mut self, now: Timestamp) {
        let collisions = std::mem::take(&mut self.collisions);
        for pair in collisions.iter().filter(|c| c.started) {
            match classify(pair.body_a, pair.body_b, self.state.registry()) {
                Contact::Pocketed { ball, .. } => {
                    on_ball_pocketed(&mut self.state, ball, now);
                }
                Contact::CueStrike => self.state.cue_strike(),
                Contact::NotRelevant => {}
            }
        }
        self.collisions = collisions;
    }

    /// Carry out what the rules asked for.
    fn apply_commands(&mut self) {
        for command in self.state.drain_commands() {
            match command {
                HostCommand::RemoveBody(id) => {
                    self.physics.remove_body(id);
                }
                HostCommand::AddBody { id, pos, radius, .. } => {
                    self.physics.create_ball(id, pos, radius, &self.config.physics);
                }
                HostCommand::ScoreChanged(score) => {
                    self.emit_event(GameEvent::new(event_kind::SCORE_CHANGED, score as f32));
                }
                HostCommand::AlertRaised(_) => {
                    self.emit_event(GameEvent::new(event_kind::ALERT_RAISED, 0.0));
                }
                HostCommand::ModeChanged(mode) => {
                    self.emit_event(GameEvent::new(event_kind::MODE_CHANGED, mode.number() as f32));
                }
                HostCommand::BallPocketed { color, respawning } => {
                    self.emit_event(GameEvent {
                        kind: event_kind::BALL_POCKETED,
                        a: color.index() as f32,
                        b: if respawning { 1.0 } else { 0.0 },
                        c: 0.0,
                    });
                }
                HostCommand::PlayHitSound(n) => {
                    if self.sounds.len() < self.config.max_sounds {
                        self.sounds.push(SoundEvent(n));
                    }
                }
            }
        }
    }

    fn publish_cue_presence(&mut self) {
        let present = self.state.has_cue_ball();
        if present != self.cue_present {
            self.cue_present = present;
            self.emit_event(GameEvent::new(event_kind::CUE_BALL_PRESENT, if present { 1.0 } else { 0.0 }));
        }
    }

    fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.config.max_events {
            self.events.push(event);
        } else {
            log::warn!("Event buffer full, dropping event kind {}", event.kind);
        }
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    // -- Read access for the bridge --

    /// Write every live ball at its current physics position.
    pub fn write_balls(&self, out: &mut BallBuffer) {
        out.clear();
        for ball in self.state.registry().iter() {
            let Some(pos) = self.physics.body_position(ball.id) else {
                continue;
            };
            if !out.push(pos, ball.radius, ball.ball.color()) {
                log::warn!("Ball buffer full, {} balls not drawn", self.state.registry().len() - out.len());
                break;
            }
        }
    }

    /// Visible alerts, oldest first, one per line.
    pub fn alerts_text(&self) -> String {
        let now = self.clock.now().wall_ms;
        self.state
            .alerts(now)
            .map(|a| a.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> i32 {
        self.state.score()
    }

    pub fn has_cue_ball(&self) -> bool {
        self.state.has_cue_ball()
    }

    pub fn is_charging(&self) -> bool {
        self.charge.is_charging()
    }

    /// Last known pointer position, for drawing the cue.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn ball_position(&self, id: BodyId) -> Option<Vec2> {
        self.physics.body_position(id)
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
