use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::game::PhysicsConfig;
use crate::api::types::BodyId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Handle pair for one table body, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct TableBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two table bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match self.collisions.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Rapier2D world for a top-down table: no gravity, damped balls, static
/// cushions and sensor pockets. Bodies are addressed by [`BodyId`], which is
/// also stored in each body's `user_data`.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    handles: HashMap<BodyId, TableBody>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: vec2_to_na(Vec2::ZERO),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            handles: HashMap::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rolling ball. CCD is on so hard shots cannot skip a pocket.
    pub fn create_ball(&mut self, id: BodyId, pos: Vec2, radius: f32, material: &PhysicsConfig) {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(pos))
            .linear_damping(material.linear_damping)
            .angular_damping(material.angular_damping)
            .ccd_enabled(true)
            .user_data(id.0 as u128)
            .build();
        let collider = ColliderBuilder::ball(radius)
            .restitution(material.ball_restitution)
            .friction(material.ball_friction)
            .density(material.ball_density)
            .active_events(ActiveEvents::COLLISION_EVENTS);
        self.insert(id, rb, collider);
    }

    /// Create a static rail cushion.
    pub fn create_cushion(&mut self, id: BodyId, center: Vec2, half_extents: Vec2, material: &PhysicsConfig) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(center))
            .user_data(id.0 as u128)
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .restitution(material.cushion_restitution)
            .friction(material.cushion_friction);
        self.insert(id, rb, collider);
    }

    /// Create a pocket: a sensor that reports overlaps but never pushes back.
    pub fn create_pocket_sensor(&mut self, id: BodyId, center: Vec2, radius: f32) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(center))
            .user_data(id.0 as u128)
            .build();
        let collider = ColliderBuilder::ball(radius)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS);
        self.insert(id, rb, collider);
    }

    fn insert(&mut self, id: BodyId, rb: RigidBody, collider: ColliderBuilder) {
        if self.handles.contains_key(&id) {
            log::warn!("Body {:?} already exists, replacing it", id);
            self.remove_body(id);
        }
        let body_handle = self.bodies.insert(rb);
        let collider_handle = self
            .colliders
            .insert_with_parent(collider.build(), body_handle, &mut self.bodies);
        self.handles.insert(
            id,
            TableBody {
                body_handle,
                collider_handle,
            },
        );
    }

    /// Remove a body and its collider. Returns `false` if the id was unknown.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(body) = self.handles.remove(&id) else {
            return false;
        };
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Colliders of a body removed mid-step resolve to nothing
            if let (Some(a), Some(b)) = (self.collider_to_id(h1), self.collider_to_id(h2)) {
                collision_events.push(CollisionPair {
                    body_a: a,
                    body_b: b,
                    started,
                });
            }
        }
    }

    /// Apply an instantaneous impulse to a body.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(rb) = self.rigid_body_mut(id) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, id: BodyId) -> Vec2 {
        self.rigid_body(id)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Get the current position of a body.
    pub fn body_position(&self, id: BodyId) -> Option<Vec2> {
        self.rigid_body(id).map(|rb| na_to_vec2(rb.translation()))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn rigid_body(&self, id: BodyId) -> Option<&RigidBody> {
        let body = self.handles.get(&id)?;
        self.bodies.get(body.body_handle)
    }

    fn rigid_body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let body = self.handles.get(&id)?;
        self.bodies.get_mut(body.body_handle)
    }

    fn collider_to_id(&self, collider_handle: ColliderHandle) -> Option<BodyId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(BodyId(body.user_data as u32))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
