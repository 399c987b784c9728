//! Simplified body with velocity and named acceleration forces.
//!
//! The [`RigidBody`] component stores an actor's velocity together with a set
//! of named accelerations. The platformer model only needs a constant downward
//! pull (registered as [`GRAVITY_FORCE`]) plus horizontal velocity written by
//! the motion controller, but each force can be toggled independently so game
//! logic can add or mute others (wind, conveyor belts) without touching the
//! controller.
//!
//! Mass is implicitly 1: forces are accelerations and impulses are velocity
//! deltas.
//!
//! The `frozen` flag makes the force integrator skip the body, useful while an
//! actor is positioned externally (cutscenes, respawn).

use bevy_ecs::prelude::Component;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Name of the constant downward force applied to every platformer actor.
pub const GRAVITY_FORCE: &str = "gravity";

/// A named acceleration that can be toggled on/off.
#[derive(Clone, Copy, Debug)]
pub struct AccelerationForce {
    /// Acceleration in world units per second squared.
    pub value: Vec2,
    /// Whether this force is currently applied.
    pub enabled: bool,
}

impl AccelerationForce {
    /// Create a new enabled force.
    pub fn new(value: Vec2) -> Self {
        Self {
            value,
            enabled: true,
        }
    }
}

/// Velocity plus named acceleration forces.
///
/// Written by the motion controller (horizontal velocity, jump impulses) and
/// by [`integrate_forces`](crate::systems::movement::integrate_forces), which
/// adds the sum of enabled forces each fixed tick. Downstream consumers
/// (camera, particles, animation) only read `velocity`.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new();
/// rb.add_force(GRAVITY_FORCE, Vec2::new(0.0, -9.81));
/// rb.apply_impulse(Vec2::new(0.0, 7.0));
/// ```
#[derive(Component, Clone, Debug, Default)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Named accelerations. The total is the sum of all enabled forces.
    pub forces: FxHashMap<String, AccelerationForce>,
    /// When true, force integration skips this body.
    pub frozen: bool,
}

impl RigidBody {
    /// Create a body at rest with no forces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body with a single enabled downward gravity force.
    pub fn with_gravity(gravity: f32) -> Self {
        let mut rb = Self::new();
        rb.add_force(GRAVITY_FORCE, Vec2::new(0.0, -gravity));
        rb
    }

    /// Add or replace a named force (enabled).
    pub fn add_force(&mut self, name: &str, value: Vec2) {
        self.forces
            .insert(name.to_string(), AccelerationForce::new(value));
    }

    /// Enable or disable a force. Returns false if the force doesn't exist.
    pub fn set_force_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(force) = self.forces.get_mut(name) {
            force.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Sum of all enabled forces.
    pub fn total_acceleration(&self) -> Vec2 {
        self.forces
            .values()
            .filter(|f| f.enabled)
            .fold(Vec2::ZERO, |acc, f| acc + f.value)
    }

    /// Instantaneous velocity change (unit mass).
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
