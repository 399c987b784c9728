//! Platformer motion components.
//!
//! - [`MotionTuning`] – per-actor movement parameters (speeds, rates, jump)
//! - [`MotionState`] – ground/wall sensor state, floor normal and jump buffer
//!
//! [`crate::systems::sensor`] writes the sensor half of [`MotionState`] from
//! contact events; [`crate::systems::motion`] reads it to integrate horizontal
//! velocity and resolve buffered jumps.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

/// Allowed float drift when deciding whether a buffered jump is still inside
/// its window.
const JUMP_BUFFER_TOLERANCE: f32 = 1e-5;

/// Movement parameters for an actor driven by the motion controller.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    /// Horizontal speed reached at full stick deflection.
    pub max_speed: f32,
    /// Above this horizontal speed, airborne input can no longer accelerate
    /// in the current direction.
    pub airborne_speed_limit: f32,
    /// Rate (units/s²) used while speeding up toward the target.
    pub acceleration: f32,
    /// Rate (units/s²) used while slowing down or reversing.
    pub deceleration: f32,
    /// Constant downward acceleration.
    pub gravity: f32,
    /// Upward velocity change applied when a jump fires.
    pub jump_impulse: f32,
    /// How long a jump command stays queued waiting for ground contact.
    pub jump_buffer_window: f32,
    /// Horizontal speed below which the body counts as not moving when
    /// choosing between acceleration and deceleration.
    pub reversal_epsilon: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            airborne_speed_limit: 5.0,
            acceleration: 3.0,
            deceleration: 15.0,
            gravity: 9.81,
            jump_impulse: 7.0,
            jump_buffer_window: 0.25,
            reversal_epsilon: 0.01,
        }
    }
}

/// Ground/wall sensor output plus the queued-jump buffer.
///
/// Invariant: `is_grounded` implies `current_floor.is_some()`. The floor
/// normal keeps its last value after leaving the floor but is only exposed
/// through [`MotionState::floor_normal`] while grounded.
#[derive(Component, Clone, Debug)]
pub struct MotionState {
    pub is_grounded: bool,
    pub is_touching_wall: bool,
    pub floor_contact_normal: Vec2,
    pub current_floor: Option<Entity>,
    /// Seconds left on a queued jump; None when nothing is queued.
    pub jump_buffer: Option<f32>,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            is_grounded: false,
            is_touching_wall: false,
            floor_contact_normal: Vec2::NEG_Y,
            current_floor: None,
            jump_buffer: None,
        }
    }
}

impl MotionState {
    /// Floor normal, only while grounded.
    pub fn floor_normal(&self) -> Option<Vec2> {
        self.is_grounded.then_some(self.floor_contact_normal)
    }

    /// Start tracking `floor`. Returns true on an airborne → grounded edge.
    pub fn enter_floor(&mut self, floor: Entity, normal: Vec2) -> bool {
        let landed = !self.is_grounded;
        self.current_floor = Some(floor);
        self.floor_contact_normal = normal;
        self.is_grounded = true;
        landed
    }

    /// Refresh the normal while in contact with the tracked floor.
    pub fn stay_floor(&mut self, floor: Entity, normal: Vec2) {
        if self.current_floor == Some(floor) {
            self.floor_contact_normal = normal;
        }
    }

    /// Stop tracking `floor`. Returns true on a grounded → airborne edge.
    /// Exits from floors other than the tracked one are ignored.
    pub fn exit_floor(&mut self, floor: Entity) -> bool {
        if self.current_floor != Some(floor) {
            return false;
        }
        let left = self.is_grounded;
        self.is_grounded = false;
        self.current_floor = None;
        left
    }

    /// Returns true when the wall flag was previously clear.
    pub fn touch_wall(&mut self) -> bool {
        let edge = !self.is_touching_wall;
        self.is_touching_wall = true;
        edge
    }

    /// Returns true when the wall flag was previously set.
    pub fn release_wall(&mut self) -> bool {
        let edge = self.is_touching_wall;
        self.is_touching_wall = false;
        edge
    }

    /// Drop ground contact after a jump fires.
    pub fn leave_ground(&mut self) {
        self.is_grounded = false;
        self.current_floor = None;
    }

    /// Queue a jump for `window` seconds. A second command restarts the window.
    pub fn queue_jump(&mut self, window: f32) {
        self.jump_buffer = Some(window);
    }

    /// Seconds left on the jump buffer (0 when empty).
    pub fn jump_buffer_remaining(&self) -> f32 {
        self.jump_buffer.map_or(0.0, |r| r.max(0.0))
    }

    /// Advance the jump buffer by one fixed tick.
    ///
    /// Returns true when a queued jump must fire this tick (the buffer is
    /// cleared). A jump queued `k` ticks ago fires if `k * dt` is within the
    /// window; past it the buffer silently expires.
    pub fn tick_jump_buffer(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.jump_buffer else {
            return false;
        };
        if self.is_grounded {
            self.jump_buffer = None;
            return true;
        }
        let next = remaining - dt;
        self.jump_buffer = (next >= -JUMP_BUFFER_TOLERANCE).then_some(next);
        false
    }
}
