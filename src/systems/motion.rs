//! Motion controller.
//!
//! Each fixed tick, for every actor with [`MotionTuning`]:
//!
//! 1. Jump commands addressed to the actor (re)arm its jump buffer.
//! 2. Horizontal velocity moves toward `move_axis.x * max_speed` at the
//!    acceleration or deceleration rate, never overshooting. Airborne actors
//!    already at or above `airborne_speed_limit` cannot push further in the
//!    same direction.
//! 3. An armed buffer fires as soon as the actor is grounded: an impulse along
//!    the body's up axis, and the actor leaves the ground.
//!
//! Gravity is not applied here; it is a named force on the
//! [`RigidBody`] integrated by [`integrate_forces`](crate::systems::movement::integrate_forces).

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::motion::{MotionState, MotionTuning};
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::events::input::JumpCommand;
use crate::events::sensor::SensorEdge;
use crate::resources::fixedtime::FixedTime;
use crate::resources::input::InputState;

/// Sign with `sign(0) = 1`.
pub fn sign(value: f32) -> f32 {
    if value >= 0.0 { 1.0 } else { -1.0 }
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Horizontal speed the controller steers toward this tick.
pub fn target_velocity_x(input_x: f32, velocity_x: f32, grounded: bool, tuning: &MotionTuning) -> f32 {
    let target = input_x * tuning.max_speed;
    if !grounded
        && velocity_x.abs() >= tuning.airborne_speed_limit
        && sign(target) == sign(velocity_x)
    {
        return velocity_x;
    }
    target
}

/// Acceleration or deceleration rate for this tick.
pub fn horizontal_rate(current_x: f32, target_x: f32, input: Vec2, tuning: &MotionTuning) -> f32 {
    if sign(current_x) != sign(target_x) && current_x.abs() > tuning.reversal_epsilon {
        tuning.deceleration
    } else if input.length() > 0.0 {
        tuning.acceleration
    } else {
        tuning.deceleration
    }
}

/// New horizontal velocity after one step of `dt` seconds.
pub fn step_horizontal(
    velocity_x: f32,
    input: Vec2,
    grounded: bool,
    tuning: &MotionTuning,
    dt: f32,
) -> f32 {
    let target = target_velocity_x(input.x, velocity_x, grounded, tuning);
    let rate = horizontal_rate(velocity_x, target, input, tuning);
    move_toward(velocity_x, target, rate * dt)
}

pub fn motion_controller(
    mut query: Query<(
        Entity,
        &MotionTuning,
        &mut MotionState,
        &mut RigidBody,
        Option<&Rotation>,
    )>,
    mut jumps: MessageReader<JumpCommand>,
    mut edges: MessageWriter<SensorEdge>,
    input: Res<InputState>,
    time: Res<FixedTime>,
) {
    let dt = time.step;
    let jumping: Vec<Entity> = jumps.read().map(|cmd| cmd.actor).collect();

    for (entity, tuning, mut state, mut body, rotation) in query.iter_mut() {
        if jumping.contains(&entity) {
            state.queue_jump(tuning.jump_buffer_window);
        }

        let vx = body.velocity.x;
        body.velocity.x = step_horizontal(vx, input.move_axis, state.is_grounded, tuning, dt);

        if state.tick_jump_buffer(dt) {
            let up = rotation.map_or(Vec2::Y, Rotation::up);
            body.apply_impulse(up * tuning.jump_impulse);
            state.leave_ground();
            debug!("{:?} jumped at tick {}", entity, time.tick);
            edges.write(SensorEdge::LeftGround {
                body: entity,
                tick: time.tick,
            });
        }
    }
}
