//! Animation systems.
//!
//! - [`trigger_jump_animation`] forces "Jump" and opens the suppression window
//!   when a grounded actor is told to jump
//! - [`animation_selector`] maps physical state to a desired sequence and
//!   faces the sprite along its horizontal motion
//! - [`apply_landings`] forces "Land" on every airborne → grounded edge
//! - [`animation_playback`] advances frames and publishes the visible frame
//!
//! # Animation Flow
//!
//! 1. Sequences are defined in [`AnimationLibrary`]
//! 2. [`AnimationSelector`] records what the selector last committed and the
//!    jump suppression window
//! 3. [`Animation`] holds playback state; `set_active` is idempotent so
//!    re-committing the playing sequence never restarts it
//! 4. [`Sprite`] receives the current frame handle and facing
//!
//! Selection order (first match wins):
//!
//! | Condition                                          | Sequence |
//! |----------------------------------------------------|----------|
//! | suppression window open                            | unchanged |
//! | airborne, touching a wall, `|v.y| < epsilon`       | Wall     |
//! | grounded, `|v.x| < epsilon`, move axis points down | Crouch   |
//! | grounded, `|v| < epsilon`                          | Idle     |
//! | grounded, `|v| <= walk_run_threshold`              | Walk     |
//! | grounded                                           | Run      |
//! | otherwise                                          | Flip     |

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::animation::{Animation, AnimationSelector, SelectorTuning};
use crate::components::motion::MotionState;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::events::animation::AnimationFinished;
use crate::events::input::JumpCommand;
use crate::events::sensor::SensorEdge;
use crate::resources::animationlibrary::{
    AnimationLibrary, CROUCH, FLIP, IDLE, JUMP, LAND, RUN, WALK, WALL,
};
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Sequence the selector wants for the given physical state.
pub fn desired_animation(
    state: &MotionState,
    velocity: Vec2,
    move_axis: Vec2,
    tuning: &SelectorTuning,
) -> &'static str {
    if !state.is_grounded && state.is_touching_wall && velocity.y.abs() < tuning.epsilon {
        return WALL;
    }
    if state.is_grounded {
        if velocity.x.abs() < tuning.epsilon && move_axis.y < 0.0 {
            return CROUCH;
        }
        let speed = velocity.length();
        return if speed < tuning.epsilon {
            IDLE
        } else if speed <= tuning.walk_run_threshold {
            WALK
        } else {
            RUN
        };
    }
    FLIP
}

/// Force "Jump" for actors that are grounded when their jump command arrives.
///
/// Runs before the fixed tick, so "grounded" is the state the command was
/// issued against. Airborne commands only feed the jump buffer.
pub fn trigger_jump_animation(
    mut jumps: MessageReader<JumpCommand>,
    mut query: Query<(&MotionState, &mut AnimationSelector, &mut Animation)>,
    library: Res<AnimationLibrary>,
    time: Res<WorldTime>,
) {
    let frame = time.frame_count;
    for cmd in jumps.read() {
        let Ok((state, mut selector, mut animation)) = query.get_mut(cmd.actor) else {
            continue;
        };
        if !state.is_grounded {
            continue;
        }
        let budget = selector.tuning.suppression_frames;
        selector.suppression.begin(frame, budget);
        selector.current = Some(JUMP);
        animation.set_active(JUMP, &library);
        debug!(
            "{:?} jump animation, selection suppressed until frame {}",
            cmd.actor,
            selector.suppression.until_frame
        );
    }
}

/// Pick and commit each actor's sequence for this frame.
pub fn animation_selector(
    mut query: Query<(
        Entity,
        &MotionState,
        &RigidBody,
        &mut AnimationSelector,
        &mut Animation,
        &mut Sprite,
    )>,
    input: Res<InputState>,
    library: Res<AnimationLibrary>,
    time: Res<WorldTime>,
) {
    let frame = time.frame_count;
    for (entity, state, body, mut selector, mut animation, mut sprite) in query.iter_mut() {
        if selector.suppression.expire(frame) {
            debug!("{:?} suppression window closed at frame {}", entity, frame);
        }
        if selector.is_suppressed() {
            continue;
        }

        let desired = desired_animation(state, body.velocity, input.move_axis, &selector.tuning);
        if selector.current != Some(desired) {
            animation.set_active(desired, &library);
            selector.current = Some(desired);
        }

        let epsilon = selector.tuning.epsilon;
        sprite.face_velocity(body.velocity.x, epsilon);
    }
}

/// Force "Land" on landing edges and let the landing close suppression when
/// the actor's [`LandingPolicy`](crate::components::animation::LandingPolicy)
/// allows it.
pub fn apply_landings(
    mut edges: MessageReader<SensorEdge>,
    mut query: Query<(&mut AnimationSelector, &mut Animation)>,
    library: Res<AnimationLibrary>,
    time: Res<WorldTime>,
) {
    let frame = time.frame_count;
    for edge in edges.read() {
        let SensorEdge::Landed { body, .. } = *edge else {
            continue;
        };
        let Ok((mut selector, mut animation)) = query.get_mut(body) else {
            continue;
        };
        selector.current = Some(LAND);
        animation.set_active(LAND, &library);

        let tuning = selector.tuning;
        if selector
            .suppression
            .on_landing(frame, tuning.min_suppression_frames, tuning.landing_policy)
        {
            debug!("{:?} landing closed suppression at frame {}", body, frame);
        }
    }
}

/// Advance playback and publish the visible frame.
///
/// Speed-scaled sequences use the actor's horizontal speed.
pub fn animation_playback(
    mut query: Query<(Entity, &mut Animation, &mut Sprite, Option<&RigidBody>)>,
    library: Res<AnimationLibrary>,
    time: Res<WorldTime>,
    mut finished: MessageWriter<AnimationFinished>,
) {
    for (entity, mut animation, mut sprite, body) in query.iter_mut() {
        let speed = body.map_or(0.0, |b| b.velocity.x.abs());
        if let Some(end) = animation.tick(time.delta, speed, &library) {
            finished.write(AnimationFinished {
                entity,
                sequence: end.finished,
                next: end.next,
            });
        }
        sprite.frame = animation.current_frame(&library);
    }
}

/// Advance the [`AnimationFinished`] queue once per render frame.
pub fn update_animation_finished(mut msgs: ResMut<Messages<AnimationFinished>>) {
    msgs.update();
}
