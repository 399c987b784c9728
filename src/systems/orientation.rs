//! Align actors to the floor they stand on.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::motion::MotionState;
use crate::components::rotation::Rotation;

/// Signed angle in degrees from world up to `normal`, counter-clockwise
/// positive.
pub fn floor_angle(normal: Vec2) -> f32 {
    Vec2::Y.perp_dot(normal).atan2(Vec2::Y.dot(normal)).to_degrees()
}

/// Grounded actors take the floor normal's angle; airborne ones stand upright.
pub fn align_to_floor(mut query: Query<(&MotionState, &mut Rotation)>) {
    for (state, mut rotation) in query.iter_mut() {
        rotation.degrees = state.floor_normal().map_or(0.0, floor_angle);
    }
}
