use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::fixedtime::FixedTime;

/// Integrate enabled forces into velocity, then velocity into position, over
/// one fixed step (semi-implicit Euler). Frozen bodies are skipped.
pub fn integrate_forces(mut query: Query<(&mut MapPosition, &mut RigidBody)>, time: Res<FixedTime>) {
    let dt = time.step;
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let acceleration = rigidbody.total_acceleration();
        rigidbody.velocity += acceleration * dt;
        position.pos += rigidbody.velocity * dt;
    }
}
