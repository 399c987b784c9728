//! Ground/wall sensor edges.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

/// Transitions of an actor's grounded and wall flags.
///
/// `tick` is the fixed tick (see [`FixedTime`](crate::resources::fixedtime::FixedTime))
/// in which the transition happened.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEdge {
    /// Airborne → grounded.
    Landed { body: Entity, tick: u64 },
    /// Grounded → airborne, either by walking off a floor or by jumping.
    LeftGround { body: Entity, tick: u64 },
    WallTouched { body: Entity, tick: u64 },
    WallReleased { body: Entity, tick: u64 },
}

impl SensorEdge {
    pub fn body(&self) -> Entity {
        match *self {
            SensorEdge::Landed { body, .. }
            | SensorEdge::LeftGround { body, .. }
            | SensorEdge::WallTouched { body, .. }
            | SensorEdge::WallReleased { body, .. } => body,
        }
    }
}
