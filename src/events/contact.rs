//! Contact events fed in by the collision collaborator.
//!
//! The core never resolves collisions itself. Something outside it (see
//! [`ContactSource`](crate::simulation::ContactSource)) writes one
//! [`ContactEvent`] per body/collider pair and phase, and the
//! [`ground_sensor`](crate::systems::sensor::ground_sensor) consumes them at
//! the start of the next fixed tick.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::components::surface::SurfaceTag;

/// Lifecycle of a contact between two colliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

/// One contact notification for `body`.
///
/// `normal` points from the surface toward the body. It is ignored for
/// [`ContactPhase::Exit`].
#[derive(Message, Debug, Clone, Copy)]
pub struct ContactEvent {
    pub body: Entity,
    pub other: Entity,
    pub tag: SurfaceTag,
    pub normal: Vec2,
    pub phase: ContactPhase,
}

impl ContactEvent {
    pub fn enter(body: Entity, other: Entity, tag: SurfaceTag, normal: Vec2) -> Self {
        Self {
            body,
            other,
            tag,
            normal,
            phase: ContactPhase::Enter,
        }
    }

    pub fn stay(body: Entity, other: Entity, tag: SurfaceTag, normal: Vec2) -> Self {
        Self {
            body,
            other,
            tag,
            normal,
            phase: ContactPhase::Stay,
        }
    }

    pub fn exit(body: Entity, other: Entity, tag: SurfaceTag) -> Self {
        Self {
            body,
            other,
            tag,
            normal: Vec2::ZERO,
            phase: ContactPhase::Exit,
        }
    }
}
