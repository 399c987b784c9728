//! Discrete gameplay commands.
//!
//! Continuous input (the move axis) is read straight from the
//! [`InputState`](crate::resources::input::InputState) snapshot. Edge-like
//! commands are turned into messages once per render frame so the fixed tick
//! and the animation selector both see them exactly once.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

/// Jump requested for `actor`.
///
/// Consumed by the motion controller (queues the jump buffer) and by the
/// animation selector (forces the jump animation when grounded).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpCommand {
    pub actor: Entity,
}
