use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

/// Emitted when an actor's sequence plays past its last frame.
///
/// `next` is the sequence it chained into, or None if it looped.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct AnimationFinished {
    pub entity: Entity,
    pub sequence: String,
    pub next: Option<String>,
}
