use bevy_ecs::prelude::Component;
use glam::Vec2;

/// World-space position of an actor's pivot. Y grows upward.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
