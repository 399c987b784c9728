use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Body orientation in degrees, counter-clockwise from upright.
#[derive(Component, Clone, Debug, Copy, Default)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn upright() -> Self {
        Self { degrees: 0.0 }
    }

    /// The body's local "up" axis in world space.
    pub fn up(&self) -> Vec2 {
        let radians = self.degrees.to_radians();
        Vec2::new(-radians.sin(), radians.cos())
    }
}
