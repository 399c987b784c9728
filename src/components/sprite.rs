use bevy_ecs::prelude::Component;

use crate::resources::animationlibrary::FrameHandle;

/// What the rendering collaborator draws for an actor this render tick.
///
/// `frame` is the image handle of the active sequence's current frame (None
/// while no sequence is active or the sequence is empty). `flip_h` mirrors the
/// sprite horizontally; it is written by the animation selector and never
/// touched by rendering.
#[derive(Component, Clone, Debug, Default)]
pub struct Sprite {
    pub frame: Option<FrameHandle>,
    pub flip_h: bool,
}

impl Sprite {
    /// Face toward the sign of `velocity_x` once it exceeds `epsilon`.
    ///
    /// Only flips when the sign disagrees with the current facing. Returns true
    /// if the facing changed.
    pub fn face_velocity(&mut self, velocity_x: f32, epsilon: f32) -> bool {
        if velocity_x.abs() <= epsilon {
            return false;
        }
        if velocity_x < 0.0 && !self.flip_h {
            self.flip_h = true;
            true
        } else if velocity_x > 0.0 && self.flip_h {
            self.flip_h = false;
            true
        } else {
            false
        }
    }
}
