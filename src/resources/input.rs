//! Per-frame input snapshot.
//!
//! The core does not read devices. Whatever drives it (a window layer, a
//! replay, the demo binary) writes the [`InputState`] resource once per render
//! frame; systems only poll it.
use bevy_ecs::prelude::*;
use glam::Vec2;

/// Boolean button state with press/release edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the button is currently held.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    pub fn press(&mut self) {
        if !self.active {
            self.just_pressed = true;
        }
        self.active = true;
    }

    pub fn release(&mut self) {
        if self.active {
            self.just_released = true;
        }
        self.active = false;
    }

    pub fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Resource capturing the gameplay input for the current frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    /// Movement axis, each component in [-1, 1]. `y < 0` means "down".
    pub move_axis: Vec2,
    pub jump: BoolState,
}

impl InputState {
    /// Set the movement axis, clamping each component to [-1, 1].
    pub fn set_move_axis(&mut self, x: f32, y: f32) {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        self.move_axis = Vec2::new(clamp(x), clamp(y));
    }

    pub fn press_jump(&mut self) {
        self.jump.press();
    }

    pub fn release_jump(&mut self) {
        self.jump.release();
    }

    /// Drop this frame's press/release edges. Held state is kept.
    pub fn clear_edges(&mut self) {
        self.jump.clear_edges();
    }
}
