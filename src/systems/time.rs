//! Time update.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per render frame, applying `time_scale` to the provided
//! delta, and feeds the scaled delta to the fixed-step accumulator.
use bevy_ecs::prelude::*;

use crate::resources::fixedtime::FixedTime;
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource and count the
/// frame.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}

/// Add this frame's scaled delta to [`FixedTime`] and return the number of
/// fixed ticks to run.
pub fn accumulate_fixed_time(world: &mut World) -> u32 {
    let delta = world.resource::<WorldTime>().delta;
    world.resource_mut::<FixedTime>().accumulate(delta)
}
