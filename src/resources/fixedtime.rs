//! Fixed-step clock for the physics tick.
//!
//! Render frames feed scaled time into an accumulator; the
//! [`Simulation`](crate::simulation::Simulation) then runs one fixed tick per
//! whole `step` in it. The number of ticks per frame is capped so a long
//! stall cannot snowball; time beyond the cap is dropped.

use bevy_ecs::prelude::Resource;
use log::warn;

pub const DEFAULT_FIXED_STEP: f32 = 0.02;
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 8;

#[derive(Resource, Clone, Copy, Debug)]
pub struct FixedTime {
    /// Seconds per fixed tick.
    pub step: f32,
    pub accumulator: f32,
    /// Index of the last fixed tick started (0 before the first one).
    pub tick: u64,
    pub max_ticks_per_frame: u32,
    /// Ticks discarded by the catch-up cap so far.
    pub dropped_ticks: u64,
}

impl Default for FixedTime {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP, DEFAULT_MAX_TICKS_PER_FRAME)
    }
}

impl FixedTime {
    pub fn new(step: f32, max_ticks_per_frame: u32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            tick: 0,
            max_ticks_per_frame,
            dropped_ticks: 0,
        }
    }

    /// Add frame time and return how many fixed ticks are due.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        if self.step <= 0.0 {
            return 0;
        }
        self.accumulator += dt.max(0.0);
        let due = (self.accumulator / self.step) as u32;
        if due > self.max_ticks_per_frame {
            let dropped = due - self.max_ticks_per_frame;
            warn!(
                "Fixed step falling behind: dropping {} of {} ticks this frame",
                dropped, due
            );
            self.accumulator -= dropped as f32 * self.step;
            self.dropped_ticks += dropped as u64;
            return self.max_ticks_per_frame;
        }
        due
    }

    /// Consume one step from the accumulator and advance the tick counter.
    pub fn begin_tick(&mut self) {
        self.accumulator = (self.accumulator - self.step).max(0.0);
        self.tick += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_tick_per_matching_frame() {
        let mut ft = FixedTime::default();
        for expected in 1..=5 {
            assert_eq!(ft.accumulate(0.02), 1);
            ft.begin_tick();
            assert_eq!(ft.tick, expected);
        }
        assert_eq!(ft.accumulator, 0.0);
    }

    #[test]
    fn short_frames_carry_remainder() {
        let mut ft = FixedTime::new(0.02, 8);
        assert_eq!(ft.accumulate(0.015), 0);
        assert_eq!(ft.accumulate(0.015), 1);
        ft.begin_tick();
        assert!((ft.accumulator - 0.01).abs() < 1e-6);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut ft = FixedTime::new(0.25, 4);
        assert_eq!(ft.accumulate(2.0), 4);
        assert_eq!(ft.dropped_ticks, 4);
        for _ in 0..4 {
            ft.begin_tick();
        }
        assert!(ft.accumulator < ft.step);
    }
}
