//! Simulation systems.
//!
//! Systems are grouped by the clock that drives them. The
//! [`Simulation`](crate::simulation::Simulation) owns the schedules and decides
//! the order; see its docs for the full tick layout.
//!
//! Submodules overview
//! - [`animation`] – jump/landing overrides, state selection and frame playback
//! - [`input`] – turn the input snapshot into jump commands, clear edges
//! - [`motion`] – horizontal velocity, jump buffer and impulse (fixed tick)
//! - [`movement`] – integrate forces and velocity into position (fixed tick)
//! - [`orientation`] – align actors to the floor normal (fixed tick)
//! - [`sensor`] – fold contact events into grounded/wall state (fixed tick)
//! - [`time`] – update render time and the fixed-step accumulator

pub mod animation;
pub mod input;
pub mod motion;
pub mod movement;
pub mod orientation;
pub mod sensor;
pub mod time;
