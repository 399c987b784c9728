//! ECS resources made available to systems.
//!
//! Long-lived data injected into the world and shared by every actor: tuning,
//! the animation registry, the input snapshot and the two clocks.
//!
//! Overview
//! - `animationlibrary` – named frame sequences and their end-of-sequence policy
//! - `config` – INI-backed movement, jump, selector and timing parameters
//! - `fixedtime` – fixed-step accumulator for the physics tick
//! - `input` – per-frame move axis and jump button state
//! - `worldtime` – render-clock time, delta and frame counter
pub mod animationlibrary;
pub mod config;
pub mod fixedtime;
pub mod input;
pub mod worldtime;
