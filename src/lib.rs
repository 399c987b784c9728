//! Platformer core library.
//!
//! Gameplay-simulation core of a 2D platformer: input and contact events go
//! in; velocity, grounded state, floor alignment and the active animation
//! frame come out. Rendering and collision resolution live outside and only
//! talk to the core through [`simulation::ContactSource`] and the published
//! components.

pub mod components;
pub mod events;
pub mod resources;
pub mod simulation;
pub mod systems;
