//! Messages exchanged between systems.
//!
//! Every type here is a `bevy_ecs` [`Message`](bevy_ecs::message::Message)
//! stored in a `Messages<T>` resource. Queues are advanced explicitly by the
//! [`Simulation`](crate::simulation::Simulation) at fixed points, so a message
//! written in one tick domain stays readable until that domain's next update.
//!
//! Submodules:
//! - [`contact`] – floor/wall contact notifications from the collision collaborator
//! - [`input`] – discrete gameplay commands derived from the input snapshot
//! - [`sensor`] – grounded and wall edges published by the ground sensor
//! - [`animation`] – end-of-sequence notifications from the animation player
pub mod animation;
pub mod contact;
pub mod input;
pub mod sensor;
