//! ECS components for actors and level geometry.
//!
//! Submodules overview:
//! - [`animation`] – playback state and animation-selector bookkeeping
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`motion`] – movement tuning, ground/wall sensor state and jump buffer
//! - [`rigidbody`] – velocity plus named acceleration forces
//! - [`rotation`] – rotation angle in degrees
//! - [`sprite`] – visible frame handle and horizontal flip
//! - [`surface`] – Floor/Wall/Other tag for colliders and contacts

pub mod animation;
pub mod mapposition;
pub mod motion;
pub mod rigidbody;
pub mod rotation;
pub mod sprite;
pub mod surface;
