use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Tag carried by level colliders and by every contact event.
///
/// Only `Floor` and `Wall` affect the ground/wall sensor; anything else is
/// reported as `Other` and ignored.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceTag {
    Floor,
    Wall,
    Other,
}
