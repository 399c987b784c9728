//! Ground/wall sensor.
//!
//! Folds [`ContactEvent`]s into each actor's [`MotionState`] and publishes the
//! resulting [`SensorEdge`]s. Runs first in the fixed tick so the motion
//! controller sees this tick's contacts when resolving a buffered jump.
//!
//! Floor and wall tracking are independent: a wall contact never touches the
//! grounded flag and vice versa. Only the floor that was entered is tracked;
//! `Stay`/`Exit` from any other floor is ignored.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::motion::MotionState;
use crate::components::surface::SurfaceTag;
use crate::events::contact::{ContactEvent, ContactPhase};
use crate::events::sensor::SensorEdge;
use crate::resources::fixedtime::FixedTime;

pub fn ground_sensor(
    mut contacts: MessageReader<ContactEvent>,
    mut query: Query<&mut MotionState>,
    time: Res<FixedTime>,
    mut edges: MessageWriter<SensorEdge>,
) {
    let tick = time.tick;
    for contact in contacts.read() {
        let Ok(mut state) = query.get_mut(contact.body) else {
            continue;
        };
        let body = contact.body;
        match (contact.tag, contact.phase) {
            (SurfaceTag::Floor, ContactPhase::Enter) => {
                if state.enter_floor(contact.other, contact.normal) {
                    debug!("{:?} landed on {:?} at tick {}", body, contact.other, tick);
                    edges.write(SensorEdge::Landed { body, tick });
                }
            }
            (SurfaceTag::Floor, ContactPhase::Stay) => {
                state.stay_floor(contact.other, contact.normal);
            }
            (SurfaceTag::Floor, ContactPhase::Exit) => {
                if state.exit_floor(contact.other) {
                    debug!("{:?} left {:?} at tick {}", body, contact.other, tick);
                    edges.write(SensorEdge::LeftGround { body, tick });
                }
            }
            (SurfaceTag::Wall, ContactPhase::Enter | ContactPhase::Stay) => {
                if state.touch_wall() {
                    edges.write(SensorEdge::WallTouched { body, tick });
                }
            }
            (SurfaceTag::Wall, ContactPhase::Exit) => {
                if state.release_wall() {
                    edges.write(SensorEdge::WallReleased { body, tick });
                }
            }
            (SurfaceTag::Other, _) => {}
        }
        debug_assert!(
            !state.is_grounded || state.current_floor.is_some(),
            "grounded without a tracked floor"
        );
    }
}

/// Advance the [`ContactEvent`] queue at the end of each fixed tick.
pub fn update_contact_events(mut msgs: ResMut<Messages<ContactEvent>>) {
    msgs.update();
}

/// Advance the [`SensorEdge`] queue once per render frame.
pub fn update_sensor_edges(mut msgs: ResMut<Messages<SensorEdge>>) {
    msgs.update();
}
