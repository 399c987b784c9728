//! Simulation driver.
//!
//! [`Simulation`] owns the ECS [`World`] and the three schedules that make up a
//! render frame:
//!
//! ```text
//! begin_frame(dt)   render clock, fixed accumulator
//!   pre_update      emit_jump_commands → trigger_jump_animation
//! run_fixed_tick()  × due
//!   fixed           ground_sensor → motion_controller → integrate_forces
//!                   → align_to_floor → queue updates
//!   contact source  resolves the new positions, emits contacts for next tick
//! end_frame()
//!   update          animation_selector → apply_landings → animation_playback
//!                   → queue updates → clear input edges
//! ```
//!
//! Collision resolution is not part of the core. A [`ContactSource`] runs after
//! each fixed tick and reports contacts, which the sensor reads at the start of
//! the following tick.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use rustc_hash::FxHashSet;

use crate::components::animation::{Animation, AnimationSelector};
use crate::components::mapposition::MapPosition;
use crate::components::motion::MotionState;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::components::sprite::Sprite;
use crate::components::surface::SurfaceTag;
use crate::events::animation::AnimationFinished;
use crate::events::contact::ContactEvent;
use crate::events::input::JumpCommand;
use crate::events::sensor::SensorEdge;
use crate::resources::animationlibrary::{AnimationLibrary, FrameHandle};
use crate::resources::config::CoreConfig;
use crate::resources::fixedtime::FixedTime;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{
    animation_playback, animation_selector, apply_landings, trigger_jump_animation,
    update_animation_finished,
};
use crate::systems::input::{clear_input_edges, emit_jump_commands, update_jump_commands};
use crate::systems::motion::motion_controller;
use crate::systems::movement::integrate_forces;
use crate::systems::orientation::align_to_floor;
use crate::systems::sensor::{ground_sensor, update_contact_events, update_sensor_edges};
use crate::systems::time::{accumulate_fixed_time, update_world_time};

/// Collision collaborator seam.
///
/// Called once after every fixed tick with full world access. Implementations
/// may correct positions and velocities (penetration, landing) and return the
/// contacts they observed.
pub trait ContactSource {
    fn resolve_contacts(&mut self, world: &mut World) -> Vec<ContactEvent>;
}

/// Distance above the floor still counted as touching it.
const CONTACT_SKIN: f32 = 1e-4;

/// An infinite horizontal floor at `height`.
///
/// Every actor with a [`MotionState`] at or below the floor is pushed back on
/// top of it and loses its downward velocity. Contacts report `normal`, which
/// defaults to straight up; a tilted normal stands in for a slope.
pub struct FlatFloor {
    pub entity: Entity,
    pub height: f32,
    pub normal: Vec2,
    touching: FxHashSet<Entity>,
}

impl FlatFloor {
    /// Spawn the floor collider entity and return its resolver.
    pub fn spawn(world: &mut World, height: f32) -> Self {
        let entity = world
            .spawn((SurfaceTag::Floor, MapPosition::new(0.0, height)))
            .id();
        Self {
            entity,
            height,
            normal: Vec2::Y,
            touching: FxHashSet::default(),
        }
    }

    pub fn with_normal(mut self, normal: Vec2) -> Self {
        self.normal = normal.normalize_or(Vec2::Y);
        self
    }

    pub fn is_touching(&self, body: Entity) -> bool {
        self.touching.contains(&body)
    }
}

impl ContactSource for FlatFloor {
    fn resolve_contacts(&mut self, world: &mut World) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        let mut query = world
            .query_filtered::<(Entity, &mut MapPosition, &mut RigidBody), With<MotionState>>();
        for (body, mut position, mut rigidbody) in query.iter_mut(world) {
            if position.pos.y <= self.height + CONTACT_SKIN {
                if position.pos.y < self.height {
                    position.pos.y = self.height;
                }
                if rigidbody.velocity.y < 0.0 {
                    rigidbody.velocity.y = 0.0;
                }
                let event = if self.touching.insert(body) {
                    ContactEvent::enter(body, self.entity, SurfaceTag::Floor, self.normal)
                } else {
                    ContactEvent::stay(body, self.entity, SurfaceTag::Floor, self.normal)
                };
                events.push(event);
            } else if self.touching.remove(&body) {
                events.push(ContactEvent::exit(body, self.entity, SurfaceTag::Floor));
            }
        }
        events
    }
}

/// World plus schedules for the platformer core.
pub struct Simulation {
    world: World,
    pre_update: Schedule,
    fixed: Schedule,
    update: Schedule,
}

impl Simulation {
    pub fn new(config: CoreConfig, library: AnimationLibrary) -> Self {
        library.warn_dangling_chains();

        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(config.fixed_time());
        world.insert_resource(InputState::default());
        world.insert_resource(library);
        world.insert_resource(config);
        world.init_resource::<Messages<JumpCommand>>();
        world.init_resource::<Messages<ContactEvent>>();
        world.init_resource::<Messages<SensorEdge>>();
        world.init_resource::<Messages<AnimationFinished>>();

        let mut pre_update = Schedule::default();
        pre_update.add_systems((emit_jump_commands, trigger_jump_animation).chain());

        let mut fixed = Schedule::default();
        fixed.add_systems(
            (
                ground_sensor,
                motion_controller,
                integrate_forces,
                align_to_floor,
                update_contact_events,
                update_jump_commands,
            )
                .chain(),
        );

        let mut update = Schedule::default();
        update.add_systems(
            (
                animation_selector,
                apply_landings,
                animation_playback,
                update_sensor_edges,
                update_animation_finished,
                clear_input_edges,
            )
                .chain(),
        );

        Self {
            world,
            pre_update,
            fixed,
            update,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &CoreConfig {
        self.world.resource::<CoreConfig>()
    }

    /// Spawn a player-controlled actor at `(x, y)` using the configured tuning.
    ///
    /// The actor starts airborne, upright, at rest and with no active sequence.
    pub fn spawn_player(&mut self, x: f32, y: f32) -> Entity {
        let config = self.world.resource::<CoreConfig>();
        let motion = config.motion;
        let selector = config.selector;
        let entity = self
            .world
            .spawn((
                MapPosition::new(x, y),
                RigidBody::with_gravity(motion.gravity),
                Rotation::upright(),
                motion,
                MotionState::default(),
                Animation::new(),
                AnimationSelector::new(selector),
                Sprite::default(),
            ))
            .id();
        info!("Spawned player {:?} at ({}, {})", entity, x, y);
        entity
    }

    pub fn input_mut(&mut self) -> Mut<'_, InputState> {
        self.world.resource_mut::<InputState>()
    }

    pub fn set_move_axis(&mut self, x: f32, y: f32) {
        self.input_mut().set_move_axis(x, y);
    }

    pub fn press_jump(&mut self) {
        self.input_mut().press_jump();
    }

    pub fn release_jump(&mut self) {
        self.input_mut().release_jump();
    }

    /// Start a render frame of `dt` unscaled seconds. Returns how many fixed
    /// ticks are due.
    pub fn begin_frame(&mut self, dt: f32) -> u32 {
        update_world_time(&mut self.world, dt);
        let due = accumulate_fixed_time(&mut self.world);
        self.pre_update.run(&mut self.world);
        due
    }

    pub fn run_fixed_tick(&mut self) {
        self.world.resource_mut::<FixedTime>().begin_tick();
        self.fixed.run(&mut self.world);
    }

    /// Let `source` resolve the current positions and queue its contacts for
    /// the next fixed tick.
    pub fn resolve_contacts(&mut self, source: &mut dyn ContactSource) {
        let contacts = source.resolve_contacts(&mut self.world);
        self.push_contacts(contacts);
    }

    /// Queue contacts for the next fixed tick.
    pub fn push_contacts(&mut self, contacts: impl IntoIterator<Item = ContactEvent>) {
        let mut messages = self.world.resource_mut::<Messages<ContactEvent>>();
        for contact in contacts {
            messages.write(contact);
        }
    }

    pub fn end_frame(&mut self) {
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Run one full render frame: fixed ticks (each followed by contact
    /// resolution) and the render-rate systems. Returns the fixed ticks run.
    pub fn advance(&mut self, dt: f32, source: &mut dyn ContactSource) -> u32 {
        let due = self.begin_frame(dt);
        for _ in 0..due {
            self.run_fixed_tick();
            self.resolve_contacts(source);
        }
        self.end_frame();
        due
    }

    pub fn frame_count(&self) -> u64 {
        self.world.resource::<WorldTime>().frame_count
    }

    pub fn fixed_tick(&self) -> u64 {
        self.world.resource::<FixedTime>().tick
    }

    pub fn current_velocity(&self, actor: Entity) -> Option<Vec2> {
        self.world.get::<RigidBody>(actor).map(|b| b.velocity)
    }

    pub fn position(&self, actor: Entity) -> Option<Vec2> {
        self.world.get::<MapPosition>(actor).map(|p| p.pos)
    }

    pub fn rotation_degrees(&self, actor: Entity) -> Option<f32> {
        self.world.get::<Rotation>(actor).map(|r| r.degrees)
    }

    pub fn is_grounded(&self, actor: Entity) -> bool {
        self.world
            .get::<MotionState>(actor)
            .is_some_and(|s| s.is_grounded)
    }

    pub fn is_touching_wall(&self, actor: Entity) -> bool {
        self.world
            .get::<MotionState>(actor)
            .is_some_and(|s| s.is_touching_wall)
    }

    /// Floor contact normal, only while grounded.
    pub fn floor_contact_normal(&self, actor: Entity) -> Option<Vec2> {
        self.world.get::<MotionState>(actor)?.floor_normal()
    }

    pub fn active_animation_name(&self, actor: Entity) -> Option<&str> {
        self.world.get::<Animation>(actor)?.active_name()
    }

    pub fn current_frame_image_handle(&self, actor: Entity) -> Option<FrameHandle> {
        self.world.get::<Sprite>(actor)?.frame.clone()
    }

    pub fn flip_state(&self, actor: Entity) -> bool {
        self.world.get::<Sprite>(actor).is_some_and(|s| s.flip_h)
    }

    pub fn is_suppressed(&self, actor: Entity) -> bool {
        self.world
            .get::<AnimationSelector>(actor)
            .is_some_and(AnimationSelector::is_suppressed)
    }
}
