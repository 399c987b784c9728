//! Engine tick integration tests: individual systems run through real
//! schedules on a hand-built world.

use bevy_ecs::prelude::*;
use glam::Vec2;

use platformer_core::components::animation::{Animation, AnimationSelector, SelectorTuning};
use platformer_core::components::mapposition::MapPosition;
use platformer_core::components::motion::{MotionState, MotionTuning};
use platformer_core::components::rigidbody::RigidBody;
use platformer_core::components::rotation::Rotation;
use platformer_core::components::sprite::Sprite;
use platformer_core::components::surface::SurfaceTag;
use platformer_core::events::animation::AnimationFinished;
use platformer_core::events::contact::ContactEvent;
use platformer_core::events::input::JumpCommand;
use platformer_core::events::sensor::SensorEdge;
use platformer_core::resources::animationlibrary::{
    AnimationLibrary, FLIP, FrameTiming, IDLE, JUMP, RUN, SequenceDef, SpeedScaledTiming,
};
use platformer_core::resources::fixedtime::FixedTime;
use platformer_core::resources::input::InputState;
use platformer_core::resources::worldtime::WorldTime;
use platformer_core::systems::animation::{animation_playback, animation_selector};
use platformer_core::systems::motion::motion_controller;
use platformer_core::systems::movement::integrate_forces;
use platformer_core::systems::orientation::align_to_floor;
use platformer_core::systems::sensor::ground_sensor;
use platformer_core::systems::time::update_world_time;

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Resource, Default)]
struct CollectedEdges(Vec<SensorEdge>);

fn collect_edges(mut reader: MessageReader<SensorEdge>, mut out: ResMut<CollectedEdges>) {
    out.0.extend(reader.read().copied());
}

fn make_world(step: f32) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(FixedTime::new(step, 8));
    world.insert_resource(InputState::default());
    world.insert_resource(AnimationLibrary::platformer_defaults());
    world.init_resource::<CollectedEdges>();
    world.init_resource::<Messages<ContactEvent>>();
    world.init_resource::<Messages<JumpCommand>>();
    world.init_resource::<Messages<SensorEdge>>();
    world.init_resource::<Messages<AnimationFinished>>();
    world
}

fn tick_integrate(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(integrate_forces);
    schedule.run(world);
}

fn tick_sensor(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(ground_sensor);
    schedule.run(world);
}

fn tick_motion(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(motion_controller);
    schedule.run(world);
}

fn tick_align(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(align_to_floor);
    schedule.run(world);
}

fn tick_selector(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(animation_selector);
    schedule.run(world);
}

fn tick_playback(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(animation_playback);
    schedule.run(world);
}

fn spawn_actor(world: &mut World) -> Entity {
    world
        .spawn((
            MapPosition::new(0.0, 0.0),
            RigidBody::new(),
            Rotation::upright(),
            MotionTuning::default(),
            MotionState::default(),
        ))
        .id()
}

fn write_contact(world: &mut World, contact: ContactEvent) {
    world.resource_mut::<Messages<ContactEvent>>().write(contact);
}

#[test]
fn integrate_forces_moves_by_velocity() {
    let mut world = make_world(0.5);
    let mut rb = RigidBody::new();
    rb.velocity = Vec2::new(10.0, 0.0);
    let entity = world.spawn((MapPosition::new(0.0, 0.0), rb)).id();

    tick_integrate(&mut world);

    let pos = world.get::<MapPosition>(entity).unwrap();
    assert!(approx_eq(pos.pos.x, 5.0));
    assert!(approx_eq(pos.pos.y, 0.0));
}

#[test]
fn integrate_forces_applies_gravity_before_position() {
    let mut world = make_world(0.5);
    let entity = world
        .spawn((MapPosition::new(0.0, 10.0), RigidBody::with_gravity(2.0)))
        .id();

    tick_integrate(&mut world);

    let rb = world.get::<RigidBody>(entity).unwrap();
    let pos = world.get::<MapPosition>(entity).unwrap();
    assert!(approx_eq(rb.velocity.y, -1.0));
    assert!(approx_eq(pos.pos.y, 9.5));
}

#[test]
fn integrate_forces_skips_frozen_bodies() {
    let mut world = make_world(0.5);
    let mut rb = RigidBody::with_gravity(9.81);
    rb.velocity = Vec2::new(5.0, 0.0);
    rb.freeze();
    let entity = world.spawn((MapPosition::new(1.0, 1.0), rb)).id();

    tick_integrate(&mut world);

    let pos = world.get::<MapPosition>(entity).unwrap();
    assert_eq!(pos.pos, Vec2::new(1.0, 1.0));
    assert_eq!(world.get::<RigidBody>(entity).unwrap().velocity.y, 0.0);

    world.get_mut::<RigidBody>(entity).unwrap().unfreeze();
    tick_integrate(&mut world);
    let pos = world.get::<MapPosition>(entity).unwrap();
    assert!(pos.pos.x > 1.0);
    assert!(pos.pos.y < 1.0);
}

#[test]
fn sensor_tracks_floor_and_publishes_edges() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor = world.spawn(SurfaceTag::Floor).id();
    let mut schedule = Schedule::default();
    schedule.add_systems((ground_sensor, collect_edges).chain());

    write_contact(&mut world, ContactEvent::enter(actor, floor, SurfaceTag::Floor, Vec2::Y));
    schedule.run(&mut world);
    let state = world.get::<MotionState>(actor).unwrap();
    assert!(state.is_grounded);
    assert_eq!(state.current_floor, Some(floor));

    write_contact(&mut world, ContactEvent::exit(actor, floor, SurfaceTag::Floor));
    schedule.run(&mut world);
    assert!(!world.get::<MotionState>(actor).unwrap().is_grounded);

    let edges = &world.resource::<CollectedEdges>().0;
    assert_eq!(edges.len(), 2);
    assert!(matches!(edges[0], SensorEdge::Landed { body, .. } if body == actor));
    assert!(matches!(edges[1], SensorEdge::LeftGround { body, .. } if body == actor));
    assert!(edges.iter().all(|edge| edge.body() == actor));
}

#[test]
fn sensor_ignores_exit_from_untracked_floor() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor_a = world.spawn(SurfaceTag::Floor).id();
    let floor_b = world.spawn(SurfaceTag::Floor).id();

    write_contact(&mut world, ContactEvent::enter(actor, floor_a, SurfaceTag::Floor, Vec2::Y));
    write_contact(&mut world, ContactEvent::exit(actor, floor_b, SurfaceTag::Floor));
    tick_sensor(&mut world);

    let state = world.get::<MotionState>(actor).unwrap();
    assert!(state.is_grounded);
    assert_eq!(state.current_floor, Some(floor_a));
}

#[test]
fn sensor_keeps_wall_and_floor_independent() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let wall = world.spawn(SurfaceTag::Wall).id();
    let prop = world.spawn(SurfaceTag::Other).id();

    write_contact(&mut world, ContactEvent::enter(actor, wall, SurfaceTag::Wall, Vec2::X));
    write_contact(&mut world, ContactEvent::enter(actor, prop, SurfaceTag::Other, Vec2::Y));
    tick_sensor(&mut world);

    let state = world.get::<MotionState>(actor).unwrap();
    assert!(state.is_touching_wall);
    assert!(!state.is_grounded);

    write_contact(&mut world, ContactEvent::exit(actor, wall, SurfaceTag::Wall));
    tick_sensor(&mut world);
    assert!(!world.get::<MotionState>(actor).unwrap().is_touching_wall);
}

#[test]
fn stay_refreshes_floor_normal() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor = world.spawn(SurfaceTag::Floor).id();
    let slope = Vec2::new(0.6, 0.8);

    write_contact(&mut world, ContactEvent::enter(actor, floor, SurfaceTag::Floor, Vec2::Y));
    write_contact(&mut world, ContactEvent::stay(actor, floor, SurfaceTag::Floor, slope));
    tick_sensor(&mut world);

    assert_eq!(
        world.get::<MotionState>(actor).unwrap().floor_normal(),
        Some(slope)
    );
}

#[test]
fn motion_controller_accelerates_with_input() {
    let mut world = make_world(0.5);
    let actor = spawn_actor(&mut world);
    world.resource_mut::<InputState>().set_move_axis(1.0, 0.0);

    tick_motion(&mut world);

    let rb = world.get::<RigidBody>(actor).unwrap();
    assert!(approx_eq(rb.velocity.x, 1.5));
}

#[test]
fn jump_command_fires_immediately_when_grounded() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor = world.spawn(SurfaceTag::Floor).id();
    world
        .get_mut::<MotionState>(actor)
        .unwrap()
        .enter_floor(floor, Vec2::Y);
    world
        .resource_mut::<Messages<JumpCommand>>()
        .write(JumpCommand { actor });

    let mut schedule = Schedule::default();
    schedule.add_systems((motion_controller, collect_edges).chain());
    schedule.run(&mut world);

    let rb = world.get::<RigidBody>(actor).unwrap();
    assert!(approx_eq(rb.velocity.y, 7.0));
    let state = world.get::<MotionState>(actor).unwrap();
    assert!(!state.is_grounded);
    assert!(state.current_floor.is_none());
    assert!(state.jump_buffer.is_none());
    let edges = &world.resource::<CollectedEdges>().0;
    assert!(matches!(edges.as_slice(), [SensorEdge::LeftGround { .. }]));

    // The same command is not consumed twice.
    schedule.run(&mut world);
    assert!(approx_eq(world.get::<RigidBody>(actor).unwrap().velocity.y, 7.0));
}

#[test]
fn jump_impulse_follows_body_up_axis() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor = world.spawn(SurfaceTag::Floor).id();
    world.get_mut::<Rotation>(actor).unwrap().degrees = 90.0;
    world
        .get_mut::<MotionState>(actor)
        .unwrap()
        .enter_floor(floor, Vec2::Y);
    world
        .resource_mut::<Messages<JumpCommand>>()
        .write(JumpCommand { actor });

    tick_motion(&mut world);

    let rb = world.get::<RigidBody>(actor).unwrap();
    assert!((rb.velocity.x + 7.0).abs() < 1e-4);
    assert!(rb.velocity.y.abs() < 1e-4);
}

#[test]
fn align_to_floor_tracks_grounded_normal() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor = world.spawn(SurfaceTag::Floor).id();
    world
        .get_mut::<MotionState>(actor)
        .unwrap()
        .enter_floor(floor, Vec2::new(-0.6, 0.8));

    tick_align(&mut world);
    let degrees = world.get::<Rotation>(actor).unwrap().degrees;
    assert!((degrees - 36.869_9).abs() < 1e-3);

    world.get_mut::<MotionState>(actor).unwrap().exit_floor(floor);
    tick_align(&mut world);
    assert_eq!(world.get::<Rotation>(actor).unwrap().degrees, 0.0);
}

#[test]
fn selector_and_playback_publish_frame() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    let floor = world.spawn(SurfaceTag::Floor).id();
    world
        .get_mut::<MotionState>(actor)
        .unwrap()
        .enter_floor(floor, Vec2::Y);
    world
        .entity_mut(actor)
        .insert((Animation::new(), AnimationSelector::default(), Sprite::default()));

    update_world_time(&mut world, 0.01);
    tick_selector(&mut world);
    tick_playback(&mut world);

    assert_eq!(
        world.get::<Animation>(actor).unwrap().active_name(),
        Some(IDLE)
    );
    assert_eq!(
        world.get::<Sprite>(actor).unwrap().frame.as_deref(),
        Some("idle_0")
    );
}

#[test]
fn selector_flips_sprite_by_velocity() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    world.get_mut::<RigidBody>(actor).unwrap().velocity = Vec2::new(-3.0, 0.0);
    world
        .entity_mut(actor)
        .insert((Animation::new(), AnimationSelector::default(), Sprite::default()));

    tick_selector(&mut world);

    assert!(world.get::<Sprite>(actor).unwrap().flip_h);
    assert_eq!(
        world.get::<AnimationSelector>(actor).unwrap().current,
        Some(FLIP)
    );
}

#[test]
fn suppressed_selector_leaves_animation_and_facing() {
    let mut world = make_world(0.02);
    let actor = spawn_actor(&mut world);
    world.get_mut::<RigidBody>(actor).unwrap().velocity = Vec2::new(-3.0, 0.0);
    let mut selector = AnimationSelector::new(SelectorTuning::default());
    selector.suppression.begin(0, 30);
    selector.current = Some(JUMP);
    let mut animation = Animation::new();
    animation.set_active(JUMP, world.resource::<AnimationLibrary>());
    world
        .entity_mut(actor)
        .insert((animation, selector, Sprite::default()));

    update_world_time(&mut world, 0.02);
    tick_selector(&mut world);

    assert_eq!(
        world.get::<Animation>(actor).unwrap().active_name(),
        Some(JUMP)
    );
    assert!(!world.get::<Sprite>(actor).unwrap().flip_h);
}

#[test]
fn playback_scales_run_interval_with_speed() {
    let mut world = make_world(0.02);
    world.insert_resource(
        AnimationLibrary::new()
            .with_sequence(
                SequenceDef::new(RUN, ["r0", "r1"], 0.1)
                    .with_timing(FrameTiming::SpeedScaled(SpeedScaledTiming::default())),
            ),
    );
    let mut rb = RigidBody::new();
    rb.velocity = Vec2::new(8.0, 0.0);
    let mut animation = Animation::new();
    animation.set_active(RUN, world.resource::<AnimationLibrary>());
    let actor = world.spawn((rb, animation, Sprite::default())).id();

    update_world_time(&mut world, 0.001);
    tick_playback(&mut world);

    // lerp(0.1, 0.004, 0.75)
    let interval = world.get::<Animation>(actor).unwrap().effective_interval;
    assert!((interval - 0.028).abs() < 1e-4);
}
