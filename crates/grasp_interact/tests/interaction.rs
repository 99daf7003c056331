//! Click, hover and lifecycle behavior through the full frame pipeline

mod common;

use common::{interaction_names, Hands, World};
use grasp_interact::prelude::*;
use grasp_math::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;

const TARGET: Vec3 = Vec3::new(0.0, 1.0, -0.3);

fn clickable_world(config: ClickableConfig) -> (World, EntityId) {
    let mut world = World::new();
    let button = world.spawn_at(TARGET);
    world.register(InteractableObject::new(button, ColliderDesc::default()).with_clickable(config));
    (world, button)
}

fn click_hand(event: &InteractionEvent) -> Option<(String, HandSide)> {
    match event {
        InteractionEvent::ClickStart { hand, .. } | InteractionEvent::ClickEnd { hand, .. } => {
            Some((event.name(), *hand))
        }
        _ => None,
    }
}

#[test]
fn test_point_click_fifo_with_single_clicker() {
    let (mut world, button) = clickable_world(ClickableConfig::default().with_max_clickers(1));
    let left = TARGET + Vec3::new(-0.05, 0.0, 0.0);
    let right = TARGET + Vec3::new(0.05, 0.0, 0.0);

    let events = world.step(
        &Hands::new()
            .point(HandSide::Left, left, true)
            .point(HandSide::Right, right, false),
    );
    let clicks: Vec<_> = events.iter().filter_map(click_hand).collect();
    assert_eq!(clicks, vec![("click-start".to_string(), HandSide::Left)]);
    assert!(world.state(button).clicked);

    let events = world.step(
        &Hands::new()
            .point(HandSide::Left, left, true)
            .point(HandSide::Right, right, true),
    );
    let clicks: Vec<_> = events.iter().filter_map(click_hand).collect();
    assert_eq!(
        clicks,
        vec![
            ("click-end".to_string(), HandSide::Left),
            ("click-start".to_string(), HandSide::Right),
        ]
    );
    let clickable = world.system.object(button).unwrap().clickable().unwrap();
    assert_eq!(clickable.clickers(), vec![HandSide::Right]);
}

#[test]
fn test_click_duration_and_release_on_withdraw() {
    let (mut world, button) = clickable_world(ClickableConfig::default());
    let tip = TARGET;

    world.step(&Hands::new().point(HandSide::Right, tip, true));
    world.step(&Hands::new().point(HandSide::Right, tip, true));
    assert!(world.state(button).clicked);

    // Pulling the whole hand back out of the box ends the click on contact loss
    let away = tip + Vec3::new(0.0, 0.0, 1.0);
    let events = world.step(&Hands::new().point(HandSide::Right, away, true));
    let end = events
        .iter()
        .find_map(|e| match e {
            InteractionEvent::ClickEnd { duration_ms, clickers, .. } => Some((*duration_ms, *clickers)),
            _ => None,
        })
        .unwrap();
    assert_eq!(end, (32.0, 0));
    assert!(!world.state(button).clicked);
}

#[test]
fn test_tracking_loss_ends_gesture_once() {
    let mut world = World::new();
    let cube = world.spawn_at(TARGET);
    world.register(InteractableObject::new(cube, ColliderDesc::default()).with_grabbable(GrabbableConfig::default()));

    world.step(&Hands::new().pinch(HandSide::Right, TARGET, false));
    let events = world.step(&Hands::new().pinch(HandSide::Right, TARGET, true));
    assert_eq!(interaction_names(&events), vec!["grab-start"]);

    let events = world.step(&Hands::new());
    let pinch_ends: Vec<&GestureEvent> = events
        .iter()
        .filter_map(|e| match e {
            InteractionEvent::Gesture(g) if g.is_end() => Some(g),
            _ => None,
        })
        .collect();
    assert_eq!(pinch_ends.len(), 1);
    assert!(pinch_ends[0].tracking_lost);
    assert_eq!(interaction_names(&events), vec!["grab-end"]);
    assert!(!world.state(cube).grabbed);
    assert!(!world.system.registry().is_active(GestureKind::Pinch, HandSide::Right));

    let events = world.step(&Hands::new());
    assert!(events.is_empty());
}

#[test]
fn test_hover_aggregate_across_hands() {
    let mut world = World::new();
    let lamp = world.spawn_at(TARGET);
    world.register(InteractableObject::new(lamp, ColliderDesc::default()).with_hoverable(HoverableConfig::default()));

    let inside = TARGET;
    let outside = TARGET + Vec3::new(0.0, 2.0, 0.0);
    let frames = [
        Hands::new().pinch(HandSide::Left, inside, false),
        Hands::new()
            .pinch(HandSide::Left, inside, false)
            .pinch(HandSide::Right, inside, false),
        Hands::new()
            .pinch(HandSide::Left, outside, false)
            .pinch(HandSide::Right, inside, false),
        Hands::new()
            .pinch(HandSide::Left, outside, false)
            .pinch(HandSide::Right, outside, false),
    ];

    let mut summary = Vec::new();
    let mut hovered = Vec::new();
    for hands in &frames {
        for event in world.step(hands) {
            if let InteractionEvent::HoverStart { hands, .. } | InteractionEvent::HoverEnd { hands, .. } = event {
                summary.push((event.name(), hands));
            }
        }
        hovered.push(world.state(lamp).hovered);
    }

    assert_eq!(
        summary,
        vec![
            ("hover-start".to_string(), 1),
            ("hover-start".to_string(), 2),
            ("hover-end".to_string(), 1),
            ("hover-end".to_string(), 0),
        ]
    );
    assert_eq!(hovered, vec![true, true, true, false]);
}

#[test]
fn test_hover_restricted_to_one_source() {
    let mut world = World::new();
    let lamp = world.spawn_at(TARGET);
    world.register(
        InteractableObject::new(lamp, ColliderDesc::default())
            .with_hoverable(HoverableConfig::default().with_gesture(GestureKind::Point)),
    );

    // Pinch-only joints give no point box, so nothing hovers
    let events = world.step(&Hands::new().pinch(HandSide::Left, TARGET, false));
    assert!(interaction_names(&events).is_empty());

    let events = world.step(&Hands::new().point(HandSide::Left, TARGET, false));
    assert_eq!(interaction_names(&events), vec!["hover-start"]);
}

#[test]
fn test_subscribers_see_every_event_in_order() {
    let (mut world, _) = clickable_world(ClickableConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = world.system.subscribe(move |event| sink.lock().push(event.name()));

    let delivered = world.step(&Hands::new().point(HandSide::Left, TARGET, true));
    let names: Vec<String> = delivered.iter().map(InteractionEvent::name).collect();
    assert_eq!(*seen.lock(), names);
    assert!(names.contains(&"click-start".to_string()));

    assert!(world.system.unsubscribe(id));
    world.step(&Hands::new());
    assert_eq!(seen.lock().len(), names.len());
}

#[test]
fn test_late_source_registration_wakes_machine() {
    let mut registry = GestureRegistry::new();
    registry
        .register(Box::new(PinchClassifier::new(PinchConfig::default())))
        .unwrap();
    let mut world = World::with_registry(registry);
    let button = world.spawn_at(TARGET);
    world.register(InteractableObject::new(button, ColliderDesc::default()).with_clickable(ClickableConfig::default()));

    let pointing = Hands::new().point(HandSide::Right, TARGET, true);
    assert!(interaction_names(&world.step(&pointing)).is_empty());
    assert!(!world.state(button).clicked);

    world
        .system
        .register_source(Box::new(PointClassifier::new(PointConfig::default())))
        .unwrap();
    let events = world.step(&pointing);
    assert_eq!(interaction_names(&events), vec!["click-start"]);
}

#[test]
fn test_unregister_ends_sessions() {
    let mut world = World::new();
    let cube = world.spawn_at(TARGET);
    world.register(
        InteractableObject::new(cube, ColliderDesc::default())
            .with_grabbable(GrabbableConfig::default())
            .with_hoverable(HoverableConfig::default()),
    );

    world.step(&Hands::new().pinch(HandSide::Left, TARGET, false));
    world.step(&Hands::new().pinch(HandSide::Left, TARGET, true));
    assert!(world.state(cube).grabbed);

    let removed = world
        .system
        .unregister_object(cube, &mut world.scene, world.time)
        .unwrap();
    assert!(!removed.state().grabbed);
    assert!(!removed.state().hovered);
    assert!(world.system.is_empty());
    assert_eq!(world.system.pending_events(), 2);

    let names = interaction_names(&world.step(&Hands::new().pinch(HandSide::Left, TARGET, true)));
    assert_eq!(names, vec!["grab-end", "hover-end"]);
}

#[test]
fn test_shutdown_flushes_sessions() {
    let (mut world, button) = clickable_world(ClickableConfig::default());
    world.step(&Hands::new().point(HandSide::Left, TARGET, true));
    assert!(world.state(button).clicked);

    let events = world.system.shutdown(&mut world.scene, world.time);
    assert_eq!(interaction_names(&events), vec!["click-end"]);
    assert!(world.system.is_empty());
}
