//! Shared rig for the end-to-end interaction tests
#![allow(dead_code)]

use grasp_gesture::{HandJoint, JointFrame};
use grasp_interact::prelude::*;
use grasp_math::Vec3;

/// Half of the thumb/index gap for a closed and an open pinch
pub const PINCH_CLOSED: f32 = 0.01;
pub const PINCH_OPEN: f32 = 0.03;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builder for a tracked two-hand joint frame
#[derive(Default, Clone)]
pub struct Hands {
    frame: JointFrame,
}

impl Hands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thumb and index tips either side of `at`; the pinch box sits on `at`
    pub fn pinch(mut self, hand: HandSide, at: Vec3, closed: bool) -> Self {
        let half = if closed { PINCH_CLOSED } else { PINCH_OPEN };
        let offset = Vec3::new(half, 0.0, 0.0);
        self.frame.set_joint(hand, HandJoint::ThumbTip, grasp_gesture::JointPose::at(at - offset));
        self.frame.set_joint(hand, HandJoint::IndexTip, grasp_gesture::JointPose::at(at + offset));
        self
    }

    /// A hand whose index tip lands on `tip`, extended or curled back
    pub fn point(mut self, hand: HandSide, tip: Vec3, extended: bool) -> Self {
        let wrist = tip + Vec3::new(0.0, 0.0, 0.12);
        let curled = wrist + Vec3::new(0.0, 0.0, -0.05);
        let index = if extended { tip } else { curled };
        let joints = [
            (HandJoint::Wrist, wrist),
            (HandJoint::ThumbTip, wrist + Vec3::new(0.05, 0.0, -0.03)),
            (HandJoint::IndexTip, index),
            (HandJoint::MiddleTip, curled),
            (HandJoint::RingTip, curled),
            (HandJoint::PinkyTip, curled),
        ];
        for (joint, position) in joints {
            self.frame.set_joint(hand, joint, grasp_gesture::JointPose::at(position));
        }
        self
    }

    pub fn frame(&self) -> &JointFrame {
        &self.frame
    }
}

/// A scene, a system with pinch and point sources, and a frame clock
pub struct World {
    pub scene: MemoryScene,
    pub system: InteractionSystem,
    pub time: FrameTime,
}

impl World {
    pub fn new() -> Self {
        let mut registry = GestureRegistry::new();
        registry
            .register(Box::new(PinchClassifier::new(PinchConfig::default())))
            .unwrap();
        registry
            .register(Box::new(PointClassifier::new(PointConfig::default())))
            .unwrap();
        Self::with_registry(registry)
    }

    pub fn with_registry(registry: GestureRegistry) -> Self {
        init_logging();
        Self {
            scene: MemoryScene::new(),
            system: InteractionSystem::new(registry),
            time: FrameTime::default(),
        }
    }

    pub fn spawn_at(&mut self, position: Vec3) -> EntityId {
        self.scene.spawn(grasp_math::Transform::from_position(position))
    }

    pub fn register(&mut self, object: InteractableObject) {
        self.system.register_object(object, &self.scene).unwrap();
    }

    /// Run one 16 ms frame
    pub fn step(&mut self, hands: &Hands) -> Vec<InteractionEvent> {
        self.time = self.time.advance(16.0);
        self.system.tick(hands.frame(), &mut self.scene, self.time)
    }

    pub fn world(&self, id: EntityId) -> grasp_math::Transform {
        self.scene.world_transform(id).unwrap()
    }

    pub fn state(&self, id: EntityId) -> ObjectState {
        self.system.object(id).unwrap().state()
    }
}

/// Event names without the raw gesture and contact traffic
pub fn interaction_names(events: &[InteractionEvent]) -> Vec<String> {
    events
        .iter()
        .filter(|e| {
            !matches!(
                e,
                InteractionEvent::Gesture(_) | InteractionEvent::ContactStart { .. } | InteractionEvent::ContactEnd { .. }
            )
        })
        .map(InteractionEvent::name)
        .collect()
}
