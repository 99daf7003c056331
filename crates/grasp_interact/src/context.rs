//! Per-frame context shared by the state machines

use crate::event::InteractionEvent;
use crate::scene::Scene;
use grasp_collide::Obb;
use grasp_core::{EntityId, FrameTime, HandSide};
use grasp_event::EventDispatcher;
use grasp_gesture::{GestureKind, GestureRegistry};
use grasp_math::Transform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which hand boxes an object tests itself against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactProbe {
    /// The box published by one gesture source
    Source(GestureKind),
    /// Any box any registered source publishes for the hand
    AnySource,
}

impl ContactProbe {
    pub fn from_gesture(gesture: Option<GestureKind>) -> Self {
        gesture.map_or(ContactProbe::AnySource, ContactProbe::Source)
    }

    /// Is `hand` touching `object_box` according to this probe?
    pub fn touches(&self, registry: &GestureRegistry, hand: HandSide, object_box: &Obb) -> bool {
        match self {
            ContactProbe::Source(kind) => registry
                .hand_box(*kind, hand)
                .map_or(false, |hand_box| grasp_collide::intersects(object_box, hand_box)),
            ContactProbe::AnySource => registry
                .hand_boxes(hand)
                .any(|hand_box| grasp_collide::intersects(object_box, hand_box)),
        }
    }
}

impl fmt::Display for ContactProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactProbe::Source(kind) => write!(f, "{kind}"),
            ContactProbe::AnySource => write!(f, "any"),
        }
    }
}

/// Queryable interaction flags of one object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectState {
    pub clicked: bool,
    pub dragged: bool,
    pub dragover: bool,
    pub hovered: bool,
    pub grabbed: bool,
    pub stretched: bool,
}

impl ObjectState {
    /// Held by a grab or a drag
    pub fn carried(&self) -> bool {
        self.grabbed || self.dragged
    }
}

/// Everything a state machine may touch while handling one object
pub struct FrameContext<'a> {
    pub object: EntityId,
    pub time: FrameTime,
    pub registry: &'a GestureRegistry,
    pub scene: &'a mut dyn Scene,
    pub events: &'a EventDispatcher<InteractionEvent>,
}

impl<'a> FrameContext<'a> {
    pub fn emit(&self, event: InteractionEvent) {
        self.events.publish(event);
    }

    /// Unit-scale pose of the hand box `kind` publishes for `hand`
    pub fn hand_pose(&self, kind: GestureKind, hand: HandSide) -> Option<Transform> {
        self.registry.hand_box(kind, hand).map(Obb::pose)
    }

    pub fn object_world(&self) -> Option<Transform> {
        self.scene.world_transform(self.object)
    }

    /// Write the object's world pose; per-frame failures are logged, not raised
    pub fn place_object(&mut self, world: Transform) {
        if let Err(err) = self.scene.set_world_transform(self.object, world) {
            log::warn!("could not place {}: {err}", self.object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_gesture::{HandJoint, JointFrame, PinchClassifier, PinchConfig};
    use grasp_math::Vec3;

    #[test]
    fn test_probe_touches() {
        let mut registry = GestureRegistry::new();
        registry.register(Box::new(PinchClassifier::new(PinchConfig::default()))).unwrap();
        let frame = JointFrame::new()
            .with_joint_at(HandSide::Left, HandJoint::ThumbTip, Vec3::new(-0.01, 1.0, 0.0))
            .with_joint_at(HandSide::Left, HandJoint::IndexTip, Vec3::new(0.01, 1.0, 0.0));
        registry.update(&frame);

        let near = Obb::new(Vec3::new(0.0, 1.1, 0.0), Vec3::splat(0.1), Default::default());
        let far = Obb::new(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.1), Default::default());

        let pinch = ContactProbe::Source(GestureKind::Pinch);
        assert!(pinch.touches(&registry, HandSide::Left, &near));
        assert!(!pinch.touches(&registry, HandSide::Left, &far));
        assert!(!pinch.touches(&registry, HandSide::Right, &near));
        assert!(ContactProbe::AnySource.touches(&registry, HandSide::Left, &near));
        assert!(!ContactProbe::Source(GestureKind::Point).touches(&registry, HandSide::Left, &near));
    }

    #[test]
    fn test_carried() {
        let mut state = ObjectState::default();
        assert!(!state.carried());
        state.dragged = true;
        assert!(state.carried());
    }
}
