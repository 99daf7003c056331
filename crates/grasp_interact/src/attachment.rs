//! Hand attachment
//!
//! A grabbed object is never moved under the hand in the scene graph.
//! Instead an [`Attachment`] records the object's pose in the hand's frame
//! at grab time, and every tick the object's world pose is recomputed from
//! the current hand pose. Releasing writes the last pose back relative to
//! the parent the object had when it was grabbed.

use crate::error::{InteractError, Result};
use crate::scene::Scene;
use grasp_core::{EntityId, HandSide};
use grasp_math::{Transform, Vec3};

/// An object logically held by one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub owner: EntityId,
    pub hand: HandSide,
    /// Parent at grab time, restored on release
    pub original_parent: Option<EntityId>,
    /// Object pose in the hand frame
    pub offset: Transform,
    /// Object world position when the hand took hold
    pub grab_center: Vec3,
    /// Hand world position when the hand took hold
    pub hand_origin: Vec3,
}

impl Attachment {
    /// Attach `owner`, currently at `object_world`, to a hand at `hand_pose`
    pub fn capture(
        owner: EntityId,
        hand: HandSide,
        original_parent: Option<EntityId>,
        hand_pose: &Transform,
        object_world: &Transform,
    ) -> Self {
        Self {
            owner,
            hand,
            original_parent,
            offset: object_world.relative_to(hand_pose),
            grab_center: object_world.position,
            hand_origin: hand_pose.position,
        }
    }

    /// Same object and parent, new hand frame, from where the object is now
    pub fn rebind(&self, hand: HandSide, hand_pose: &Transform, object_world: &Transform) -> Self {
        Self::capture(self.owner, hand, self.original_parent, hand_pose, object_world)
    }

    /// World pose that keeps the object rigidly on the hand
    pub fn follow(&self, hand_pose: &Transform) -> Transform {
        hand_pose.compose(&self.offset)
    }

    /// World pose with the hand's displacement mirrored around the grab point.
    /// Orientation still follows the hand.
    pub fn mirror(&self, hand_pose: &Transform) -> Transform {
        let displacement = hand_pose.position - self.hand_origin;
        let follow = self.follow(hand_pose);
        follow.with_position(self.grab_center - displacement)
    }

    /// Hand the object back to its original parent at its current world pose
    pub fn release(&self, scene: &mut dyn Scene) -> Result<Transform> {
        let world = scene
            .world_transform(self.owner)
            .ok_or(InteractError::EntityNotFound(self.owner))?;
        if scene.parent(self.owner) != self.original_parent {
            scene.set_parent(self.owner, self.original_parent)?;
        }
        scene.set_world_transform(self.owner, world)?;
        Ok(world)
    }
}
