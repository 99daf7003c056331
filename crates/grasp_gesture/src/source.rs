//! Joint pose input
//!
//! The XR runtime is external. Classifiers only see one frame at a time
//! through [`JointFrameSource`]; [`JointFrame`] is a plain snapshot that
//! hosts can fill from their runtime (and tests can fill by hand).

use crate::joint::{HandJoint, JointPose, JOINT_COUNT};
use grasp_core::{HandSide, PerHand};
use grasp_math::Vec3;

/// One frame of hand joint poses
pub trait JointFrameSource {
    /// Is the hand tracked at all this frame?
    fn is_tracked(&self, hand: HandSide) -> bool;

    /// World pose of a joint, if the runtime reported one
    fn joint_pose(&self, hand: HandSide, joint: HandJoint) -> Option<JointPose>;
}

/// Fetch several joints at once; `None` if any is missing
pub fn lookup_joints<const N: usize>(
    frame: &dyn JointFrameSource,
    hand: HandSide,
    joints: [HandJoint; N],
) -> Option<[JointPose; N]> {
    let mut poses = [JointPose::default(); N];
    for (slot, joint) in poses.iter_mut().zip(joints) {
        *slot = frame.joint_pose(hand, joint)?;
    }
    Some(poses)
}

/// Joint data for one tracked hand
#[derive(Debug, Clone, Default)]
pub struct HandSkeleton {
    joints: [Option<JointPose>; JOINT_COUNT],
}

impl HandSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, joint: HandJoint, pose: JointPose) {
        self.joints[joint.index()] = Some(pose);
    }

    pub fn clear(&mut self, joint: HandJoint) {
        self.joints[joint.index()] = None;
    }

    pub fn get(&self, joint: HandJoint) -> Option<JointPose> {
        self.joints[joint.index()]
    }

    /// Number of joints with pose data
    pub fn valid_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }
}

/// Snapshot of both hands for one frame
#[derive(Debug, Clone, Default)]
pub struct JointFrame {
    hands: PerHand<Option<HandSkeleton>>,
}

impl JointFrame {
    /// Frame with no tracked hands
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a hand as tracked (with no joints yet)
    pub fn track(&mut self, hand: HandSide) -> &mut HandSkeleton {
        self.hands[hand].get_or_insert_with(HandSkeleton::new)
    }

    /// Mark a hand as lost
    pub fn lose(&mut self, hand: HandSide) {
        self.hands[hand] = None;
    }

    pub fn set_joint(&mut self, hand: HandSide, joint: HandJoint, pose: JointPose) {
        self.track(hand).set(joint, pose);
    }

    /// Builder form of [`JointFrame::set_joint`]
    pub fn with_joint(mut self, hand: HandSide, joint: HandJoint, pose: JointPose) -> Self {
        self.set_joint(hand, joint, pose);
        self
    }

    /// Builder: place a joint at a position with identity orientation
    pub fn with_joint_at(self, hand: HandSide, joint: HandJoint, position: Vec3) -> Self {
        self.with_joint(hand, joint, JointPose::at(position))
    }

    pub fn skeleton(&self, hand: HandSide) -> Option<&HandSkeleton> {
        self.hands[hand].as_ref()
    }
}

impl JointFrameSource for JointFrame {
    fn is_tracked(&self, hand: HandSide) -> bool {
        self.hands[hand].is_some()
    }

    fn joint_pose(&self, hand: HandSide, joint: HandJoint) -> Option<JointPose> {
        self.hands[hand].as_ref().and_then(|skeleton| skeleton.get(joint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untracked_hand_has_no_joints() {
        let frame = JointFrame::new();
        assert!(!frame.is_tracked(HandSide::Left));
        assert!(frame.joint_pose(HandSide::Left, HandJoint::Wrist).is_none());
    }

    #[test]
    fn test_joint_lookup_requires_every_joint() {
        let frame = JointFrame::new()
            .with_joint_at(HandSide::Right, HandJoint::ThumbTip, Vec3::ZERO)
            .with_joint_at(HandSide::Right, HandJoint::IndexTip, Vec3::X);

        assert!(frame.is_tracked(HandSide::Right));
        assert!(lookup_joints(&frame, HandSide::Right, [HandJoint::ThumbTip, HandJoint::IndexTip]).is_some());
        assert!(lookup_joints(&frame, HandSide::Right, [HandJoint::ThumbTip, HandJoint::Wrist]).is_none());
        assert_eq!(frame.skeleton(HandSide::Right).map(|s| s.valid_count()), Some(2));
    }

    #[test]
    fn test_lose_hand() {
        let mut frame = JointFrame::new().with_joint_at(HandSide::Left, HandJoint::Wrist, Vec3::ZERO);
        frame.lose(HandSide::Left);
        assert!(!frame.is_tracked(HandSide::Left));
    }
}
