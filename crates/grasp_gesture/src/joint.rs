//! Hand joints and joint poses

use crate::error::GestureError;
use grasp_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The 25 hand joints exposed by WebXR-style hand input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandJoint {
    Wrist,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexProximal,
    IndexIntermediate,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleIntermediate,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingProximal,
    RingIntermediate,
    RingDistal,
    RingTip,
    PinkyMetacarpal,
    PinkyProximal,
    PinkyIntermediate,
    PinkyDistal,
    PinkyTip,
}

/// Total number of joints per hand.
pub const JOINT_COUNT: usize = 25;

impl HandJoint {
    /// Every joint, in runtime order
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        Self::Wrist,
        Self::ThumbMetacarpal,
        Self::ThumbProximal,
        Self::ThumbDistal,
        Self::ThumbTip,
        Self::IndexMetacarpal,
        Self::IndexProximal,
        Self::IndexIntermediate,
        Self::IndexDistal,
        Self::IndexTip,
        Self::MiddleMetacarpal,
        Self::MiddleProximal,
        Self::MiddleIntermediate,
        Self::MiddleDistal,
        Self::MiddleTip,
        Self::RingMetacarpal,
        Self::RingProximal,
        Self::RingIntermediate,
        Self::RingDistal,
        Self::RingTip,
        Self::PinkyMetacarpal,
        Self::PinkyProximal,
        Self::PinkyIntermediate,
        Self::PinkyDistal,
        Self::PinkyTip,
    ];

    /// Convert joint enum to array index (0-24).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Joint name as reported by the runtime
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbMetacarpal => "thumb-metacarpal",
            Self::ThumbProximal => "thumb-phalanx-proximal",
            Self::ThumbDistal => "thumb-phalanx-distal",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMetacarpal => "index-finger-metacarpal",
            Self::IndexProximal => "index-finger-phalanx-proximal",
            Self::IndexIntermediate => "index-finger-phalanx-intermediate",
            Self::IndexDistal => "index-finger-phalanx-distal",
            Self::IndexTip => "index-finger-tip",
            Self::MiddleMetacarpal => "middle-finger-metacarpal",
            Self::MiddleProximal => "middle-finger-phalanx-proximal",
            Self::MiddleIntermediate => "middle-finger-phalanx-intermediate",
            Self::MiddleDistal => "middle-finger-phalanx-distal",
            Self::MiddleTip => "middle-finger-tip",
            Self::RingMetacarpal => "ring-finger-metacarpal",
            Self::RingProximal => "ring-finger-phalanx-proximal",
            Self::RingIntermediate => "ring-finger-phalanx-intermediate",
            Self::RingDistal => "ring-finger-phalanx-distal",
            Self::RingTip => "ring-finger-tip",
            Self::PinkyMetacarpal => "pinky-finger-metacarpal",
            Self::PinkyProximal => "pinky-finger-phalanx-proximal",
            Self::PinkyIntermediate => "pinky-finger-phalanx-intermediate",
            Self::PinkyDistal => "pinky-finger-phalanx-distal",
            Self::PinkyTip => "pinky-finger-tip",
        }
    }

    /// Fingertip joints for convenience.
    pub fn fingertip_joints() -> [HandJoint; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::PinkyTip,
        ]
    }
}

impl FromStr for HandJoint {
    type Err = GestureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|joint| joint.as_str() == name)
            .ok_or_else(|| GestureError::UnknownJoint(name.to_string()))
    }
}

/// Pose data for a single joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPose {
    /// World position in meters
    pub position: Vec3,
    /// World orientation
    pub orientation: Quat,
    /// Joint radius in meters.
    pub radius: f32,
}

impl JointPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            radius: 0.01,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for JointPose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
