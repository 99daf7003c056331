//! Position / rotation / scale transforms
//!
//! Composition follows the scene-graph convention used by the interaction
//! core: a child's world transform is `parent.compose(&local)`, and
//! `local = world.relative_to(&parent)` is its exact inverse. Scale is
//! applied per component and is never skewed by rotation, which keeps the
//! two operations symmetric for non-uniform scale.

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Complete 3D transform with position, rotation, and scale
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rigid pose, unit scale
    #[inline]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Map a point from local into this transform's space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point.mul_elem(self.scale)
    }

    /// Map a point from this transform's space back into local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        (self.rotation.inverse() * (point - self.position)).div_elem(self.scale)
    }

    /// World transform of a child whose local transform is `local`
    pub fn compose(&self, local: &Transform) -> Self {
        Self {
            position: self.transform_point(local.position),
            rotation: (self.rotation * local.rotation).normalize(),
            scale: self.scale.mul_elem(local.scale),
        }
    }

    /// Express `self` (a world transform) in the frame of `parent`
    pub fn relative_to(&self, parent: &Transform) -> Self {
        Self {
            position: parent.inverse_transform_point(self.position),
            rotation: (parent.rotation.inverse() * self.rotation).normalize(),
            scale: self.scale.div_elem(parent.scale),
        }
    }

    /// Positions within `epsilon`, rotations equivalent, scales within `epsilon`
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        (self.position - other.position).length() <= epsilon
            && self.rotation.same_rotation(other.rotation, epsilon)
            && (self.scale - other.scale).length() <= epsilon
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl core::ops::Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}
