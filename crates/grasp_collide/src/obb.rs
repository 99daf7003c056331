//! Oriented bounding box

use grasp_math::{Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Box with a world center, positive half extents and a unit orientation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub orientation: Quat,
}

impl Obb {
    /// Half extents are forced positive and the orientation normalized
    pub fn new(center: Vec3, half_extents: Vec3, orientation: Quat) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
            orientation: orientation.normalize(),
        }
    }

    /// Axis-aligned box of full `size` at the origin
    pub fn from_size(size: Vec3) -> Self {
        Self::new(Vec3::ZERO, size * 0.5, Quat::IDENTITY)
    }

    /// Move the box; extents are unchanged
    pub fn update(&mut self, center: Vec3, orientation: Quat) {
        self.center = center;
        self.orientation = orientation.normalize();
    }

    /// Replace the full size of the box
    pub fn set_size(&mut self, size: Vec3) {
        self.half_extents = size.abs() * 0.5;
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// The box's local X, Y and Z axes in world space
    #[inline]
    pub fn axes(&self) -> [Vec3; 3] {
        self.orientation.to_axes()
    }

    /// Radius of the sphere through the box corners
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents.length()
    }

    /// Pose of the box as a unit-scale transform
    pub fn pose(&self) -> Transform {
        Transform::from_position_rotation(self.center, self.orientation)
    }

    /// Does the box contain `point` (boundary inclusive)?
    pub fn contains_point(&self, point: Vec3) -> bool {
        let local = self.orientation.inverse() * (point - self.center);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }
}

impl Default for Obb {
    fn default() -> Self {
        Self::from_size(Vec3::ONE)
    }
}
