//! Object colliders
//!
//! A collider owns one [`Obb`] and is the only writer of it. The owner
//! calls [`Collider::sync`] once per frame with the entity's world
//! transform; every other party only reads the box.

use crate::obb::Obb;
use crate::sat;
use grasp_math::{Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Default full edge length of a collider without geometry
pub const DEFAULT_COLLIDER_SIZE: f32 = 0.3;

/// Thickness given to flat plane geometry
pub const PLANE_THICKNESS: f32 = 0.1;

/// Overlap contract shared by every collider variant
pub trait Collider: Send + Sync {
    /// Which variant this is
    fn kind(&self) -> ColliderKind;

    /// Current world-space box
    fn obb(&self) -> &Obb;

    /// Follow the entity's world transform
    fn sync(&mut self, world: &Transform);

    /// Exact overlap with another box
    fn intersects(&self, other: &Obb) -> bool {
        sat::intersects(self.obb(), other)
    }
}

/// Collider variant, chosen once when the collider is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderKind {
    /// Fixed size; entity scale is ignored
    #[default]
    Box,
    /// Base size multiplied by the entity's world scale on every sync
    ScaledBox,
}

/// Fixed-size box following the entity's position and orientation
#[derive(Debug, Clone)]
pub struct BoxCollider {
    obb: Obb,
}

impl BoxCollider {
    pub fn new(size: Vec3) -> Self {
        Self {
            obb: Obb::from_size(size),
        }
    }
}

impl Collider for BoxCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Box
    }

    fn obb(&self) -> &Obb {
        &self.obb
    }

    fn sync(&mut self, world: &Transform) {
        self.obb.update(world.position, world.rotation);
    }
}

/// Box whose extents track the entity's world scale
#[derive(Debug, Clone)]
pub struct ScaledBoxCollider {
    base_size: Vec3,
    obb: Obb,
}

impl ScaledBoxCollider {
    pub fn new(base_size: Vec3) -> Self {
        Self {
            base_size: base_size.abs(),
            obb: Obb::from_size(base_size),
        }
    }

    pub fn base_size(&self) -> Vec3 {
        self.base_size
    }
}

impl Collider for ScaledBoxCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::ScaledBox
    }

    fn obb(&self) -> &Obb {
        &self.obb
    }

    fn sync(&mut self, world: &Transform) {
        self.obb.set_size(self.base_size.mul_elem(world.scale));
        self.obb.update(world.position, world.rotation);
    }
}

/// Geometry primitive a collider size can be derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive", rename_all = "lowercase")]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Plane { width: f32, height: f32 },
}

impl Geometry {
    /// Full size of the box enclosing this primitive
    pub fn bounding_size(&self) -> Vec3 {
        match *self {
            Geometry::Box { width, height, depth } => Vec3::new(width, height, depth),
            Geometry::Sphere { radius } => Vec3::splat(radius * 2.0),
            Geometry::Plane { width, height } => Vec3::new(width, PLANE_THICKNESS, height),
        }
    }
}

/// Collider description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderDesc {
    pub kind: ColliderKind,
    /// Full edge lengths
    pub size: [f32; 3],
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            kind: ColliderKind::Box,
            size: [DEFAULT_COLLIDER_SIZE; 3],
        }
    }
}

impl ColliderDesc {
    pub fn new(kind: ColliderKind, size: Vec3) -> Self {
        Self {
            kind,
            size: size.to_array(),
        }
    }

    /// Box of the given full size
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::new(ColliderKind::Box, Vec3::new(width, height, depth))
    }

    /// Size taken from a geometry primitive
    pub fn from_geometry(geometry: &Geometry) -> Self {
        Self::new(ColliderKind::Box, geometry.bounding_size())
    }

    pub fn with_kind(mut self, kind: ColliderKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn size(&self) -> Vec3 {
        Vec3::from_array(self.size)
    }

    pub fn build(&self) -> Box<dyn Collider> {
        log::debug!("building {:?} collider of size {:?}", self.kind, self.size);
        match self.kind {
            ColliderKind::Box => Box::new(BoxCollider::new(self.size())),
            ColliderKind::ScaledBox => Box::new(ScaledBoxCollider::new(self.size())),
        }
    }
}
