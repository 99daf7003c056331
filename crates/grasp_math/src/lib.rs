//! # grasp_math - Interaction Math
//!
//! The small set of 3D primitives the interaction core needs: vectors,
//! unit quaternions and position/rotation/scale transforms that compose
//! with non-uniform scale.

pub mod quaternion;
pub mod transform;
pub mod vector;

pub use quaternion::*;
pub use transform::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const FRAC_PI_4: f32 = PI / 4.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

pub mod prelude {
    pub use crate::quaternion::Quat;
    pub use crate::transform::Transform;
    pub use crate::vector::Vec3;
    pub use crate::clamp;
}
