//! Separating-axis test between oriented boxes
//!
//! Candidate axes are the three face normals of each box plus the nine
//! pairwise cross products. Near-parallel cross products are degenerate and
//! skipped. Touching boxes (projected distance equal to the summed radii)
//! count as intersecting.

use crate::obb::Obb;
use grasp_math::Vec3;

/// Squared length under which a candidate axis is ignored
pub const DEGENERATE_AXIS_EPSILON: f32 = 1e-6;

/// Cheap early reject: do the corner spheres of both boxes overlap?
#[inline]
pub fn bounding_spheres_overlap(a: &Obb, b: &Obb) -> bool {
    let reach = a.bounding_radius() + b.bounding_radius();
    (b.center - a.center).length_squared() <= reach * reach
}

/// Exact OBB/OBB overlap
pub fn intersects(a: &Obb, b: &Obb) -> bool {
    if !bounding_spheres_overlap(a, b) {
        return false;
    }
    separating_axis(a, b).is_none()
}

/// First separating axis found, if any
pub fn separating_axis(a: &Obb, b: &Obb) -> Option<Vec3> {
    let axes_a = a.axes();
    let axes_b = b.axes();
    let offset = b.center - a.center;

    let separates = |axis: Vec3| -> bool {
        if axis.length_squared() < DEGENERATE_AXIS_EPSILON {
            return false;
        }
        let axis = axis.normalize();
        let ra = projected_radius(a.half_extents, &axes_a, axis);
        let rb = projected_radius(b.half_extents, &axes_b, axis);
        offset.dot(axis).abs() > ra + rb
    };

    for axis in axes_a.iter().chain(axes_b.iter()) {
        if separates(*axis) {
            return Some(*axis);
        }
    }
    for ua in &axes_a {
        for ub in &axes_b {
            let axis = ua.cross(*ub);
            if separates(axis) {
                return Some(axis.normalize());
            }
        }
    }
    None
}

#[inline]
fn projected_radius(half: Vec3, axes: &[Vec3; 3], axis: Vec3) -> f32 {
    (half.x * axes[0].dot(axis)).abs()
        + (half.y * axes[1].dot(axis)).abs()
        + (half.z * axes[2].dot(axis)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_math::Quat;

    fn unit_cube(center: Vec3, orientation: Quat) -> Obb {
        Obb::new(center, Vec3::splat(0.5), orientation)
    }

    #[test]
    fn test_overlapping_cubes() {
        let a = unit_cube(Vec3::ZERO, Quat::IDENTITY);
        let b = unit_cube(Vec3::new(0.9, 0.0, 0.0), Quat::IDENTITY);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_separated_cubes() {
        let a = unit_cube(Vec3::ZERO, Quat::IDENTITY);
        let b = unit_cube(Vec3::new(1.1, 0.0, 0.0), Quat::IDENTITY);
        assert!(!intersects(&a, &b));
        let axis = separating_axis(&a, &b);
        assert!(axis.is_some());
    }

    #[test]
    fn test_touching_faces_count_as_contact() {
        let a = unit_cube(Vec3::ZERO, Quat::IDENTITY);
        let b = unit_cube(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_rotation_invariance() {
        let rotations = [
            Quat::from_rotation_y(0.7),
            Quat::from_euler(0.3, -1.2, 2.0),
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), 2.5),
        ];
        for rotation in rotations {
            for distance in [0.9_f32, 1.1] {
                let a = unit_cube(Vec3::ZERO, rotation);
                let b = unit_cube(rotation * Vec3::new(distance, 0.0, 0.0), rotation);
                assert_eq!(intersects(&a, &b), distance < 1.0, "distance {distance}");
            }
        }
    }

    #[test]
    fn test_crossed_bars() {
        let a = Obb::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.1, 0.1),
            Quat::from_rotation_y(core::f32::consts::FRAC_PI_4),
        );
        let b = Obb::new(
            Vec3::new(0.0, 0.25, 0.0),
            Vec3::new(0.1, 0.1, 1.0),
            Quat::from_rotation_y(core::f32::consts::FRAC_PI_4),
        );
        assert!(!intersects(&a, &b));

        let b_low = Obb { center: Vec3::new(0.0, 0.15, 0.0), ..b };
        assert!(intersects(&a, &b_low));
    }

    #[test]
    fn test_parallel_boxes_skip_degenerate_axes() {
        // Identical orientations make all nine cross products zero
        let rotation = Quat::from_rotation_x(0.4);
        let a = unit_cube(Vec3::ZERO, rotation);
        let b = unit_cube(Vec3::new(0.0, 0.2, 0.1), rotation);
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_sphere_reject_is_conservative() {
        let a = unit_cube(Vec3::ZERO, Quat::IDENTITY);
        let corner = unit_cube(Vec3::new(0.95, 0.95, 0.95), Quat::IDENTITY);
        assert!(bounding_spheres_overlap(&a, &corner));
        assert!(intersects(&a, &corner));
    }
}
