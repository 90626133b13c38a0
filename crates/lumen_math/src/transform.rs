// Transform helpers for Mat4.
//
// glam::Mat4 already provides transform_point3/transform_vector3; these add
// the operations mesh loading needs on top of them.

use crate::Aabb;
use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 used when placing meshes in world space.
pub trait Mat4Ext {
    /// Transform a surface normal (inverse-transpose of the upper 3x3),
    /// renormalized. Falls back to the input for singular matrices.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Bounding box of the 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        let linear = Mat3::from_mat4(*self);
        if linear.determinant().abs() < f32::EPSILON {
            return normal;
        }
        (linear.inverse().transpose() * normal).normalize_or(normal)
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { aabb.min.x } else { aabb.max.x },
                if i & 2 == 0 { aabb.min.y } else { aabb.max.y },
                if i & 4 == 0 { aabb.min.z } else { aabb.max.z },
            )
        });

        let (min, max) = corners
            .map(|corner| self.transform_point3(corner))
            .fold((Vec3::INFINITY, Vec3::NEG_INFINITY), |(min, max), p| {
                (min.min(p), max.max(p))
            });

        Aabb::from_points(min, max)
    }
}
