//! Parallelogram primitive, also the emitting surface of area lights.

use lumen_math::{Aabb, Interval, Ray, Vec3};

use crate::hit::SurfaceHit;

const DETERMINANT_EPSILON: f32 = 1e-5;

/// Parallelogram spanned by `p1 - p0` and `p2 - p0` from corner `p0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    normal: Vec3,
    area: f32,
}

impl Plane {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let cross = edge1.cross(edge2);
        Self {
            origin: p0,
            edge1,
            edge2,
            normal: cross.normalize_or_zero(),
            area: cross.length(),
        }
    }

    /// Unit normal, `edge1 × edge2`.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    /// Point at parametric coordinates `(u, v)` in `[0, 1]²`.
    pub fn point_on_surface(&self, u: f32, v: f32) -> Vec3 {
        self.origin + u * self.edge1 + v * self.edge2
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_point_cloud(&[
            self.origin,
            self.origin + self.edge1,
            self.origin + self.edge2,
            self.origin + self.edge1 + self.edge2,
        ])
    }

    /// Möller-Trumbore against the parallelogram (both parameters in
    /// `[0, 1]` instead of the triangle's `u + v <= 1`). Two-sided.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        let p = ray.direction.cross(self.edge2);
        let det = self.edge1.dot(p);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - self.origin;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = ray.direction.dot(q) * inv_det;
        if !(0.0..=1.0).contains(&v) {
            return None;
        }

        let t = self.edge2.dot(q) * inv_det;
        if !ray_t.contains(t) {
            return None;
        }

        Some(SurfaceHit {
            t,
            normal: self.normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Plane {
        Plane::new(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, -1.0),
        )
    }

    #[test]
    fn test_normal_and_area() {
        let plane = floor();
        assert!((plane.normal() - Vec3::Y).length() < 1e-6);
        assert!((plane.area() - 4.0).abs() < 1e-6);
        assert_eq!(plane.point_on_surface(1.0, 1.0), Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_hit_whole_parallelogram() {
        let plane = floor();
        // Beyond the diagonal, where a triangle test would miss.
        let ray = Ray::new(Vec3::new(0.9, 2.0, -0.9), -Vec3::Y);
        let hit = plane.intersect(&ray, Interval::from_min(1e-5)).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);

        // Two-sided
        let ray = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        assert!(plane.intersect(&ray, Interval::from_min(1e-5)).is_some());
    }

    #[test]
    fn test_miss_outside_and_parallel() {
        let plane = floor();
        let ray = Ray::new(Vec3::new(1.5, 2.0, 0.0), -Vec3::Y);
        assert!(plane.intersect(&ray, Interval::from_min(1e-5)).is_none());

        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(plane.intersect(&ray, Interval::from_min(1e-5)).is_none());
    }
}
