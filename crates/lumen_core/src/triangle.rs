//! Triangle primitive used by meshes.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Determinants below this magnitude mean the ray runs parallel to the
/// triangle plane (or the triangle is degenerate); such tests report a miss.
pub const DETERMINANT_EPSILON: f32 = 1e-5;

/// A world-space triangle with optional per-vertex normals.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    /// Vertex normals for smooth shading; `None` shades with the face normal.
    pub normals: Option<[Vec3; 3]>,
    face_normal: Vec3,
}

/// Result of a successful ray-triangle test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit point.
    pub t: f32,
    /// Barycentric coordinates of the hit (weights of vertex 1 and 2).
    pub u: f32,
    pub v: f32,
    /// Unit shading normal. Follows the winding or the vertex normals, so it
    /// may face away from the ray.
    pub normal: Vec3,
}

impl Triangle {
    /// Create a flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let face_normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            vertices: [v0, v1, v2],
            normals: None,
            face_normal,
        }
    }

    /// Create a triangle with per-vertex normals for smooth shading.
    pub fn with_normals(vertices: [Vec3; 3], normals: [Vec3; 3]) -> Self {
        Self {
            normals: Some(normals),
            ..Self::new(vertices[0], vertices[1], vertices[2])
        }
    }

    /// Unit geometric normal following the vertex winding (zero if degenerate).
    pub fn face_normal(&self) -> Vec3 {
        self.face_normal
    }

    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        0.5 * (v1 - v0).cross(v2 - v0).length()
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_point_cloud(&self.vertices)
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Not back-face culled. Returns the hit when `t` lies in `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - v0;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        if !ray_t.contains(t) {
            return None;
        }

        Some(TriangleHit {
            t,
            u,
            v,
            normal: self.shading_normal(u, v),
        })
    }

    fn shading_normal(&self, u: f32, v: f32) -> Vec3 {
        match self.normals {
            Some([n0, n1, n2]) => ((1.0 - u - v) * n0 + u * n1 + v * n2).normalize_or(self.face_normal),
            None => self.face_normal,
        }
    }
}
