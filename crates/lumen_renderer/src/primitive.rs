//! The closed set of renderable shapes.

use std::sync::Arc;

use lumen_core::{Material, Mesh, Octree, Triangle};
use lumen_math::{Aabb, Interval, Ray};

use crate::hit::SurfaceHit;
use crate::plane::Plane;
use crate::sphere::Sphere;

/// A world-space triangle mesh with its octree.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    octree: Octree,
    bounds: Aabb,
}

impl TriangleMesh {
    /// Flatten `mesh` and build its octree over the mesh bounds.
    pub fn new(mesh: &Mesh, max_depth: u32) -> Self {
        let triangles = mesh.triangles();
        let bounds = mesh.bounds;
        let octree = Octree::build(&triangles, bounds, max_depth);

        log::info!(
            "Built octree: {} triangles, {} nodes, {} leaves, depth {}",
            triangles.len(),
            octree.node_count(),
            octree.leaf_count(),
            octree.depth()
        );

        Self {
            triangles,
            octree,
            bounds,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        self.octree
            .intersect(&self.triangles, ray, ray_t)
            .map(|hit| SurfaceHit {
                t: hit.t,
                normal: hit.normal,
            })
    }
}

/// Shape of a scene object.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Mesh(TriangleMesh),
}

impl Primitive {
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(ray, ray_t),
            Primitive::Plane(plane) => plane.intersect(ray, ray_t),
            Primitive::Mesh(mesh) => mesh.intersect(ray, ray_t),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(sphere) => sphere.bounding_box(),
            Primitive::Plane(plane) => plane.bounding_box(),
            Primitive::Mesh(mesh) => mesh.bounding_box(),
        }
    }
}

/// A primitive together with its material.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub primitive: Primitive,
    pub material: Arc<Material>,
}
