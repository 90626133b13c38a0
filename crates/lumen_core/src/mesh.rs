//! Indexed triangle mesh geometry.
//!
//! Meshes are loaded in object space, placed in world space once with
//! `transform`, and then flattened into `Triangle`s for the octree.

use lumen_math::{Aabb, Mat4, Mat4Ext, Vec3};

use crate::triangle::Triangle;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - computed on demand by `ensure_normals`)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box of the positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Aabb::from_point_cloud(&positions);
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Apply a model matrix to positions and normals in place.
    pub fn transform(&mut self, matrix: &Mat4) {
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = matrix.transform_normal(*n);
            }
        }
        self.bounds = Aabb::from_point_cloud(&self.positions);
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Each vertex normal is the normalized sum of the (area weighted) face
    /// normals of the triangles sharing it.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Flatten the indexed mesh into triangles.
    ///
    /// Triangles referencing out-of-range vertices are skipped with a warning.
    pub fn triangles(&self) -> Vec<Triangle> {
        let vertex_count = self.positions.len();
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for face in self.indices.chunks_exact(3) {
            let idx = [face[0] as usize, face[1] as usize, face[2] as usize];
            if idx.iter().any(|&i| i >= vertex_count) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    idx,
                    vertex_count
                );
                continue;
            }

            let vertices = idx.map(|i| self.positions[i]);
            let triangle = match &self.normals {
                Some(normals) if normals.len() == vertex_count => {
                    Triangle::with_normals(vertices, idx.map(|i| normals[i]))
                }
                _ => Triangle::new(vertices[0], vertices[1], vertices[2]),
            };
            triangles.push(triangle);
        }

        triangles
    }
}
