//! Octree spatial index over a mesh's triangles.
//!
//! Nodes live in a flat arena and refer to their children by index. Each
//! node keeps the indices of every triangle overlapping its box, so a
//! triangle straddling an octant boundary is listed in all of the octants
//! it touches.

use lumen_math::{Aabb, Interval, Ray};

use crate::triangle::{Triangle, TriangleHit};

/// Nodes holding at most this many triangles are not split further.
pub const LEAF_TRIANGLES: usize = 16;

/// Default depth limit for mesh octrees.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// One node of the octree arena.
#[derive(Clone, Debug)]
pub struct OctreeNode {
    pub bounds: Aabb,
    /// Indices into the mesh's triangle list.
    pub triangles: Vec<u32>,
    /// Arena indices of the 8 octants, `None` for leaves.
    pub children: Option<[usize; 8]>,
}

impl OctreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Triangle octree. Read-only once built.
#[derive(Clone, Debug)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    max_depth: u32,
}

impl Octree {
    /// Build an octree over `triangles` inside `bounds`.
    ///
    /// The root owns every triangle. A node is split into its 8 octants unless
    /// it is at `max_depth` or holds at most `LEAF_TRIANGLES` triangles; each
    /// octant receives the parent triangles that overlap it.
    pub fn build(triangles: &[Triangle], bounds: Aabb, max_depth: u32) -> Self {
        let mut octree = Self {
            nodes: Vec::new(),
            max_depth,
        };

        if triangles.is_empty() {
            return octree;
        }

        let all: Vec<u32> = (0..triangles.len() as u32).collect();
        octree.build_node(triangles, bounds, all, 0);
        octree
    }

    fn build_node(
        &mut self,
        triangles: &[Triangle],
        bounds: Aabb,
        owned: Vec<u32>,
        depth: u32,
    ) -> usize {
        let index = self.nodes.len();
        let split = depth < self.max_depth && owned.len() > LEAF_TRIANGLES;

        if !split {
            self.nodes.push(OctreeNode {
                bounds,
                triangles: owned,
                children: None,
            });
            return index;
        }

        // Reserve the slot so children get later indices.
        self.nodes.push(OctreeNode {
            bounds,
            triangles: Vec::new(),
            children: None,
        });

        let mut children = [0usize; 8];
        for (octant, child) in children.iter_mut().enumerate() {
            let child_bounds = bounds.octant(octant);
            let child_triangles: Vec<u32> = owned
                .iter()
                .copied()
                .filter(|&i| child_bounds.overlaps_triangle(triangles[i as usize].vertices))
                .collect();
            *child = self.build_node(triangles, child_bounds, child_triangles, depth + 1);
        }

        let node = &mut self.nodes[index];
        node.triangles = owned;
        node.children = Some(children);
        index
    }

    /// Closest intersection of `ray` with the indexed triangles within `ray_t`.
    ///
    /// `triangles` must be the slice the tree was built from.
    pub fn intersect(
        &self,
        triangles: &[Triangle],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<TriangleHit> {
        if self.nodes.is_empty() {
            return None;
        }
        self.intersect_node(0, triangles, ray, ray_t)
    }

    fn intersect_node(
        &self,
        index: usize,
        triangles: &[Triangle],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<TriangleHit> {
        let node = &self.nodes[index];
        if node.triangles.is_empty() || !node.bounds.hit(ray, ray_t) {
            return None;
        }

        let mut closest: Option<TriangleHit> = None;
        let mut search = ray_t;

        match &node.children {
            None => {
                for &i in &node.triangles {
                    if let Some(hit) = triangles[i as usize].intersect(ray, search) {
                        search = search.with_max(hit.t);
                        closest = Some(hit);
                    }
                }
            }
            Some(children) => {
                // Octants are visited in index order, not front to back, so
                // every candidate is compared against the best so far.
                for &child in children {
                    if let Some(hit) = self.intersect_node(child, triangles, ray, search) {
                        search = search.with_max(hit.t);
                        closest = Some(hit);
                    }
                }
            }
        }

        closest
    }

    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    /// Iterate over the leaf nodes.
    pub fn leaves(&self) -> impl Iterator<Item = &OctreeNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Depth of the deepest leaf (0 for a single-node tree).
    pub fn depth(&self) -> u32 {
        fn walk(nodes: &[OctreeNode], index: usize) -> u32 {
            match &nodes[index].children {
                None => 0,
                Some(children) => 1 + children.iter().map(|&c| walk(nodes, c)).max().unwrap_or(0),
            }
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}
