//! Photon storage: a kd-tree over photon positions.
//!
//! Photons are inserted one at a time while they are emitted, then the tree
//! is rebuilt balanced once with `optimize` before any lookups. Nodes live
//! in a flat arena indexed by `usize`.

use std::f32::consts::PI;

use lumen_core::Color;
use lumen_math::Vec3;

/// A packet of light flux that landed on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub position: Vec3,
    /// Unit direction back towards where the photon came from.
    pub direction_in: Vec3,
    pub delta_flux: Color,
}

impl Photon {
    /// Gather radius used for density estimation, in scene units.
    pub const RADIUS: f32 = 0.1;

    /// Area of the gather disk, `π·R²`.
    pub fn gather_area() -> f32 {
        PI * Self::RADIUS * Self::RADIUS
    }
}

#[derive(Debug, Clone)]
struct KdNode {
    photon: Photon,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// kd-tree of photons supporting radius queries.
#[derive(Debug, Clone, Default)]
pub struct PhotonMap {
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

impl PhotonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all stored photons in arena order.
    pub fn photons(&self) -> impl Iterator<Item = &Photon> {
        self.nodes.iter().map(|node| &node.photon)
    }

    /// Insert one photon, descending from the root and cycling the split
    /// axis x, y, z with depth.
    pub fn insert(&mut self, photon: Photon) {
        let new_index = self.nodes.len();

        let Some(mut current) = self.root else {
            self.nodes.push(KdNode {
                photon,
                axis: 0,
                left: None,
                right: None,
            });
            self.root = Some(new_index);
            return;
        };

        loop {
            let node = &self.nodes[current];
            let axis = node.axis;
            let go_left = photon.position[axis] < node.photon.position[axis];
            let next = if go_left { node.left } else { node.right };

            match next {
                Some(child) => current = child,
                None => {
                    self.nodes.push(KdNode {
                        photon,
                        axis: (axis + 1) % 3,
                        left: None,
                        right: None,
                    });
                    let parent = &mut self.nodes[current];
                    if go_left {
                        parent.left = Some(new_index);
                    } else {
                        parent.right = Some(new_index);
                    }
                    return;
                }
            }
        }
    }

    /// Rebuild the tree balanced by splitting at the median of each axis.
    pub fn optimize(&mut self) {
        let mut photons: Vec<Photon> = self.nodes.drain(..).map(|node| node.photon).collect();
        self.root = self.build_balanced(&mut photons, 0);
    }

    fn build_balanced(&mut self, photons: &mut [Photon], depth: usize) -> Option<usize> {
        if photons.is_empty() {
            return None;
        }

        let axis = depth % 3;
        let median = photons.len() / 2;
        photons.select_nth_unstable_by(median, |a, b| {
            a.position[axis].total_cmp(&b.position[axis])
        });

        let index = self.nodes.len();
        self.nodes.push(KdNode {
            photon: photons[median],
            axis,
            left: None,
            right: None,
        });

        let (lower, rest) = photons.split_at_mut(median);
        let left = self.build_balanced(lower, depth + 1);
        let right = self.build_balanced(&mut rest[1..], depth + 1);

        let node = &mut self.nodes[index];
        node.left = left;
        node.right = right;
        Some(index)
    }

    /// Every photon within Euclidean distance `radius` of `point`, unordered.
    pub fn within_radius(&self, point: Vec3, radius: f32) -> Vec<&Photon> {
        let mut found = Vec::new();
        let radius_squared = radius * radius;

        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.photon.position.distance_squared(point) <= radius_squared {
                found.push(&node.photon);
            }

            let delta = point[node.axis] - node.photon.position[node.axis];
            // Equal keys can sit on either side after a rebuild, so the
            // comparisons are inclusive.
            if delta <= radius {
                stack.extend(node.left);
            }
            if delta >= -radius {
                stack.extend(node.right);
            }
        }

        found
    }
}
