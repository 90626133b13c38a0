use crate::{Interval, Ray, Vec3};

/// Minimum extent along any axis. Flat geometry (a planar mesh, a single
/// triangle) would otherwise produce zero-width boxes.
const MIN_EXTENT: f32 = 0.0001;

/// Slack added to the box half-size in the triangle overlap test so that
/// triangles lying exactly on a boundary are kept by both neighbours.
const OVERLAP_EPSILON: f32 = 1e-5;

/// Axis-aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box (contains nothing); the identity for `surrounding`.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box containing every point, or `EMPTY` for no points.
    pub fn from_point_cloud(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Aabb::EMPTY;
        }
        let (min, max) = points.iter().fold(
            (Vec3::INFINITY, Vec3::NEG_INFINITY),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        Aabb::from_points(min, max)
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// One of the eight boxes obtained by halving every axis.
    ///
    /// Bit 0 of `index` selects the upper half along X, bit 1 along Y and
    /// bit 2 along Z, so index 0 is the child touching `min` and index 7 the
    /// child touching `max`.
    pub fn octant(&self, index: usize) -> Aabb {
        let center = self.centroid();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if index & bit == 0 {
                (lo, mid)
            } else {
                (mid, hi)
            }
        };
        let (x0, x1) = pick(1, self.min.x, center.x, self.max.x);
        let (y0, y1) = pick(2, self.min.y, center.y, self.max.y);
        let (z0, z1) = pick(4, self.min.z, center.z, self.max.z);
        Aabb {
            min: Vec3::new(x0, y0, z0),
            max: Vec3::new(x1, y1, z1),
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method using the ray's cached reciprocal direction. A ray whose
    /// origin lies inside the box always hits it for any interval starting
    /// at or before zero.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in 0..3 {
            let inv = ray.inv_direction[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f32::max/min ignore NaN, which appears when the ray is parallel
            // to a slab and starts exactly on its boundary.
            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max < t_min {
                return false;
            }
        }

        true
    }

    /// Conservative box/triangle overlap (separating axis theorem).
    ///
    /// Tests the three box face normals, the triangle normal and the nine
    /// cross products of box edges with triangle edges. Returns false only
    /// when one of those axes separates the two shapes.
    pub fn overlaps_triangle(&self, triangle: [Vec3; 3]) -> bool {
        let center = self.centroid();
        let half = self.half_extents() + Vec3::splat(OVERLAP_EPSILON);
        let v = triangle.map(|p| p - center);

        // Box face normals: the triangle's own bounds against the box.
        let tri_min = v[0].min(v[1]).min(v[2]);
        let tri_max = v[0].max(v[1]).max(v[2]);
        if tri_min.cmpgt(half).any() || tri_max.cmplt(-half).any() {
            return false;
        }

        let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

        // Triangle plane against the box.
        let normal = edges[0].cross(edges[1]);
        let radius = half.dot(normal.abs());
        if normal.dot(v[0]).abs() > radius {
            return false;
        }

        for edge in edges {
            for box_axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                if separates(box_axis.cross(edge), &v, half) {
                    return false;
                }
            }
        }

        true
    }

    fn pad_to_minimums(&mut self) {
        let size = self.max - self.min;
        for axis in 0..3 {
            if size[axis] < MIN_EXTENT {
                let pad = (MIN_EXTENT - size[axis]) * 0.5;
                self.min[axis] -= pad;
                self.max[axis] += pad;
            }
        }
    }
}

/// True when projecting the triangle and the box onto `axis` gives disjoint
/// ranges. A zero axis (parallel edges) never separates.
fn separates(axis: Vec3, v: &[Vec3; 3], half: Vec3) -> bool {
    let p = v.map(|x| axis.dot(x));
    let radius = half.dot(axis.abs());
    let lo = p[0].min(p[1]).min(p[2]);
    let hi = p[0].max(p[1]).max(p[2]);
    lo > radius || hi < -radius
}
