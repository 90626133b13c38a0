use crate::Vec3;

/// A geometric ray: origin, direction and the cached reciprocal of the
/// direction used by slab tests.
///
/// This carries no shading state; the renderer wraps it with the medium and
/// importance weight it needs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Component-wise `1 / direction`. Infinite on axes the ray is parallel to.
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is stored as given.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    /// Get the point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
