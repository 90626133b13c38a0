//! Ray type for light transport.
//!
//! Besides its geometry a ray carries the medium it travels through, the
//! importance weight accumulated along the path, whether it has already
//! bounced off a surface and whether that last bounce was diffuse.

use std::sync::{Arc, OnceLock};

use lumen_core::{Color, Material};
use lumen_math::{Ray as GeometricRay, Vec3};

/// The shared ambient medium.
pub fn air() -> Arc<Material> {
    static AIR: OnceLock<Arc<Material>> = OnceLock::new();
    AIR.get_or_init(|| Arc::new(Material::air())).clone()
}

/// A ray with its transport state.
#[derive(Debug, Clone)]
pub struct Ray {
    geometry: GeometricRay,
    medium: Arc<Material>,
    importance: Color,
    has_bounced: bool,
    after_diffuse: bool,
}

impl Ray {
    /// Create a primary ray travelling through air with unit importance.
    ///
    /// The direction is normalized; a zero direction falls back to +Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            geometry: GeometricRay::new(origin, direction.normalize_or(Vec3::Z)),
            medium: air(),
            importance: Color::ONE,
            has_bounced: false,
            after_diffuse: false,
        }
    }

    /// Builder method to set the medium the ray travels in.
    pub fn with_medium(mut self, medium: Arc<Material>) -> Self {
        self.medium = medium;
        self
    }

    /// Builder method to set the importance weight.
    pub fn with_importance(mut self, importance: Color) -> Self {
        self.importance = importance;
        self
    }

    /// A continuation of this path after a bounce: same medium and
    /// importance, new origin and direction, marked as bounced.
    pub fn bounce(&self, origin: Vec3, direction: Vec3) -> Self {
        Self {
            geometry: GeometricRay::new(origin, direction.normalize_or(Vec3::Z)),
            medium: self.medium.clone(),
            importance: self.importance,
            has_bounced: true,
            after_diffuse: false,
        }
    }

    /// Like [`Ray::bounce`], for paths leaving a diffuse lobe. Lights reached
    /// by these rays are already counted by shadow rays.
    pub fn diffuse_bounce(&self, origin: Vec3, direction: Vec3) -> Self {
        Self {
            after_diffuse: true,
            ..self.bounce(origin, direction)
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.geometry.origin
    }

    /// Unit direction.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.geometry.direction
    }

    /// The geometric ray used for box and triangle tests.
    #[inline]
    pub fn geometry(&self) -> &GeometricRay {
        &self.geometry
    }

    pub fn medium(&self) -> &Arc<Material> {
        &self.medium
    }

    pub fn importance(&self) -> Color {
        self.importance
    }

    pub fn has_bounced(&self) -> bool {
        self.has_bounced
    }

    /// True when the last bounce sampled a diffuse lobe.
    pub fn after_diffuse(&self) -> bool {
        self.after_diffuse
    }

    /// Compute a point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.geometry.at(t)
    }
}
