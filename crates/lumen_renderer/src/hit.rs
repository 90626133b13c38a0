//! Intersection records.

use std::sync::Arc;

use lumen_core::{Color, Material};
use lumen_math::Vec3;

/// Where a ray meets a bare surface, before any material is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub t: f32,
    /// Unit normal. Not oriented towards the ray.
    pub normal: Vec3,
}

/// Closest object hit along a ray.
#[derive(Debug, Clone)]
pub struct Hit {
    /// Ray parameter; smaller is closer.
    pub t: f32,
    /// Unit surface normal. May point away from the ray; compare its sign
    /// with the ray direction to find out which side was hit.
    pub normal: Vec3,
    /// Material of the surface that was hit.
    pub material: Arc<Material>,
}

/// Closest emitter hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightHit {
    /// Emitted power per unit area, per channel.
    pub radiosity: Color,
    /// Area of the emitter.
    pub area: f32,
    pub t: f32,
    /// Emission normal of the light, independent of the side that was hit.
    pub normal: Vec3,
    /// Index of the light in the scene.
    pub light: usize,
}
