//! Area lights.

use lumen_core::Color;
use lumen_math::{Interval, Ray as GeometricRay, Vec3};
use rand::RngCore;

use crate::hit::SurfaceHit;
use crate::plane::Plane;
use crate::ray::Ray;
use crate::sampling::{gen_f32, sample_cosine_hemisphere};

/// Emitted rays start this far in front of the light surface.
const EMIT_OFFSET: f32 = 1e-4;

/// A parallelogram emitting diffusely from its front side.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSource {
    emitter: Plane,
    /// Flux per unit area, per channel.
    pub radiosity: Color,
}

impl LightSource {
    /// A light spanned by `p0, p1, p2` emitting `flux` in total, tinted by
    /// `color`. It emits towards `(p1 - p0) × (p2 - p0)`.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, flux: f32, color: Color) -> Self {
        let emitter = Plane::new(p0, p1, p2);
        let radiosity = if emitter.area() > 0.0 {
            flux / emitter.area() * color
        } else {
            Color::ZERO
        };
        Self { emitter, radiosity }
    }

    pub fn area(&self) -> f32 {
        self.emitter.area()
    }

    pub fn normal(&self) -> Vec3 {
        self.emitter.normal()
    }

    /// Total emitted flux per channel.
    pub fn flux(&self) -> Color {
        self.radiosity * self.area()
    }

    /// Scalar power used to pick lights for photon emission.
    pub fn power(&self) -> f32 {
        self.radiosity.length() * self.area()
    }

    /// Two-sided intersection with the emitting surface.
    pub fn intersect(&self, ray: &GeometricRay, ray_t: Interval) -> Option<SurfaceHit> {
        self.emitter.intersect(ray, ray_t)
    }

    /// Uniformly distributed point on the light.
    pub fn sample_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let u = gen_f32(rng);
        let v = gen_f32(rng);
        self.emitter.point_on_surface(u, v)
    }

    /// A photon ray: uniform origin on the surface, cosine-weighted
    /// direction about the normal, travelling through air.
    pub fn emit_ray(&self, rng: &mut dyn RngCore) -> Ray {
        let origin = self.sample_point(rng) + self.normal() * EMIT_OFFSET;
        let direction = sample_cosine_hemisphere(self.normal(), rng);
        Ray::new(origin, direction)
    }
}
