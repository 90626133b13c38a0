//! Reflection models and the geometry of specular scattering.
//!
//! All directions are unit vectors. `view` and `light` point away from the
//! surface.

use std::f32::consts::PI;

use lumen_core::{Color, Material};
use lumen_math::Vec3;

/// Ideal diffuse reflector.
#[inline]
pub fn lambertian(albedo: Color) -> Color {
    albedo / PI
}

/// Oren-Nayar rough diffuse reflector with roughness `sigma` (radians).
pub fn oren_nayar(view: Vec3, light: Vec3, normal: Vec3, albedo: Color, sigma: f32) -> Color {
    let sigma2 = sigma * sigma;
    let a = 1.0 - 0.5 * sigma2 / (sigma2 + 0.33);
    let b = 0.45 * sigma2 / (sigma2 + 0.09);

    let cos_i = light.dot(normal).clamp(-1.0, 1.0);
    let cos_r = view.dot(normal).clamp(-1.0, 1.0);
    let theta_i = cos_i.acos();
    let theta_r = cos_r.acos();
    let alpha = theta_i.max(theta_r);
    // Keep tan() finite at grazing angles.
    let beta = theta_i.min(theta_r).min(PI / 2.0 - 1e-4);

    // Cosine of the azimuth difference, from the tangent-plane projections.
    let light_tangent = (light - normal * cos_i).normalize_or_zero();
    let view_tangent = (view - normal * cos_r).normalize_or_zero();
    let cos_phi = light_tangent.dot(view_tangent).max(0.0);

    albedo / PI * (a + b * cos_phi * alpha.sin() * beta.tan())
}

/// Diffuse BRDF of `material`: Lambertian for zero roughness, Oren-Nayar
/// otherwise. Uses the diffuse albedo left over after the specular split.
pub fn diffuse(material: &Material, view: Vec3, light: Vec3, normal: Vec3) -> Color {
    let albedo = material.diffuse_albedo();
    if material.diffuse_roughness > 0.0 {
        oren_nayar(view, light, normal, albedo, material.diffuse_roughness)
    } else {
        lambertian(albedo)
    }
}

/// Mirror `direction` about `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Snell refraction of `direction` through a surface whose `normal` faces
/// the incoming ray, with `eta = n1 / n2`.
///
/// Returns `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -direction.dot(normal);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    let refracted = eta * direction + (eta * cos_i - k.sqrt()) * normal;
    Some(refracted.normalize_or(direction))
}

/// Schlick's approximation of the Fresnel reflectance going from index `n1`
/// to `n2` at an incidence angle with cosine `cos_theta`.
pub fn schlick(n1: f32, n2: f32, cos_theta: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5)
}
