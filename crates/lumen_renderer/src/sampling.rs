//! Random sampling helpers.
//!
//! Every function takes the generator explicitly; no global RNG state.

use std::f32::consts::PI;

use lumen_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform f32 in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Generator for one independent unit of work (a photon batch, an image
/// bucket). Deterministic for a given seed and unit index.
pub fn unit_rng(seed: u64, unit: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(unit))
}

/// Sub-pixel jitter in `[-0.5, 0.5)²`.
pub fn sample_square(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}

/// Map `(u1, u2)` in `[0, 1)²` to a cosine-weighted direction around `normal`.
///
/// Inclination is `acos(sqrt(u1))` and azimuth `2π·u2`, giving a density of
/// `cos θ / π` over the hemisphere.
pub fn cosine_hemisphere(normal: Vec3, u1: f32, u2: f32) -> Vec3 {
    let cos_theta = u1.max(0.0).sqrt();
    let sin_theta = (1.0 - u1).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;

    let (tangent, bitangent) = normal.any_orthonormal_pair();
    let direction = tangent * (sin_theta * phi.cos())
        + bitangent * (sin_theta * phi.sin())
        + normal * cos_theta;
    direction.normalize_or(normal)
}

/// Draw a cosine-weighted direction around `normal`.
pub fn sample_cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = gen_f32(rng);
    let u2 = gen_f32(rng);
    cosine_hemisphere(normal, u1, u2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_rng_is_deterministic() {
        let a: Vec<u32> = (0..4).map(|_| unit_rng(7, 3).next_u32()).collect();
        assert!(a.windows(2).all(|w| w[0] == w[1]));
        assert_ne!(unit_rng(7, 3).next_u64(), unit_rng(7, 4).next_u64());
    }

    #[test]
    fn test_cosine_hemisphere_extremes() {
        let normal = Vec3::new(1.0, 2.0, -0.5).normalize();

        // u1 = 1 is straight along the normal
        let d = cosine_hemisphere(normal, 1.0, 0.3);
        assert!((d - normal).length() < 1e-5);

        // u1 = 0 is grazing
        let d = cosine_hemisphere(normal, 0.0, 0.7);
        assert!(d.dot(normal).abs() < 1e-5);
        assert!((d.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_hemisphere_mean_cosine() {
        // E[cos θ] under the cos θ / π density is 2/3.
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Vec3::Y;
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let d = sample_cosine_hemisphere(normal, &mut rng);
            assert!(d.dot(normal) >= -1e-6);
            sum += d.dot(normal);
        }
        let mean = sum / n as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean cosine {}", mean);
    }
}
