//! Recursive light transport.
//!
//! `Integrator::trace_ray` estimates the radiance arriving along a ray. At
//! every object hit the material splits the path into up to three parts:
//!
//! - specular reflection (mirror direction)
//! - diffuse reflection, computed according to the `RenderMode`
//! - refraction with Fresnel-weighted reflection (Schlick)
//!
//! Paths are cut by Russian roulette after the first bounce and by a hard
//! depth limit. Survivors are divided by their continuation probability so
//! the estimate stays unbiased.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use lumen_core::{Color, Material};
use lumen_math::Vec3;
use rand::RngCore;
use thiserror::Error;

use crate::brdf;
use crate::hit::{Hit, LightHit};
use crate::photon_map::{Photon, PhotonMap};
use crate::ray::{air, Ray};
use crate::sampling::{gen_f32, sample_cosine_hemisphere};
use crate::scene::Scene;

/// Distance continuation rays are moved off the surface.
pub const SURFACE_OFFSET: f32 = 1e-4;

/// Paths deeper than this contribute nothing.
pub const MAX_DEPTH: u32 = 20;

/// Russian roulette continuation probability after the first bounce.
pub const CONTINUATION_PROBABILITY: f32 = 0.8;

/// What the integrator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Emitters plus perfect specular and refractive paths only.
    WhittedSpecular,
    /// Full global illumination by hemisphere sampling.
    MonteCarlo,
    /// Diffuse term replaced by a photon map density estimate.
    Caustics,
    /// Photon emission pass: deposits photons, returns no radiance.
    PhotonMapping,
}

impl RenderMode {
    /// Whether the mode produces an image (photon mapping only feeds the
    /// photon map).
    pub fn is_viewer_mode(self) -> bool {
        !matches!(self, RenderMode::PhotonMapping)
    }

    /// Whether rendering in this mode needs a photon map.
    pub fn needs_photon_map(self) -> bool {
        matches!(self, RenderMode::Caustics)
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::WhittedSpecular => "whitted_specular",
            RenderMode::MonteCarlo => "monte_carlo",
            RenderMode::Caustics => "caustics",
            RenderMode::PhotonMapping => "photon_mapping",
        };
        f.write_str(name)
    }
}

/// Error for an unrecognised render mode name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown render mode '{0}' (expected whitted_specular, monte_carlo, caustics or photon_mapping)")]
pub struct ParseModeError(pub String);

impl FromStr for RenderMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "whitted_specular" | "whitted" => Ok(RenderMode::WhittedSpecular),
            "monte_carlo" | "montecarlo" => Ok(RenderMode::MonteCarlo),
            "caustics" => Ok(RenderMode::Caustics),
            "photon_mapping" => Ok(RenderMode::PhotonMapping),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Mutable state owned by one path: its random generator and, while
/// emitting photons, the buffer photons are deposited into.
pub struct PathContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub photons: Option<&'a mut Vec<Photon>>,
}

impl<'a> PathContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Self { rng, photons: None }
    }

    /// Context for photon emission; deposits go to `photons`.
    pub fn with_photons(rng: &'a mut dyn RngCore, photons: &'a mut Vec<Photon>) -> Self {
        Self {
            rng,
            photons: Some(photons),
        }
    }
}

/// Geometry of an object hit, shared by the scattering terms.
struct Shading<'h> {
    hit: &'h Hit,
    point: Vec3,
    /// Unit normal facing the incoming ray.
    normal: Vec3,
    /// True when the ray arrived from the back side of the surface.
    inside: bool,
}

impl Shading<'_> {
    /// Offset point on the side the ray came from.
    fn above(&self) -> Vec3 {
        self.point + self.normal * SURFACE_OFFSET
    }

    /// Offset point on the far side of the surface.
    fn below(&self) -> Vec3 {
        self.point - self.normal * SURFACE_OFFSET
    }

    fn material(&self) -> &Material {
        &self.hit.material
    }
}

/// Radiance estimator over a scene, with an optional photon map for
/// caustics.
#[derive(Clone, Copy)]
pub struct Integrator<'a> {
    scene: &'a Scene,
    photon_map: Option<&'a PhotonMap>,
}

impl<'a> Integrator<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            photon_map: None,
        }
    }

    /// Builder method to attach a finished photon map.
    pub fn with_photon_map(mut self, photon_map: &'a PhotonMap) -> Self {
        self.photon_map = Some(photon_map);
        self
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Radiance arriving at the ray origin from the ray direction.
    ///
    /// `depth` counts the bounces so far (0 for camera and photon rays).
    /// Always returns a finite, non-negative color for finite input.
    pub fn trace_ray(&self, ray: &Ray, mode: RenderMode, depth: u32, ctx: &mut PathContext) -> Color {
        if let Some(light_hit) = self.scene.intersect_light(ray) {
            return self.emitted(ray, &light_hit, mode);
        }

        let Some((hit, _)) = self.scene.intersect(ray) else {
            return Color::ZERO;
        };

        // Russian roulette
        if depth > MAX_DEPTH {
            return Color::ZERO;
        }
        let continuation = if depth == 0 {
            1.0
        } else {
            CONTINUATION_PROBABILITY
        };
        if gen_f32(ctx.rng) >= continuation {
            return Color::ZERO;
        }

        let inside = hit.normal.dot(ray.direction()) > 0.0;
        let shading = Shading {
            hit: &hit,
            point: ray.at(hit.t),
            normal: if inside { -hit.normal } else { hit.normal },
            inside,
        };

        let material = shading.material();
        let transmissivity = material.transmissivity;
        let mut total = Color::ZERO;

        if transmissivity < 1.0 {
            let specular = if material.specular_reflectance > 0.0 {
                self.trace_specular(ray, &shading, mode, depth, ctx)
            } else {
                Color::ZERO
            };

            let diffuse = match mode {
                RenderMode::MonteCarlo if material.specular_reflectance < 1.0 => {
                    self.direct_diffuse(ray, &shading, ctx)
                        + self.indirect_diffuse(ray, &shading, mode, depth, ctx)
                }
                RenderMode::Caustics => self.estimate_caustics(ray, &shading),
                RenderMode::PhotonMapping => {
                    self.deposit_photon(ray, &shading, continuation, ctx);
                    Color::ZERO
                }
                _ => Color::ZERO,
            };

            total += (specular + diffuse) * (1.0 - transmissivity);
        }

        if transmissivity > 0.0 {
            total += self.trace_refraction(ray, &shading, mode, depth, ctx) * transmissivity;
        }

        finite_or_zero(total / continuation)
    }

    /// Radiance of an emitter seen along `ray`.
    ///
    /// Camera rays and specular continuations see lights in every viewer
    /// mode. After a diffuse bounce only Whitted mode sees them; the other
    /// modes already gathered that light through shadow rays.
    fn emitted(&self, ray: &Ray, light_hit: &LightHit, mode: RenderMode) -> Color {
        let visible = match mode {
            RenderMode::WhittedSpecular => true,
            RenderMode::MonteCarlo | RenderMode::Caustics => !ray.after_diffuse(),
            RenderMode::PhotonMapping => false,
        };
        if visible {
            light_hit.radiosity / (2.0 * PI)
        } else {
            Color::ZERO
        }
    }

    fn trace_specular(
        &self,
        ray: &Ray,
        shading: &Shading,
        mode: RenderMode,
        depth: u32,
        ctx: &mut PathContext,
    ) -> Color {
        let weight = shading.material().specular_albedo();
        let direction = brdf::reflect(ray.direction(), shading.normal);
        let reflected = ray
            .bounce(shading.above(), direction)
            .with_importance(ray.importance() * weight);
        self.trace_ray(&reflected, mode, depth + 1, ctx) * weight
    }

    /// Shadow rays: one uniformly placed sample per light.
    fn direct_diffuse(&self, ray: &Ray, shading: &Shading, ctx: &mut PathContext) -> Color {
        let origin = shading.above();
        let view = -ray.direction();
        let mut direct = Color::ZERO;

        for (index, light) in self.scene.lights().iter().enumerate() {
            let difference = light.sample_point(ctx.rng) - origin;
            let distance_squared = difference.length_squared();
            if distance_squared <= 0.0 {
                continue;
            }
            let direction = difference / distance_squared.sqrt();

            let cos_theta = direction.dot(shading.normal);
            if cos_theta <= 0.0 {
                continue;
            }

            let shadow_ray = ray.diffuse_bounce(origin, direction);
            let Some(light_hit) = self.scene.intersect_light(&shadow_ray) else {
                continue;
            };
            if light_hit.light != index {
                continue;
            }

            let cos_light = light_hit.normal.dot(-direction).clamp(0.0, 1.0);
            let solid_angle = light_hit.area * cos_light / distance_squared / (2.0 * PI);
            let f = brdf::diffuse(shading.material(), view, direction, shading.normal);

            direct += f * light_hit.radiosity * cos_theta * solid_angle;
        }

        direct
    }

    /// One cosine-weighted hemisphere sample. The cosine density cancels to
    /// a weight of `π·brdf`.
    fn indirect_diffuse(
        &self,
        ray: &Ray,
        shading: &Shading,
        mode: RenderMode,
        depth: u32,
        ctx: &mut PathContext,
    ) -> Color {
        let direction = sample_cosine_hemisphere(shading.normal, ctx.rng);
        let f = brdf::diffuse(shading.material(), -ray.direction(), direction, shading.normal);
        let weight = PI * f;

        let bounced = ray
            .diffuse_bounce(shading.above(), direction)
            .with_importance(ray.importance() * weight);
        self.trace_ray(&bounced, mode, depth + 1, ctx) * weight
    }

    /// Flat-kernel photon density estimate at the shading point.
    fn estimate_caustics(&self, ray: &Ray, shading: &Shading) -> Color {
        let Some(photon_map) = self.photon_map else {
            return Color::ZERO;
        };

        let view = -ray.direction();
        let normalization = Photon::gather_area() * 2.0 * PI;

        // Photons that arrived from the other side of the surface do not
        // light this side.
        photon_map
            .within_radius(shading.above(), Photon::RADIUS)
            .into_iter()
            .filter(|photon| photon.direction_in.dot(shading.normal) > 0.0)
            .map(|photon| {
                let f = brdf::diffuse(shading.material(), view, photon.direction_in, shading.normal);
                // flux / area / steradian, integrated back over the hemisphere
                photon.delta_flux / normalization * f * (2.0 * PI)
            })
            .sum()
    }

    /// Store a photon where a bounced photon path lands.
    fn deposit_photon(&self, ray: &Ray, shading: &Shading, continuation: f32, ctx: &mut PathContext) {
        if !ray.has_bounced() {
            return;
        }
        if let Some(photons) = ctx.photons.as_mut() {
            photons.push(Photon {
                position: shading.above(),
                direction_in: -ray.direction(),
                delta_flux: ray.importance() / continuation * Photon::gather_area() * PI,
            });
        }
    }

    fn trace_refraction(
        &self,
        ray: &Ray,
        shading: &Shading,
        mode: RenderMode,
        depth: u32,
        ctx: &mut PathContext,
    ) -> Color {
        let material = shading.material();

        // Entering goes from the current medium into the material; leaving
        // goes back out to air.
        let (n1, n2, next_medium) = if shading.inside {
            (material.refraction_index, 1.0, air())
        } else {
            (
                ray.medium().refraction_index,
                material.refraction_index,
                shading.hit.material.clone(),
            )
        };

        let reflected_direction = brdf::reflect(ray.direction(), shading.normal);

        let Some(refracted_direction) = brdf::refract(ray.direction(), shading.normal, n1 / n2) else {
            // Total internal reflection
            let weight = material.color_specular;
            let reflected = ray
                .bounce(shading.above(), reflected_direction)
                .with_importance(ray.importance() * weight);
            return self.trace_ray(&reflected, mode, depth + 1, ctx) * weight;
        };

        let cos_theta = shading.normal.dot(-ray.direction());
        let fresnel = brdf::schlick(n1, n2, cos_theta);

        let reflect_weight = material.color_specular * fresnel;
        let refract_weight = material.color_diffuse * (1.0 - fresnel);

        let mut total = Color::ZERO;

        if reflect_weight.max_element() > 0.0 {
            let reflected = ray
                .bounce(shading.above(), reflected_direction)
                .with_importance(ray.importance() * reflect_weight);
            total += self.trace_ray(&reflected, mode, depth + 1, ctx) * reflect_weight;
        }

        if refract_weight.max_element() > 0.0 {
            let refracted = ray
                .bounce(shading.below(), refracted_direction)
                .with_medium(next_medium)
                .with_importance(ray.importance() * refract_weight);
            total += self.trace_ray(&refracted, mode, depth + 1, ctx) * refract_weight;
        }

        total
    }
}

fn finite_or_zero(color: Color) -> Color {
    if color.is_finite() {
        color.max(Color::ZERO)
    } else {
        Color::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::light::LightSource;

    fn floor(scene: &mut Scene, material: Material) {
        scene.add_plane(
            Vec3::new(-5.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(-5.0, 0.0, -5.0),
            Arc::new(material),
        );
    }

    fn light_above(height: f32, flux: f32) -> LightSource {
        LightSource::new(
            Vec3::new(-0.5, height, -0.5),
            Vec3::new(0.5, height, -0.5),
            Vec3::new(-0.5, height, 0.5),
            flux,
            Color::ONE,
        )
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("monte_carlo".parse::<RenderMode>(), Ok(RenderMode::MonteCarlo));
        assert_eq!(
            "Whitted-Specular".parse::<RenderMode>(),
            Ok(RenderMode::WhittedSpecular)
        );
        assert_eq!("caustics".parse::<RenderMode>(), Ok(RenderMode::Caustics));
        assert!("radiosity".parse::<RenderMode>().is_err());
        for mode in [
            RenderMode::WhittedSpecular,
            RenderMode::MonteCarlo,
            RenderMode::Caustics,
            RenderMode::PhotonMapping,
        ] {
            assert_eq!(mode.to_string().parse::<RenderMode>(), Ok(mode));
        }
        assert!(!RenderMode::PhotonMapping.is_viewer_mode());
        assert!(RenderMode::Caustics.needs_photon_map());
    }

    #[test]
    fn test_light_seen_directly() {
        let mut scene = Scene::new();
        scene.add_light(light_above(2.0, 10.0));
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = PathContext::new(&mut rng);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let expected = Color::splat(10.0 / (2.0 * PI));
        for mode in [RenderMode::WhittedSpecular, RenderMode::MonteCarlo, RenderMode::Caustics] {
            let radiance = integrator.trace_ray(&ray, mode, 0, &mut ctx);
            assert!((radiance - expected).length() < 1e-4, "{}: {}", mode, radiance);
        }
        assert_eq!(
            integrator.trace_ray(&ray, RenderMode::PhotonMapping, 0, &mut ctx),
            Color::ZERO
        );

        // After a diffuse bounce only Whitted mode sees the light.
        let diffuse = ray.diffuse_bounce(Vec3::ZERO, Vec3::Y);
        for mode in [RenderMode::MonteCarlo, RenderMode::Caustics] {
            assert_eq!(integrator.trace_ray(&diffuse, mode, 1, &mut ctx), Color::ZERO);
        }
        let whitted = integrator.trace_ray(&diffuse, RenderMode::WhittedSpecular, 1, &mut ctx);
        assert!((whitted - expected).length() < 1e-4);

        // A specular continuation sees it in every viewer mode.
        let specular = ray.bounce(Vec3::ZERO, Vec3::Y);
        for mode in [RenderMode::WhittedSpecular, RenderMode::MonteCarlo, RenderMode::Caustics] {
            let radiance = integrator.trace_ray(&specular, mode, 1, &mut ctx);
            assert!((radiance - expected).length() < 1e-4, "{}: {}", mode, radiance);
        }
    }

    #[test]
    fn test_whitted_ignores_diffuse() {
        let mut scene = Scene::new();
        floor(&mut scene, Material::diffuse(Color::ONE));
        scene.add_light(light_above(2.0, 10.0));
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = PathContext::new(&mut rng);

        let ray = Ray::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(-3.0, -1.0, 0.0));
        assert_eq!(
            integrator.trace_ray(&ray, RenderMode::WhittedSpecular, 0, &mut ctx),
            Color::ZERO
        );
        assert!(integrator.trace_ray(&ray, RenderMode::MonteCarlo, 0, &mut ctx).x > 0.0);
    }

    #[test]
    fn test_mirror_reflects_light_in_whitted() {
        let mut scene = Scene::new();
        floor(&mut scene, Material::mirror(Color::splat(0.5)));
        scene.add_light(light_above(2.0, 10.0));
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = PathContext::new(&mut rng);

        // Hits the mirror at (0, 0, 0.2) and reflects straight into the light.
        // The light hit ends the path before any roulette.
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.2), -Vec3::Y);
        let radiance = integrator.trace_ray(&ray, RenderMode::WhittedSpecular, 0, &mut ctx);
        let expected = 0.5 * 10.0 / (2.0 * PI);
        assert!((radiance.x - expected).abs() < 1e-4, "{}", radiance);
    }

    #[test]
    fn test_mirror_reflects_light_in_monte_carlo() {
        let mut scene = Scene::new();
        floor(&mut scene, Material::mirror(Color::splat(0.5)));
        scene.add_light(light_above(2.0, 10.0));
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);

        // A pure mirror has no diffuse lobe, so the reflected light is the
        // only contribution and the estimate is exact.
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.2), -Vec3::Y);
        let expected = 0.5 * 10.0 / (2.0 * PI);
        for mode in [RenderMode::MonteCarlo, RenderMode::Caustics] {
            let mut ctx = PathContext::new(&mut rng);
            let radiance = integrator.trace_ray(&ray, mode, 0, &mut ctx);
            assert!((radiance.x - expected).abs() < 1e-4, "{}: {}", mode, radiance);
        }
    }

    #[test]
    fn test_caustics_ignore_photons_from_the_far_side() {
        let mut scene = Scene::new();
        floor(&mut scene, Material::diffuse(Color::ONE));

        // One photon just under the floor, arriving from below.
        let below = Photon {
            position: Vec3::new(0.0, -SURFACE_OFFSET, 0.0),
            direction_in: -Vec3::Y,
            delta_flux: Color::ONE,
        };
        let mut photon_map = PhotonMap::new();
        photon_map.insert(below);
        photon_map.optimize();

        let integrator = Integrator::new(&scene).with_photon_map(&photon_map);
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = PathContext::new(&mut rng);

        let from_above = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        assert_eq!(
            integrator.trace_ray(&from_above, RenderMode::Caustics, 0, &mut ctx),
            Color::ZERO
        );

        // The underside is lit by it.
        let from_below = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let lit = integrator.trace_ray(&from_below, RenderMode::Caustics, 0, &mut ctx);
        assert!(lit.x > 0.0, "{}", lit);

        // Same photon mirrored onto the top side lights the top.
        let above = Photon {
            position: Vec3::new(0.0, SURFACE_OFFSET, 0.0),
            direction_in: Vec3::Y,
            delta_flux: Color::ONE,
        };
        let mut photon_map = PhotonMap::new();
        photon_map.insert(above);
        photon_map.optimize();
        let integrator = Integrator::new(&scene).with_photon_map(&photon_map);
        let lit = integrator.trace_ray(&from_above, RenderMode::Caustics, 0, &mut ctx);
        assert!(lit.x > 0.0, "{}", lit);
    }

    #[test]
    fn test_depth_cap() {
        // Two facing mirrors bounce forever without the cap.
        let mut scene = Scene::new();
        floor(&mut scene, Material::mirror(Color::ONE));
        scene.add_plane(
            Vec3::new(-5.0, 1.0, -5.0),
            Vec3::new(5.0, 1.0, -5.0),
            Vec3::new(-5.0, 1.0, 5.0),
            Arc::new(Material::mirror(Color::ONE)),
        );
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = PathContext::new(&mut rng);

        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), -Vec3::Y);
        assert_eq!(
            integrator.trace_ray(&ray, RenderMode::WhittedSpecular, MAX_DEPTH + 1, &mut ctx),
            Color::ZERO
        );
        let radiance = integrator.trace_ray(&ray, RenderMode::MonteCarlo, 0, &mut ctx);
        assert!(radiance.is_finite());
    }

    #[test]
    fn test_photon_deposit_requires_bounce() {
        let mut scene = Scene::new();
        floor(&mut scene, Material::diffuse(Color::ONE));
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);
        let mut photons = Vec::new();

        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y).with_importance(Color::splat(2.0));
        {
            let mut ctx = PathContext::with_photons(&mut rng, &mut photons);
            integrator.trace_ray(&ray, RenderMode::PhotonMapping, 0, &mut ctx);
        }
        assert!(photons.is_empty());

        let bounced = ray.bounce(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        {
            let mut ctx = PathContext::with_photons(&mut rng, &mut photons);
            integrator.trace_ray(&bounced, RenderMode::PhotonMapping, 0, &mut ctx);
        }
        assert_eq!(photons.len(), 1);

        let photon = photons[0];
        assert!((photon.position.y - SURFACE_OFFSET).abs() < 1e-6);
        assert!((photon.direction_in - Vec3::Y).length() < 1e-6);
        let expected = 2.0 * Photon::gather_area() * PI;
        assert!((photon.delta_flux.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_glass_normal_incidence_refracts() {
        let glass = Arc::new(Material {
            color_diffuse: Color::ONE,
            color_specular: Color::ONE,
            reflectance: 1.0,
            specular_reflectance: 0.0,
            transmissivity: 1.0,
            refraction_index: 1.5,
            diffuse_roughness: 0.0,
        });
        let mut scene = Scene::new();
        scene.add_sphere(Vec3::ZERO, 1.0, glass);
        // A light behind the sphere, seen only through it.
        scene.add_light(LightSource::new(
            Vec3::new(-0.5, -0.5, -3.0),
            Vec3::new(0.5, -0.5, -3.0),
            Vec3::new(-0.5, 0.5, -3.0),
            10.0,
            Color::ONE,
        ));
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z);
        let mut sum = Color::ZERO;
        for _ in 0..200 {
            let mut ctx = PathContext::new(&mut rng);
            sum += integrator.trace_ray(&ray, RenderMode::WhittedSpecular, 0, &mut ctx);
        }
        // Light transmitted through both surfaces reaches the camera.
        assert!(sum.x > 0.0);
    }
}
