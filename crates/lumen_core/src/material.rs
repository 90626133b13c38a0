//! Surface materials.
//!
//! A material describes both how a surface scatters light and the medium a
//! ray travels through after entering it. Materials are immutable once built
//! and shared between primitives through `Arc`.

use glam::Vec3;
use serde::Deserialize;

/// Color type alias. The three channels are treated as independent
/// wavelengths (r, g, b); radiance, flux and albedo all use it.
pub type Color = Vec3;

/// Scattering properties of a surface.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Albedo of the diffuse lobe; also tints transmitted light.
    pub color_diffuse: Color,

    /// Tint of mirror reflection, including Fresnel reflection off glass.
    pub color_specular: Color,

    /// Fraction of light reflected at all, [0, 1].
    pub reflectance: f32,

    /// Part of `reflectance` that is mirror-like, [0, 1].
    pub specular_reflectance: f32,

    /// Fraction of light transmitted into the surface, [0, 1].
    pub transmissivity: f32,

    /// Index of refraction, 1 (air) to ~2.4 (diamond).
    pub refraction_index: f32,

    /// Oren-Nayar roughness (sigma, radians). 0 selects Lambertian.
    pub diffuse_roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color_diffuse: Color::splat(0.5),
            color_specular: Color::ONE,
            reflectance: 1.0,
            specular_reflectance: 0.0,
            transmissivity: 0.0,
            refraction_index: 1.0,
            diffuse_roughness: 0.0,
        }
    }
}

impl Material {
    /// The medium rays start in: non-scattering, refraction index 1.
    pub fn air() -> Self {
        Self {
            color_diffuse: Color::ZERO,
            color_specular: Color::ZERO,
            reflectance: 0.0,
            ..Default::default()
        }
    }

    /// Lambertian surface with the given albedo.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color_diffuse: color,
            ..Default::default()
        }
    }

    /// Perfect mirror with the given tint.
    pub fn mirror(color: Color) -> Self {
        Self {
            color_specular: color,
            specular_reflectance: 1.0,
            ..Default::default()
        }
    }

    /// Clear dielectric with the given index of refraction.
    pub fn glass(refraction_index: f32) -> Self {
        Self {
            color_diffuse: Color::ONE,
            color_specular: Color::ONE,
            transmissivity: 1.0,
            refraction_index,
            ..Default::default()
        }
    }

    /// Builder method to set the Oren-Nayar roughness.
    pub fn with_roughness(mut self, sigma: f32) -> Self {
        self.diffuse_roughness = sigma;
        self
    }

    /// Clamp every scalar into its valid range.
    ///
    /// Scene files are user input; the integrator relies on these ranges to
    /// stay energy conserving.
    pub fn clamped(mut self) -> Self {
        self.reflectance = self.reflectance.clamp(0.0, 1.0);
        self.specular_reflectance = self.specular_reflectance.clamp(0.0, 1.0);
        self.transmissivity = self.transmissivity.clamp(0.0, 1.0);
        self.refraction_index = self.refraction_index.max(1.0);
        self.diffuse_roughness = self.diffuse_roughness.max(0.0);
        self.color_diffuse = self.color_diffuse.max(Color::ZERO);
        self.color_specular = self.color_specular.max(Color::ZERO);
        self
    }

    /// Albedo of the diffuse lobe after splitting off the specular part.
    pub fn diffuse_albedo(&self) -> Color {
        self.color_diffuse * self.reflectance * (1.0 - self.specular_reflectance)
    }

    /// Albedo of the mirror lobe.
    pub fn specular_albedo(&self) -> Color {
        self.color_specular * self.reflectance * self.specular_reflectance
    }

    pub fn is_transmissive(&self) -> bool {
        self.transmissivity > 0.0
    }
}
