//! JSON scene description.
//!
//! These types mirror the scene file one to one. They hold no derived state;
//! the renderer turns them into primitives, lights and a camera.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;

use crate::material::{Color, Material};
use crate::octree::DEFAULT_MAX_DEPTH;

/// A complete scene file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub render: RenderDescription,
    pub photons: PhotonDescription,
    /// Named materials referenced by objects.
    pub materials: HashMap<String, Material>,
    pub objects: Vec<ObjectDescription>,
    pub lights: Vec<LightDescription>,
}

/// Pinhole camera placement and image resolution.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees.
    pub vfov: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 45.0,
            width: 400,
            height: 300,
        }
    }
}

/// Integrator settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderDescription {
    /// One of `whitted_specular`, `monte_carlo` or `caustics`.
    pub mode: String,
    pub samples_per_pixel: u32,
    pub gamma: f32,
    pub seed: u64,
    pub bucket_size: u32,
}

impl Default for RenderDescription {
    fn default() -> Self {
        Self {
            mode: "monte_carlo".to_string(),
            samples_per_pixel: 16,
            gamma: 2.2,
            seed: 0,
            bucket_size: 64,
        }
    }
}

/// Photon emission budget, used by caustics rendering.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhotonDescription {
    pub count: usize,
    pub batches: usize,
}

impl Default for PhotonDescription {
    fn default() -> Self {
        Self {
            count: 100_000,
            batches: 100,
        }
    }
}

/// A scene object. Materials are referenced by name.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: Vec3,
        radius: f32,
        material: String,
    },
    /// Parallelogram spanned by `p1 - p0` and `p2 - p0`.
    Plane {
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        material: String,
    },
    Mesh {
        /// OBJ file, relative to the scene file.
        path: PathBuf,
        material: String,
        #[serde(default)]
        transform: MeshTransform,
        #[serde(default = "default_max_depth")]
        max_depth: u32,
    },
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

impl ObjectDescription {
    pub fn material(&self) -> &str {
        match self {
            ObjectDescription::Sphere { material, .. }
            | ObjectDescription::Plane { material, .. }
            | ObjectDescription::Mesh { material, .. } => material,
        }
    }
}

/// Axis/angle rotation, angle in radians.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Rotation {
    pub axis: Vec3,
    pub angle: f32,
}

/// Placement of a mesh in world space.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshTransform {
    pub translate: Vec3,
    pub rotate: Option<Rotation>,
    pub scale: Vec3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            translate: Vec3::ZERO,
            rotate: None,
            scale: Vec3::ONE,
        }
    }
}

impl MeshTransform {
    /// Model matrix applying scale, then rotation, then translation.
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = match self.rotate {
            Some(r) if r.axis.length_squared() > 0.0 => {
                Quat::from_axis_angle(r.axis.normalize(), r.angle)
            }
            _ => Quat::IDENTITY,
        };
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translate)
    }
}

/// Rectangular area light, a parallelogram like `ObjectDescription::Plane`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LightDescription {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    /// Total emitted power.
    pub flux: f32,
    #[serde(default = "default_light_color")]
    pub color: Color,
}

fn default_light_color() -> Color {
    Color::ONE
}
