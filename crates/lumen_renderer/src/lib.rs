//! Lumen Renderer - stochastic ray tracing kernel
//!
//! Traces rays through a scene of spheres, parallelograms and octree
//! accelerated triangle meshes lit by parallelogram area lights. The
//! integrator supports Whitted-style specular tracing, Monte Carlo global
//! illumination and photon-mapped caustics.
//!
//! Typical flow: build a `Scene`, optionally `build_photon_map`, then
//! `render` (or `render_scene`, which does both).

pub mod brdf;
pub mod sampling;

mod bucket;
mod camera;
mod hit;
mod integrator;
mod light;
mod photon;
mod photon_map;
mod plane;
mod primitive;
mod ray;
mod renderer;
mod scene;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hit::{Hit, LightHit, SurfaceHit};
pub use integrator::{
    Integrator, ParseModeError, PathContext, RenderMode, CONTINUATION_PROBABILITY, MAX_DEPTH,
    SURFACE_OFFSET,
};
pub use light::LightSource;
pub use photon::{build_photon_map, PhotonSettings};
pub use photon_map::{Photon, PhotonMap};
pub use plane::Plane;
pub use primitive::{Primitive, SceneObject, TriangleMesh};
pub use ray::{air, Ray};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, render, render_pixel, render_scene, ImageBuffer, RenderConfig,
};
pub use scene::{Scene, T_MIN};
pub use sphere::Sphere;

pub use lumen_core::{Color, Material};
pub use lumen_math::{Vec2, Vec3};
