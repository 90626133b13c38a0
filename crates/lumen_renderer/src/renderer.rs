//! Render driver.
//!
//! Averages jittered camera samples per pixel, renders buckets in parallel
//! and assembles them into an `ImageBuffer` of linear colors.

use std::path::Path;
use std::time::Instant;

use lumen_core::{Color, RenderDescription};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::integrator::{Integrator, ParseModeError, PathContext, RenderMode};
use crate::photon::{build_photon_map, PhotonSettings};
use crate::scene::Scene;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Display gamma applied when converting to 8-bit
    pub gamma: f32,
    pub seed: u64,
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::MonteCarlo,
            samples_per_pixel: 16,
            gamma: 2.2,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Config from the scene file's `render` section.
    pub fn from_description(description: &RenderDescription) -> Result<Self, ParseModeError> {
        Ok(Self {
            mode: description.mode.parse()?,
            samples_per_pixel: description.samples_per_pixel,
            gamma: description.gamma,
            seed: description.seed,
            bucket_size: description.bucket_size,
        })
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Apply display gamma. Non-positive values map to zero.
#[inline]
pub fn linear_to_gamma(linear: f32, gamma: f32) -> f32 {
    if linear > 0.0 {
        if gamma > 0.0 {
            linear.powf(1.0 / gamma)
        } else {
            linear
        }
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color, gamma: f32) -> [u8; 3] {
    let channel = |c: f32| (255.0 * linear_to_gamma(c, gamma).clamp(0.0, 1.0)).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Average `samples_per_pixel` jittered samples through pixel `(x, y)`.
pub fn render_pixel(
    camera: &Camera,
    integrator: &Integrator,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.jittered_ray(x, y, rng);
        let mut ctx = PathContext::new(rng);
        pixel_color += integrator.trace_ray(&ray, config.mode, 0, &mut ctx);
    }

    pixel_color / samples as f32
}

/// Linear color image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Gamma-corrected 8-bit image.
    pub fn to_rgb8(&self, gamma: f32) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb8(self.get(x, y), gamma))
        })
    }

    /// Write the image; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>, gamma: f32) -> image::ImageResult<()> {
        self.to_rgb8(gamma).save(path)
    }

    /// Mean linear color over all pixels.
    pub fn average(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }
}

/// Render the image with buckets traced in parallel.
pub fn render(camera: &Camera, integrator: &Integrator, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);

    log::info!(
        "Rendering {}x{} in {} mode, {} spp, {} buckets",
        camera.image_width,
        camera.image_height,
        config.mode,
        config.samples_per_pixel,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, integrator, config);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2}s", start.elapsed().as_secs_f32());
    image
}

/// Render a scene, building the photon map first when the mode needs one.
pub fn render_scene(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    photons: &PhotonSettings,
) -> ImageBuffer {
    if !config.mode.is_viewer_mode() {
        log::warn!("{} mode produces no image", config.mode);
    }

    if config.mode.needs_photon_map() {
        let photon_map = build_photon_map(scene, photons);
        let integrator = Integrator::new(scene).with_photon_map(&photon_map);
        render(camera, &integrator, config)
    } else {
        render(camera, &Integrator::new(scene), config)
    }
}
