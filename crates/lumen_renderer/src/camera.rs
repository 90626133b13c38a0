//! Pinhole camera for primary ray generation.

use lumen_core::CameraDescription;
use lumen_math::{Vec2, Vec3};
use rand::RngCore;

use crate::ray::Ray;
use crate::sampling::sample_square;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 400,
            image_height: 300,
            look_from: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 45.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Camera from a scene file section, initialized.
    pub fn from_description(description: &CameraDescription) -> Self {
        let mut camera = Self::new()
            .with_resolution(description.width, description.height)
            .with_position(description.look_from, description.look_at, description.vup)
            .with_vfov(description.vfov);
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_vfov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Recompute the cached viewport (must be called after the builders).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Viewport one unit in front of the camera
        let theta = self.vfov.clamp(1e-3, 179.0).to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize_or(Vec3::Z);
        let u = self
            .vup
            .cross(w)
            .try_normalize()
            .unwrap_or_else(|| w.any_orthonormal_vector());
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = self.center - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Primary ray through pixel `(x, y)` offset by `jitter` within the pixel.
    ///
    /// `jitter` lies in `[-0.5, 0.5]²`; values outside are clamped.
    pub fn get_ray(&self, x: u32, y: u32, jitter: Vec2) -> Ray {
        let clamped = jitter.clamp(Vec2::splat(-0.5), Vec2::splat(0.5));
        if clamped != jitter {
            log::debug!("Pixel jitter {} out of range, clamped to {}", jitter, clamped);
        }

        let pixel_sample = self.pixel00_loc
            + (x as f32 + clamped.x) * self.pixel_delta_u
            + (y as f32 + clamped.y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }

    /// Primary ray through pixel `(x, y)` with a random jitter.
    pub fn jittered_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        self.get_ray(x, y, sample_square(rng))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera_100() -> Camera {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_vfov(90.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = camera_100();
        // Pixel 50 starts at the center; jitter -0.5 puts the sample on it.
        let ray = camera.get_ray(50, 50, Vec2::splat(-0.5));
        assert!((ray.direction() - -Vec3::Z).length() < 1e-5);
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_corners_span_the_fov() {
        let camera = camera_100();
        // With a 90 degree fov the left edge is at 45 degrees.
        let ray = camera.get_ray(0, 50, Vec2::new(-0.5, -0.5));
        let d = ray.direction();
        assert!((d.x - d.z).abs() < 1e-4, "{}", d);
        // Rows go down the image.
        let top = camera.get_ray(50, 0, Vec2::ZERO).direction();
        let bottom = camera.get_ray(50, 99, Vec2::ZERO).direction();
        assert!(top.y > 0.0 && bottom.y < 0.0);
    }

    #[test]
    fn test_jitter_is_clamped() {
        let camera = camera_100();
        let a = camera.get_ray(10, 10, Vec2::new(3.0, -7.0));
        let b = camera.get_ray(10, 10, Vec2::new(0.5, -0.5));
        assert!((a.direction() - b.direction()).length() < 1e-6);
    }

    #[test]
    fn test_jittered_rays_stay_in_pixel() {
        let camera = camera_100();
        let mut rng = StdRng::seed_from_u64(42);
        // Project onto the viewport plane at z = -1, where pixels are linear.
        let project = |ray: Ray| {
            let d = ray.direction();
            Vec2::new(d.x / -d.z, d.y / -d.z)
        };
        let lo = project(camera.get_ray(20, 30, Vec2::splat(-0.5)));
        let hi = project(camera.get_ray(20, 30, Vec2::splat(0.5)));
        let (min, max) = (lo.min(hi), lo.max(hi));
        for _ in 0..100 {
            let p = project(camera.jittered_ray(20, 30, &mut rng));
            assert!(p.cmpge(min - 1e-5).all() && p.cmple(max + 1e-5).all(), "{}", p);
        }
    }

    #[test]
    fn test_from_description() {
        let camera = Camera::from_description(&CameraDescription::default());
        assert_eq!(camera.image_width, 400);
        assert_eq!(camera.image_height, 300);
        let ray = camera.get_ray(200, 150, Vec2::splat(-0.5));
        assert!((ray.direction() - -Vec3::Z).length() < 1e-5);
    }
}
