//! Scene container and closest-hit queries.
//!
//! The scene owns its objects and lights. Both queries scan everything
//! linearly; meshes answer through their own octree.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lumen_core::{load_obj_mesh, Color, LoadError, LoadResult, Material, Mesh, ObjectDescription, SceneDescription};
use lumen_math::{Interval, Vec3};

use crate::hit::{Hit, LightHit};
use crate::light::LightSource;
use crate::plane::Plane;
use crate::primitive::{Primitive, SceneObject, TriangleMesh};
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Hits closer than this are ignored.
pub const T_MIN: f32 = 1e-5;

/// Objects and lights of a scene. Immutable while rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<LightSource>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Arc<Material>) {
        self.add_object(Primitive::Sphere(Sphere::new(center, radius)), material);
    }

    /// Add the parallelogram spanned by `p1 - p0` and `p2 - p0`.
    pub fn add_plane(&mut self, p0: Vec3, p1: Vec3, p2: Vec3, material: Arc<Material>) {
        self.add_object(Primitive::Plane(Plane::new(p0, p1, p2)), material);
    }

    /// Add a world-space mesh, building its octree.
    pub fn add_mesh(&mut self, mesh: &Mesh, material: Arc<Material>, max_depth: u32) {
        self.add_object(Primitive::Mesh(TriangleMesh::new(mesh, max_depth)), material);
    }

    pub fn add_object(&mut self, primitive: Primitive, material: Arc<Material>) {
        self.objects.push(SceneObject {
            primitive,
            material,
        });
    }

    pub fn add_light(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    /// Build a scene from a validated description. Mesh paths are resolved
    /// against `base_dir`.
    pub fn from_description(description: &SceneDescription, base_dir: &Path) -> LoadResult<Self> {
        let materials: HashMap<&str, Arc<Material>> = description
            .materials
            .iter()
            .map(|(name, material)| (name.as_str(), Arc::new(material.clone())))
            .collect();

        let mut scene = Scene::new();

        for object in &description.objects {
            let material = materials
                .get(object.material())
                .cloned()
                .ok_or_else(|| LoadError::UnknownMaterial(object.material().to_string()))?;

            match object {
                ObjectDescription::Sphere { center, radius, .. } => {
                    scene.add_sphere(*center, *radius, material);
                }
                ObjectDescription::Plane { p0, p1, p2, .. } => {
                    scene.add_plane(*p0, *p1, *p2, material);
                }
                ObjectDescription::Mesh {
                    path,
                    transform,
                    max_depth,
                    ..
                } => {
                    let full_path = base_dir.join(path);
                    let mut mesh = load_obj_mesh(&full_path)?;
                    mesh.transform(&transform.to_matrix());
                    log::debug!(
                        "Mesh {:?}: {} vertices, {} triangles",
                        full_path,
                        mesh.vertex_count(),
                        mesh.triangle_count()
                    );
                    scene.add_mesh(&mesh, material, *max_depth);
                }
            }
        }

        for light in &description.lights {
            scene.add_light(LightSource::new(
                light.p0,
                light.p1,
                light.p2,
                light.flux,
                light.color,
            ));
        }

        log::info!(
            "Scene: {} objects ({} spheres, {} triangles), {} lights",
            scene.object_count(),
            scene.sphere_count(),
            scene.triangle_count(),
            scene.light_count()
        );

        Ok(scene)
    }

    /// Closest object hit and the object's index.
    ///
    /// Among exactly equal distances the object scanned last wins.
    pub fn intersect(&self, ray: &Ray) -> Option<(Hit, usize)> {
        self.closest_object(ray, Interval::from_min(T_MIN))
    }

    fn closest_object(&self, ray: &Ray, ray_t: Interval) -> Option<(Hit, usize)> {
        let mut search = ray_t;
        let mut closest = None;

        for (index, object) in self.objects.iter().enumerate() {
            // `search` is inclusive at its upper end, so a tie replaces the
            // current best.
            if let Some(hit) = object.primitive.intersect(ray.geometry(), search) {
                search = search.with_max(hit.t);
                closest = Some((index, hit));
            }
        }

        closest.map(|(index, hit)| {
            (
                Hit {
                    t: hit.t,
                    normal: hit.normal,
                    material: self.objects[index].material.clone(),
                },
                index,
            )
        })
    }

    /// Closest light hit, reported only when no object is strictly closer.
    pub fn intersect_light(&self, ray: &Ray) -> Option<LightHit> {
        let mut search = Interval::from_min(T_MIN);
        let mut closest: Option<LightHit> = None;

        for (index, light) in self.lights.iter().enumerate() {
            if let Some(hit) = light.intersect(ray.geometry(), search) {
                search = search.with_max(hit.t);
                closest = Some(LightHit {
                    radiosity: light.radiosity,
                    area: light.area(),
                    t: hit.t,
                    normal: hit.normal,
                    light: index,
                });
            }
        }

        let light_hit = closest?;
        match self.closest_object(ray, Interval::new(T_MIN, light_hit.t)) {
            Some((hit, _)) if hit.t < light_hit.t => None,
            _ => Some(light_hit),
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn sphere_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|object| matches!(object.primitive, Primitive::Sphere(_)))
            .count()
    }

    /// Triangles over all meshes.
    pub fn triangle_count(&self) -> usize {
        self.objects
            .iter()
            .map(|object| match &object.primitive {
                Primitive::Mesh(mesh) => mesh.triangle_count(),
                _ => 0,
            })
            .sum()
    }

    /// Total flux emitted by all lights.
    pub fn total_flux(&self) -> Color {
        self.lights.iter().map(|light| light.flux()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Arc<Material> {
        Arc::new(Material::diffuse(Color::ONE))
    }

    fn ceiling_light() -> LightSource {
        LightSource::new(
            Vec3::new(-1.0, 3.0, -1.0),
            Vec3::new(1.0, 3.0, -1.0),
            Vec3::new(-1.0, 3.0, 1.0),
            10.0,
            Color::ONE,
        )
    }

    #[test]
    fn test_closest_object_wins() {
        let mut scene = Scene::new();
        let far = white();
        let near = Arc::new(Material::mirror(Color::ONE));
        scene.add_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, far);
        scene.add_sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, near.clone());

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let (hit, index) = scene.intersect(&ray).unwrap();
        assert_eq!(index, 1);
        assert!((hit.t - 3.0).abs() < 1e-4);
        assert!(Arc::ptr_eq(&hit.material, &near));
    }

    #[test]
    fn test_tie_goes_to_last_scanned() {
        let mut scene = Scene::new();
        for _ in 0..3 {
            scene.add_plane(
                Vec3::new(-1.0, -1.0, -2.0),
                Vec3::new(1.0, -1.0, -2.0),
                Vec3::new(-1.0, 1.0, -2.0),
                white(),
            );
        }
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let (_, index) = scene.intersect(&ray).unwrap();
        assert_eq!(index, 2);
    }

    #[test]
    fn test_miss() {
        let mut scene = Scene::new();
        scene.add_sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, white());
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(scene.intersect(&ray).is_none());
        assert!(scene.intersect_light(&ray).is_none());
    }

    #[test]
    fn test_light_visible_and_occluded() {
        let mut scene = Scene::new();
        scene.add_light(ceiling_light());

        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = scene.intersect_light(&up).unwrap();
        assert_eq!(hit.light, 0);
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!((hit.area - 4.0).abs() < 1e-5);

        // A sphere between the origin and the light blocks it.
        scene.add_sphere(Vec3::new(0.0, 1.5, 0.0), 0.5, white());
        assert!(scene.intersect_light(&up).is_none());

        // An object behind the light does not.
        let mut scene = Scene::new();
        scene.add_light(ceiling_light());
        scene.add_sphere(Vec3::new(0.0, 5.0, 0.0), 0.5, white());
        assert!(scene.intersect_light(&up).is_some());
    }

    #[test]
    fn test_light_wins_tie_with_object() {
        let mut scene = Scene::new();
        scene.add_light(ceiling_light());
        scene.add_plane(
            Vec3::new(-1.0, 3.0, -1.0),
            Vec3::new(1.0, 3.0, -1.0),
            Vec3::new(-1.0, 3.0, 1.0),
            white(),
        );
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(scene.intersect_light(&up).is_some());
    }

    #[test]
    fn test_counts() {
        let mut scene = Scene::new();
        scene.add_sphere(Vec3::ZERO, 1.0, white());
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
            None,
        );
        scene.add_mesh(&mesh, white(), 4);
        scene.add_light(ceiling_light());

        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.sphere_count(), 1);
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.light_count(), 1);
        assert!((scene.total_flux().x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_from_description() {
        let description = lumen_core::parse_description(
            r#"{
                "materials": { "white": {}, "glass": { "transmissivity": 1, "refraction_index": 1.5 } },
                "objects": [
                    { "type": "sphere", "center": [0, 1, 0], "radius": 0.5, "material": "glass" },
                    { "type": "plane", "p0": [-5, 0, 5], "p1": [5, 0, 5], "p2": [-5, 0, -5], "material": "white" }
                ],
                "lights": [ { "p0": [-1, 3, -1], "p1": [1, 3, -1], "p2": [-1, 3, 1], "flux": 10 } ]
            }"#,
        )
        .unwrap();

        let scene = Scene::from_description(&description, Path::new(".")).unwrap();
        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.objects()[0].material.refraction_index, 1.5);
    }
}
