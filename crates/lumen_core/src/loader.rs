//! Scene file and OBJ mesh loading.

use std::path::Path;

use glam::Vec3;

use crate::description::{ObjectDescription, SceneDescription};
use crate::error::{LoadError, LoadResult};
use crate::mesh::Mesh;

/// Load and validate a JSON scene description from disk.
///
/// # Example
///
/// ```ignore
/// use lumen_core::load_description;
///
/// let description = load_description("scenes/cornell.json")?;
/// ```
pub fn load_description<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let description = parse_description(&text)?;

    log::info!(
        "Loaded scene {:?}: {} materials, {} objects, {} lights",
        path,
        description.materials.len(),
        description.objects.len(),
        description.lights.len()
    );

    Ok(description)
}

/// Parse and validate a JSON scene description.
///
/// Material values are clamped into their valid ranges. Objects must refer
/// to declared materials and have non-degenerate geometry.
pub fn parse_description(text: &str) -> LoadResult<SceneDescription> {
    let mut description: SceneDescription = serde_json::from_str(text)?;

    for material in description.materials.values_mut() {
        *material = std::mem::take(material).clamped();
    }

    for object in &description.objects {
        if !description.materials.contains_key(object.material()) {
            return Err(LoadError::UnknownMaterial(object.material().to_string()));
        }
        validate_object(object)?;
    }

    for (i, light) in description.lights.iter().enumerate() {
        if parallelogram_area(light.p0, light.p1, light.p2) <= 0.0 {
            return Err(LoadError::InvalidPrimitive(format!(
                "light {} has zero area",
                i
            )));
        }
        if !light.flux.is_finite() || light.flux < 0.0 {
            return Err(LoadError::InvalidPrimitive(format!(
                "light {} has invalid flux {}",
                i, light.flux
            )));
        }
    }

    Ok(description)
}

fn validate_object(object: &ObjectDescription) -> LoadResult<()> {
    match object {
        ObjectDescription::Sphere { radius, center, .. } => {
            if !radius.is_finite() || *radius <= 0.0 || !center.is_finite() {
                return Err(LoadError::InvalidPrimitive(format!(
                    "sphere at {} with radius {}",
                    center, radius
                )));
            }
        }
        ObjectDescription::Plane { p0, p1, p2, .. } => {
            if parallelogram_area(*p0, *p1, *p2) <= 0.0 {
                return Err(LoadError::InvalidPrimitive(format!(
                    "plane {} {} {} has zero area",
                    p0, p1, p2
                )));
            }
        }
        ObjectDescription::Mesh { path, .. } => {
            if path.as_os_str().is_empty() {
                return Err(LoadError::InvalidPrimitive("mesh without a path".into()));
            }
        }
    }
    Ok(())
}

fn parallelogram_area(p0: Vec3, p1: Vec3, p2: Vec3) -> f32 {
    let area = (p1 - p0).cross(p2 - p0).length();
    if area.is_finite() {
        area
    } else {
        0.0
    }
}

/// Load every model of an OBJ file into a single mesh.
///
/// Faces are triangulated. Vertex normals are kept when the file provides
/// one per vertex; otherwise they are computed from the faces.
pub fn load_obj_mesh<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| LoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut all_have_normals = true;

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;

        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );

        if mesh.normals.len() == mesh.positions.len() {
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2])),
            );
        } else {
            all_have_normals = false;
        }

        indices.extend(mesh.indices.iter().map(|&i| base + i));

        log::debug!(
            "OBJ model '{}': {} vertices, {} triangles",
            model.name,
            mesh.positions.len() / 3,
            mesh.indices.len() / 3
        );
    }

    if indices.is_empty() {
        return Err(LoadError::NoGeometry(path.to_path_buf()));
    }

    let normals = if all_have_normals { Some(normals) } else { None };
    let mut mesh = Mesh::new(positions, indices, normals);
    mesh.ensure_normals();

    Ok(mesh)
}
