//! Lumen Core - scene data shared by the renderer and the command line.
//!
//! This crate provides:
//!
//! - **Materials**: `Material` and the `Color` triple
//! - **Geometry**: `Mesh`, `Triangle` (Möller-Trumbore) and the per-mesh `Octree`
//! - **Scene files**: the JSON `SceneDescription` and OBJ mesh loading
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_description;
//!
//! let description = load_description("cornell.json")?;
//! println!("{} objects, {} lights",
//!     description.objects.len(),
//!     description.lights.len());
//! ```

pub mod description;
pub mod error;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod octree;
pub mod triangle;

// Re-export commonly used types
pub use description::{
    CameraDescription, LightDescription, MeshTransform, ObjectDescription, PhotonDescription,
    RenderDescription, SceneDescription,
};
pub use error::{LoadError, LoadResult};
pub use loader::{load_description, load_obj_mesh, parse_description};
pub use material::{Color, Material};
pub use mesh::Mesh;
pub use octree::{Octree, DEFAULT_MAX_DEPTH, LEAF_TRIANGLES};
pub use triangle::{Triangle, TriangleHit};
