//! Errors raised while loading scene files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a scene description or mesh.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ error in {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Invalid primitive: {0}")]
    InvalidPrimitive(String),

    #[error("No geometry found in {0}")]
    NoGeometry(PathBuf),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;
