use std::path::PathBuf;

use glyph_mesh::MeshError;
use thiserror::Error;

/// Errors while loading font data or configuration.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("codepoint {key:?} is not an integer")]
    InvalidCodepoint { key: String },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}
