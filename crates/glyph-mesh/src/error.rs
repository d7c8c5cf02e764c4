use thiserror::Error;

/// Failures caused by invalid sweep parameters or malformed mesh data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("bevel needs at least one slice")]
    ZeroSlices,

    #[error("{name} must be positive and finite, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("bevel radius {radius} does not fit into height {height}")]
    RadiusTooLarge { radius: f64, height: f64 },

    #[error("angle step {step} must be in [0.001, 120] degrees")]
    InvalidAngleStep { step: f64 },

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("index list of length {len} is not a whole number of triangles")]
    IncompleteTriangle { len: usize },

    #[error("mesh has no triangles")]
    EmptyMesh,
}
