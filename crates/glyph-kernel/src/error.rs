use thiserror::Error;

/// Precondition failures of fallible geometry constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon has {provided} points, need at least {required}")]
    InsufficientPoints { required: usize, provided: usize },

    #[error("coordinate ({x}, {y}) is not finite")]
    NonFiniteCoordinate { x: f64, y: f64 },
}
