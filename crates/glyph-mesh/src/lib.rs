pub mod cap;
pub mod error;
pub mod export;
pub mod mesh;
pub mod optimize;
pub mod recipes;
pub mod revolve;
pub mod settings;
pub mod sweep;
pub mod validation;

pub use cap::{ear_clip, fill_face};
pub use error::MeshError;
pub use export::{export_ascii_stl, export_binary_stl, export_obj};
pub use mesh::{Mesh, Vertex};
pub use optimize::{WeldTolerance, optimize, optimize_with, weld_positions};
pub use recipes::{bevel_edge, bevel_extrude, bevel_extrude_with_holes, extrude_wall};
pub use revolve::{MIN_ANGLE_STEP, revolution, ring_count};
pub use settings::{BevelSettings, DEFAULT_AUTO_SMOOTH_ANGLE, Facing, Side, Smoothing};
pub use sweep::{BevelStage, bevel, cylinder, fill_edge};
pub use validation::{MeshValidation, WELD_EPSILON, validate_mesh};
