pub mod defect;
pub mod drill;
pub mod error;
pub mod geometry;
pub mod offset;

// Re-export the working types at crate root for convenience.
pub use defect::{Defect, DefectKind, Outcome, Severity, record};
pub use drill::{Drilled, drill, drill_detailed};
pub use error::GeometryError;
pub use geometry::bbox::{BoundingBox, BoxRelation};
pub use geometry::point::{Point2d, Point3d};
pub use geometry::polygon::{Polygon, PolygonWithHoles, Winding, normalize_turn, rounded_rect};
pub use geometry::segment::Segment;
pub use geometry::vector::Vec3;
pub use offset::{MITER_QUADRATIC, Tangent, generate_tangents, grow, grow_with, miter_distance};

/// Tolerance configuration for planar comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Edges shorter than this carry no direction and are skipped when
    /// measuring turning angles.
    pub coincidence: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-12,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point2d, b: &Point2d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
