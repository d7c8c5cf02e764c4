use std::f64::consts::PI;

use glyph_kernel::Tangent;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Default smoothing threshold, as a fraction of π.
pub const DEFAULT_AUTO_SMOOTH_ANGLE: f64 = 0.35;

/// Decides per vertex whether the normals of the two adjacent wall faces are
/// blended (rounded look) or kept apart (hard edge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Smoothing {
    /// Turn angles below `threshold * π` are smoothed.
    pub threshold: f64,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_AUTO_SMOOTH_ANGLE,
        }
    }
}

impl Smoothing {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Every corner kept sharp.
    pub fn faceted() -> Self {
        Self { threshold: 0.0 }
    }

    /// `true` gives the default threshold, `false` gives [`Smoothing::faceted`].
    pub fn from_flag(smooth: bool) -> Self {
        if smooth {
            Self::default()
        } else {
            Self::faceted()
        }
    }

    pub fn blends(&self, turn: f64) -> bool {
        turn.abs() < self.threshold * PI
    }

    /// Normal angle at a vertex, seen from the wall face that leaves it.
    pub fn leading_angle(&self, tangent: &Tangent) -> f64 {
        if self.blends(tangent.turn()) {
            tangent.mid_angle()
        } else {
            tangent.outgoing_angle
        }
    }

    /// Normal angle at a vertex, seen from the wall face that arrives at it.
    pub fn trailing_angle(&self, tangent: &Tangent) -> f64 {
        if self.blends(tangent.turn()) {
            tangent.mid_angle()
        } else {
            tangent.incoming_angle
        }
    }
}

/// Which face of a slab a sweep belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn sign(self) -> f64 {
        match self {
            Side::Top => 1.0,
            Side::Bottom => -1.0,
        }
    }
}

/// Whether a wall faces away from the region its contour encloses (outer
/// walls) or into it (hole walls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Outward,
    Inward,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Facing::Outward => 1.0,
            Facing::Inward => -1.0,
        }
    }
}

/// Shape parameters shared by the extrusion recipes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BevelSettings {
    /// Total thickness along z; the slab spans `[-height/2, height/2]`.
    pub height: f64,
    /// Radius of the rounded edge. Zero gives a straight extrusion.
    pub radius: f64,
    /// Number of segments along each quarter-circle edge.
    pub slices: usize,
    pub smoothing: Smoothing,
}

impl BevelSettings {
    pub fn new(height: f64, radius: f64, slices: usize, smooth: bool) -> Self {
        Self {
            height,
            radius,
            slices,
            smoothing: Smoothing::from_flag(smooth),
        }
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(MeshError::InvalidDimension {
                name: "height",
                value: self.height,
            });
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(MeshError::InvalidDimension {
                name: "radius",
                value: self.radius,
            });
        }
        if self.radius * 2.0 > self.height {
            return Err(MeshError::RadiusTooLarge {
                radius: self.radius,
                height: self.height,
            });
        }
        if self.slices == 0 {
            return Err(MeshError::ZeroSlices);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert_eq!(
            BevelSettings::new(1.0, 0.1, 0, true).validate(),
            Err(MeshError::ZeroSlices)
        );
        assert!(matches!(
            BevelSettings::new(-1.0, 0.1, 1, true).validate(),
            Err(MeshError::InvalidDimension { name: "height", .. })
        ));
        assert!(matches!(
            BevelSettings::new(0.2, 0.15, 1, true).validate(),
            Err(MeshError::RadiusTooLarge { .. })
        ));
        assert!(BevelSettings::new(1.0, 0.0, 1, false).validate().is_ok());
    }

    #[test]
    fn test_smoothing_threshold() {
        let smooth = Smoothing::default();
        assert!(smooth.blends(0.3 * PI));
        assert!(!smooth.blends(0.5 * PI));
        assert!(!Smoothing::faceted().blends(0.01));
    }

    #[test]
    fn test_sharp_corner_keeps_face_normals() {
        let t = Tangent {
            incoming_angle: 0.0,
            outgoing_angle: PI / 2.0,
            offset_distance: 1.0,
        };
        let s = Smoothing::default();
        assert_eq!(s.leading_angle(&t), PI / 2.0);
        assert_eq!(s.trailing_angle(&t), 0.0);
        let soft = Smoothing::new(1.0);
        assert_eq!(soft.leading_angle(&t), PI / 4.0);
    }
}
