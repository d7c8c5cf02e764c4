//! Multi-angle silhouette spacing.
//!
//! Each glyph's outline points are projected along a fan of shear
//! directions. The left and right extent of every projection, taken relative
//! to the glyph's box, tells how far the next glyph may slide in before the
//! two silhouettes come closer than the requested gap along any sampled
//! direction.

use glyph_kernel::{BoundingBox, Point2d, Polygon};
use serde::{Deserialize, Serialize};

use crate::config::KerningConfig;

/// Weight of the silhouette overlap in the advance.
const OVERLAP_WEIGHT: f64 = 0.8;

/// Accumulates projected extents while a glyph's contours are added.
#[derive(Debug, Clone)]
pub struct KerningBuilder {
    shears: Vec<f64>,
    scales: Vec<f64>,
    left: Vec<f64>,
    right: Vec<f64>,
    seen_point: bool,
}

impl KerningBuilder {
    pub fn new(config: &KerningConfig) -> Self {
        let steps = config.angle_steps as i64;
        let step = if steps > 0 {
            config.max_angle_deg / steps as f64
        } else {
            0.0
        };
        let angles: Vec<f64> = (-steps..=steps)
            .map(|s| (s as f64 * step).to_radians())
            .collect();
        let count = angles.len();
        Self {
            shears: angles.iter().map(|a| a.tan()).collect(),
            scales: angles.iter().map(|a| 1.0 / a.cos()).collect(),
            left: vec![0.0; count],
            right: vec![0.0; count],
            seen_point: false,
        }
    }

    /// Widen every projected interval to cover `face`.
    pub fn add_face(&mut self, face: &Polygon) {
        for point in face {
            for (s, &shear) in self.shears.iter().enumerate() {
                let pos = calc_pos(shear, point);
                if self.seen_point {
                    self.left[s] = self.left[s].min(pos);
                    self.right[s] = self.right[s].max(pos);
                } else {
                    self.left[s] = pos;
                    self.right[s] = pos;
                }
            }
            self.seen_point = true;
        }
    }

    /// Finish the source: left extents become relative to `bbox.min_x`,
    /// right extents relative to `bbox.max_x`.
    pub fn calc(mut self, bbox: BoundingBox, baseline_offset: f64) -> KerningSource {
        if !bbox.is_empty() {
            for l in &mut self.left {
                *l -= bbox.min_x;
            }
            for r in &mut self.right {
                *r -= bbox.max_x;
            }
        }
        KerningSource {
            shears: self.shears,
            scales: self.scales,
            left: self.left,
            right: self.right,
            bbox,
            baseline_offset,
        }
    }
}

/// Position of `point` along the shear direction with slope `shear`.
pub fn calc_pos(shear: f64, point: &Point2d) -> f64 {
    point.x + shear * point.y
}

/// Finished spacing data for one glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KerningSource {
    /// `tan` of each sampled shear angle.
    pub shears: Vec<f64>,
    /// `1 / cos` of each sampled shear angle.
    pub scales: Vec<f64>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub bbox: BoundingBox,
    /// Left edge of the whole font's box.
    pub baseline_offset: f64,
}

impl KerningSource {
    pub fn width(&self) -> f64 {
        self.bbox.width()
    }

    /// Advance to add before this glyph when it follows `prev`.
    ///
    /// The smallest over all sampled angles of
    /// `(prev.right - left) * 0.8 + scale - (1 - gap)`. No previous glyph
    /// means no kerning.
    pub fn get_kerning(&self, prev: Option<&KerningSource>, gap: f64) -> f64 {
        let Some(prev) = prev else {
            return 0.0;
        };
        self.left
            .iter()
            .zip(&prev.right)
            .zip(&self.scales)
            .map(|((left, right), scale)| (right - left) * OVERLAP_WEIGHT + scale - (1.0 - gap))
            .reduce(f64::min)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_square() -> Polygon {
        Polygon::from_pairs(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn source_for(face: &Polygon, config: &KerningConfig) -> KerningSource {
        let mut builder = KerningBuilder::new(config);
        builder.add_face(face);
        builder.calc(face.bbox(), 0.0)
    }

    #[test]
    fn test_sample_angles() {
        let builder = KerningBuilder::new(&KerningConfig::default());
        assert_eq!(builder.shears.len(), 5);
        assert_abs_diff_eq!(builder.shears[0], -(20f64.to_radians().tan()), epsilon = 1e-15);
        assert_eq!(builder.shears[2], 0.0);
        assert_eq!(builder.scales[2], 1.0);

        let single = KerningBuilder::new(&KerningConfig {
            max_angle_deg: 20.0,
            angle_steps: 0,
        });
        assert_eq!(single.shears, vec![0.0]);
    }

    #[test]
    fn test_intervals_are_relative_to_box() {
        let config = KerningConfig::default();
        let shifted = unit_square().shifted(Point2d::new(5.0, 0.0));
        let a = source_for(&unit_square(), &config);
        let b = source_for(&shifted, &config);
        for s in 0..a.left.len() {
            assert_abs_diff_eq!(a.left[s], b.left[s], epsilon = 1e-12);
            assert_abs_diff_eq!(a.right[s], b.right[s], epsilon = 1e-12);
        }
        // unsheared projection spans the box exactly
        assert_eq!(a.left[2], 0.0);
        assert_eq!(a.right[2], 0.0);
        assert_eq!(a.width(), 1.0);
    }

    #[test]
    fn test_no_previous_glyph_means_no_kerning() {
        let a = source_for(&unit_square(), &KerningConfig::default());
        assert_eq!(a.get_kerning(None, 0.3), 0.0);
    }

    #[test]
    fn test_square_pair_matches_recomputation() {
        let config = KerningConfig::default();
        let a = source_for(&unit_square(), &config);
        let expected = (0..a.shears.len())
            .map(|s| (a.right[s] - a.left[s]) * 0.8 + a.scales[s] - 0.7)
            .fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(a.get_kerning(Some(&a), 0.3), expected, epsilon = 1e-12);
        // the unsheared direction wins for a square
        assert_abs_diff_eq!(expected, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_builder_has_zero_intervals() {
        let source = KerningBuilder::new(&KerningConfig::default()).calc(BoundingBox::empty(), 0.0);
        assert!(source.left.iter().all(|&l| l == 0.0));
        assert_eq!(source.width(), 0.0);
    }
}
