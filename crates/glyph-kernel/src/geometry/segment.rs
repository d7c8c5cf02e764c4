use super::point::Point2d;
use crate::default_tolerance;

/// A straight segment between two contour points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2d,
    pub end: Point2d,
}

impl Segment {
    pub fn new(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// True when `other` properly crosses this segment.
    ///
    /// `other`'s endpoints are projected onto this segment's axis and its
    /// perpendicular. They must straddle the perpendicular, and the crossing
    /// point must fall strictly inside this segment. Segments meeting at a
    /// shared endpoint and collinear overlap do not count.
    pub fn crosses(&self, other: &Segment) -> bool {
        if self.shares_endpoint(other) {
            return false;
        }
        let delta = self.end - self.start;
        let length = delta.length();
        let forward = if length > 0.0 { delta * (1.0 / length) } else { delta };
        let normal = forward.right_perp();

        let d1 = other.start - self.start;
        let d2 = other.end - self.start;
        let f1 = forward.dot(&d1);
        let f2 = forward.dot(&d2);
        if f1 <= 0.0 && f2 <= 0.0 {
            return false;
        }
        if f1 >= length && f2 >= length {
            return false;
        }

        let s1 = normal.dot(&d1);
        let s2 = normal.dot(&d2);
        if s1 * s2 > 0.0 || s1 == s2 {
            return false;
        }
        let pos = f1 - s1 * (f2 - f1) / (s2 - s1);
        pos > 0.0 && pos < length
    }

    /// True when an endpoint of `other` coincides with an endpoint of this
    /// segment. Side tests at such a point are rounding noise.
    pub fn shares_endpoint(&self, other: &Segment) -> bool {
        let tol = default_tolerance();
        [self.start, self.end].iter().any(|a| {
            [other.start, other.end]
                .iter()
                .any(|b| tol.points_coincident(a, b))
        })
    }
}
