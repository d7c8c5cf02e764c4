use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::bbox::BoundingBox;
use super::point::Point2d;
use crate::error::GeometryError;

/// Traversal direction of a closed contour in a y-up plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    pub fn opposite(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

/// An implicitly closed contour: the last point connects back to the first,
/// and the closing point is never stored twice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point2d>,
}

impl Polygon {
    /// Wrap a point list as-is. Geometric operations assume at least 3 points;
    /// use [`Polygon::try_new`] at input boundaries.
    pub fn new(points: Vec<Point2d>) -> Self {
        Self { points }
    }

    pub fn try_new(points: Vec<Point2d>) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::InsufficientPoints {
                required: 3,
                provided: points.len(),
            });
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate { x: bad.x, y: bad.y });
        }
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().copied().map(Point2d::from).collect())
    }

    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2d> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// At least 3 points: the minimum for any geometric operation.
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 3
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point2d> {
        self.points.iter()
    }

    /// The vertex at `index`, wrapping around the contour.
    pub fn vertex(&self, index: usize) -> Point2d {
        self.points[index % self.points.len()]
    }

    /// Sum of signed turning angles between successive edges, each normalized
    /// into `(-π, π]`. Edges of zero length carry no direction and are skipped.
    pub fn total_turning(&self) -> f64 {
        let tol = crate::default_tolerance();
        let n = self.points.len();
        let headings: Vec<f64> = (0..n)
            .filter_map(|i| {
                let edge = self.points[(i + 1) % n] - self.points[i];
                if tol.is_zero_length(edge.length()) {
                    None
                } else {
                    Some(edge.y.atan2(edge.x))
                }
            })
            .collect();

        let m = headings.len();
        (0..m)
            .map(|i| normalize_turn(headings[(i + 1) % m] - headings[i]))
            .sum()
    }

    /// Orientation from the accumulated turning angle; a negative total means
    /// clockwise. Degenerate polygons report counter-clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.total_turning() < 0.0
    }

    pub fn winding(&self) -> Winding {
        if self.is_clockwise() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.points.iter().rev().copied().collect())
    }

    /// This polygon with the requested winding, reversing it if needed.
    pub fn oriented(&self, winding: Winding) -> Self {
        if self.winding() == winding {
            self.clone()
        } else {
            self.reversed()
        }
    }

    /// Cyclically rotate the vertex list so vertex `k` comes first.
    pub fn rotated(&self, k: usize) -> Self {
        let mut points = self.points.clone();
        if !points.is_empty() {
            let k = k % points.len();
            points.rotate_left(k);
        }
        Self::new(points)
    }

    pub fn shift(&mut self, by: Point2d) {
        for p in &mut self.points {
            *p = *p + by;
        }
    }

    pub fn shifted(&self, by: Point2d) -> Self {
        let mut out = self.clone();
        out.shift(by);
        out
    }

    /// Shoelace area, positive for counter-clockwise contours.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].cross(&self.points[(i + 1) % n]))
            .sum::<f64>()
            * 0.5
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

impl From<Vec<Point2d>> for Polygon {
    fn from(points: Vec<Point2d>) -> Self {
        Self::new(points)
    }
}

impl<'a> IntoIterator for &'a Polygon {
    type Item = &'a Point2d;
    type IntoIter = std::slice::Iter<'a, Point2d>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Normalize an angle difference into `(-π, π]`.
pub fn normalize_turn(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// An outer contour plus the holes it encloses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolygonWithHoles {
    pub outer: Polygon,
    pub holes: Vec<Polygon>,
}

impl PolygonWithHoles {
    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Self {
        Self { outer, holes }
    }

    pub fn solid(outer: Polygon) -> Self {
        Self::new(outer, Vec::new())
    }

    pub fn shift(&mut self, by: Point2d) {
        self.outer.shift(by);
        for hole in &mut self.holes {
            hole.shift(by);
        }
    }

    /// Every contour, outer first.
    pub fn contours(&self) -> impl Iterator<Item = &Polygon> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub fn drilled(&self) -> crate::Outcome<Polygon> {
        crate::drill::drill(&self.outer, &self.holes)
    }
}

/// A rectangle of the given size centred at the origin, with each corner
/// replaced by a quarter circle of `step` segments. `step == 0` emits one point
/// per corner. Corners run top-left, top-right, bottom-right, bottom-left.
pub fn rounded_rect(width: f64, height: f64, radius: f64, step: usize) -> Polygon {
    let mut points = Vec::with_capacity(4 * (step + 1));
    for corner in 0..4usize {
        let h = corner & 1 != 0;
        let v = corner & 2 != 0;
        let center = Point2d::new(
            (width * 0.5 - radius) * if h ^ v { 1.0 } else { -1.0 },
            (height * 0.5 - radius) * if v { -1.0 } else { 1.0 },
        );
        let arc = |t: f64| {
            let angle = (t + corner as f64) * FRAC_PI_2;
            center + Point2d::new(-angle.cos(), angle.sin()) * radius
        };
        if step == 0 {
            points.push(arc(0.0));
        } else {
            for i in 0..=step {
                points.push(arc(i as f64 / step as f64));
            }
        }
    }
    Polygon::new(points)
}
