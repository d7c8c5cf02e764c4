use serde::{Deserialize, Serialize};

use super::point::Point2d;

/// Relation of one box to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxRelation {
    /// No proper nesting. Partial overlap collapses here too.
    Disjoint,
    /// The other box lies inside this one (edges may touch).
    Contains,
    /// This box lies inside the other one.
    ContainedBy,
}

/// Axis-aligned bounds in the contour plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// A box containing nothing; adding any point makes it that point.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn from_points(points: &[Point2d]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.add_point(*p);
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn add_point(&mut self, p: Point2d) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Enlarge this box to also cover `other`.
    pub fn grow(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.grow(other);
        out
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Four-sided comparison. Containment is inclusive and checked before
    /// `ContainedBy`, so identical boxes report `Contains`.
    pub fn relation(&self, other: &BoundingBox) -> BoxRelation {
        if other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y
        {
            return BoxRelation::Disjoint;
        }
        if other.max_x <= self.max_x
            && other.min_x >= self.min_x
            && other.max_y <= self.max_y
            && other.min_y >= self.min_y
        {
            return BoxRelation::Contains;
        }
        if other.max_x >= self.max_x
            && other.min_x <= self.min_x
            && other.max_y >= self.max_y
            && other.min_y <= self.min_y
        {
            return BoxRelation::ContainedBy;
        }
        BoxRelation::Disjoint
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.relation(other) == BoxRelation::Contains
    }
}
