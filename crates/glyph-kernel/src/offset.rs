//! Per-vertex miter computation and polygon offsetting.
//!
//! Angles here are compass angles: `atan2(x, y)`, zero along +y, growing
//! towards +x. The unit direction of a compass angle `a` is `(sin a, cos a)`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point2d;
use crate::geometry::polygon::Polygon;

/// Quadratic coefficient approximating `1/cos(half_turn)` as
/// `1 + c * half_turn²`.
pub const MITER_QUADRATIC: f64 = 0.671497735;

/// Miter length factor for a corner turning by `2 * half_turn` radians.
pub fn miter_distance(half_turn: f64) -> f64 {
    1.0 + MITER_QUADRATIC * half_turn * half_turn
}

/// Offset data for one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tangent {
    /// Normal direction of the edge arriving at the vertex.
    pub incoming_angle: f64,
    /// Normal direction of the edge leaving the vertex. Equal to
    /// `incoming_angle + turn`, unwrapped, so the two can be averaged.
    pub outgoing_angle: f64,
    /// Miter factor applied to the offset width at this vertex.
    pub offset_distance: f64,
}

impl Tangent {
    /// Bisector of the two edge normals.
    pub fn mid_angle(&self) -> f64 {
        (self.incoming_angle + self.outgoing_angle) * 0.5
    }

    /// Signed turn at this vertex, in `(-π, π]`.
    pub fn turn(&self) -> f64 {
        self.outgoing_angle - self.incoming_angle
    }
}

/// One tangent per vertex, index-aligned with `polygon`.
pub fn generate_tangents(polygon: &Polygon) -> Vec<Tangent> {
    let n = polygon.len();
    if n == 0 {
        return Vec::new();
    }
    let points = polygon.points();
    // heading[i] is the edge from vertex i to vertex i + 1
    let headings: Vec<f64> = (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).compass_angle())
        .collect();

    (0..n)
        .map(|i| {
            let incoming = headings[(i + n - 1) % n];
            let outgoing = headings[i];
            let mut diff = outgoing - incoming;
            if diff > PI {
                diff -= TAU;
            }
            if diff < -PI {
                diff += TAU;
            }
            Tangent {
                incoming_angle: incoming - FRAC_PI_2,
                outgoing_angle: incoming + diff - FRAC_PI_2,
                offset_distance: miter_distance((diff * 0.5).abs()),
            }
        })
        .collect()
}

/// Offset every vertex along its bisecting normal by `width` scaled with the
/// vertex's miter factor. The normal points to the left of the direction of
/// travel, so positive widths enlarge clockwise contours and shrink
/// counter-clockwise ones. `width == 0` returns the input points.
pub fn grow(polygon: &Polygon, width: f64) -> Polygon {
    let tangents = generate_tangents(polygon);
    grow_with(polygon, &tangents, width)
}

/// [`grow`] with precomputed tangents.
pub fn grow_with(polygon: &Polygon, tangents: &[Tangent], width: f64) -> Polygon {
    Polygon::new(
        polygon
            .iter()
            .zip(tangents)
            .map(|(p, t)| *p + Point2d::from_compass(t.mid_angle()) * (t.offset_distance * width))
            .collect(),
    )
}
