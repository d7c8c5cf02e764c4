//! Flat caps by ear clipping.
//!
//! The contour may be concave and may repeat points (a drilled polygon
//! visits every bridge endpoint twice), but must not self-intersect.

use glyph_kernel::{Defect, Point2d, Polygon, Vec3, Winding, record};
use tracing::debug;

use crate::mesh::Mesh;
use crate::settings::Side;

/// Heights below this count as lying on the ear's base line.
const BASE_EPSILON: f64 = 1e-9;

/// Triangulate `polygon` into a flat cap at height `z`.
///
/// A top cap faces +z, a bottom cap faces -z. An `n`-point contour always
/// yields `n - 2` triangles. Contours with fewer than 3 points are skipped
/// and reported.
pub fn fill_face(mesh: &mut Mesh, polygon: &Polygon, z: f64, side: Side, defects: &mut Vec<Defect>) {
    if !polygon.is_usable() {
        record(
            defects,
            Defect::degenerate(format!("cap contour has {} points, skipped", polygon.len())),
        );
        return;
    }

    let contour = polygon.oriented(Winding::CounterClockwise);
    let points = contour.points();
    let normal = Vec3::Z * side.sign();
    let base: Vec<u32> = points
        .iter()
        .map(|p| mesh.add_vertex(p.with_z(z), normal))
        .collect();

    for [a, b, c] in ear_clip(points) {
        match side {
            Side::Top => mesh.add_triangle(base[a], base[b], base[c]),
            Side::Bottom => mesh.add_triangle(base[c], base[b], base[a]),
        }
    }
}

/// Ear clipping over a counter-clockwise contour. Returns counter-clockwise
/// index triples into `points`.
pub fn ear_clip(points: &[Point2d]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let mut ring: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while ring.len() > 3 {
        let m = ring.len();
        let corner = |i: usize| {
            (
                points[ring[(i + m - 1) % m]],
                points[ring[i]],
                points[ring[(i + 1) % m]],
            )
        };

        let ear = (0..m)
            .find(|&i| {
                let (p0, p1, p2) = corner(i);
                turn(p0, p1, p2) > 0.0
                    && !ring
                        .iter()
                        .map(|&k| points[k])
                        .filter(|&p| p != p0 && p != p1 && p != p2)
                        .any(|p| ear_contains(p0, p1, p2, p))
            })
            .or_else(|| {
                // no clean ear: numerically flat corners or touching contours
                (0..m).find(|&i| {
                    let (p0, p1, p2) = corner(i);
                    turn(p0, p1, p2) >= 0.0
                })
            });
        let i = ear.unwrap_or_else(|| {
            debug!(remaining = m, "no convex corner left, clipping first vertex");
            0
        });

        triangles.push([ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]]);
        ring.remove(i);
    }
    triangles.push([ring[0], ring[1], ring[2]]);
    triangles
}

/// Positive for a left turn at `p1`.
fn turn(p0: Point2d, p1: Point2d, p2: Point2d) -> f64 {
    (p1 - p0).cross(&(p2 - p1))
}

/// True when `p` lies strictly inside the ear `p0, p1, p2`.
///
/// `p` is measured by its height above the base `p0 -> p2`, then projected
/// from the apex `p1` onto the base line; the projection must land strictly
/// between `p0` and `p2`.
fn ear_contains(p0: Point2d, p1: Point2d, p2: Point2d, p: Point2d) -> bool {
    let Some(forward) = (p2 - p0).normalized() else {
        return false;
    };
    let mut normal = forward.right_perp();
    let mut apex = normal.dot(&(p1 - p0));
    if apex < 0.0 {
        normal = -normal;
        apex = -apex;
    }
    let height = normal.dot(&(p - p0));
    if height <= BASE_EPSILON || height >= apex {
        return false;
    }
    let projected = p1 + (p - p1) * (apex / (apex - height));
    let d0 = forward.dot(&(p0 - projected));
    let d2 = forward.dot(&(p2 - projected));
    d0 * d2 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(points: &[Point2d], tris: &[[usize; 3]]) -> f64 {
        tris.iter()
            .map(|&[a, b, c]| (points[b] - points[a]).cross(&(points[c] - points[a])) * 0.5)
            .sum()
    }

    #[test]
    fn test_square_gives_two_triangles() {
        let sq = Polygon::from_pairs(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let tris = ear_clip(sq.points());
        assert_eq!(tris.len(), 2);
        assert!((area(sq.points(), &tris) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_concave_l_shape() {
        let l = Polygon::from_pairs(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);
        let tris = ear_clip(l.points());
        assert_eq!(tris.len(), 4);
        assert!((area(l.points(), &tris) - 3.0).abs() < 1e-12);
        for &[a, b, c] in &tris {
            assert!(turn(l.points()[a], l.points()[b], l.points()[c]) > 0.0);
        }
    }

    #[test]
    fn test_ear_contains() {
        let p0 = Point2d::new(0.0, 0.0);
        let p1 = Point2d::new(1.0, 2.0);
        let p2 = Point2d::new(2.0, 0.0);
        assert!(ear_contains(p0, p1, p2, Point2d::new(1.0, 0.5)));
        assert!(!ear_contains(p0, p1, p2, Point2d::new(1.9, 1.5)));
        assert!(!ear_contains(p0, p1, p2, Point2d::new(1.0, 0.0)));
        assert!(!ear_contains(p0, p1, p2, Point2d::new(1.0, -0.5)));
    }

    #[test]
    fn test_fill_face_orientation() {
        // clockwise input, top cap must still face +z
        let sq = Polygon::from_pairs(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let mut mesh = Mesh::new();
        let mut defects = Vec::new();
        fill_face(&mut mesh, &sq, 0.5, Side::Top, &mut defects);
        fill_face(&mut mesh, &sq, -0.5, Side::Bottom, &mut defects);
        assert!(defects.is_empty());
        assert_eq!(mesh.triangle_count(), 4);
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle_positions(t);
            let n = (b - a).cross(&(c - a));
            assert_eq!(n.z > 0.0, a.z > 0.0);
        }
    }

    #[test]
    fn test_degenerate_contour_is_reported() {
        let mut mesh = Mesh::new();
        let mut defects = Vec::new();
        let line = Polygon::from_pairs(&[(0.0, 0.0), (1.0, 0.0)]);
        fill_face(&mut mesh, &line, 0.0, Side::Top, &mut defects);
        assert!(mesh.is_empty());
        assert_eq!(defects.len(), 1);
    }
}
