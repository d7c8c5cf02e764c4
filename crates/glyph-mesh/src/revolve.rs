//! Surfaces of revolution from 2D profiles.
//!
//! A profile point `(x, y)` sits at distance `radius + x` from the z axis and
//! at height `y`. Ring `k` is the profile rotated by `k * angle_step` degrees
//! about z; the last ring connects back to ring 0, so the seam is shared and
//! never duplicated.

use glyph_kernel::{Defect, Outcome, Point2d, Point3d, Polygon, Vec3, Winding, record};
use tracing::{debug, instrument};

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Finest accepted angle step in degrees; 360 000 rings per revolution.
pub const MIN_ANGLE_STEP: f64 = 1e-3;

/// Revolve every profile fully around the z axis.
///
/// `smooth` shares ring vertices and averages the normals of neighbouring
/// profile edges; otherwise every quad has its own vertices and one flat
/// normal. `close` also sweeps the profile's last-to-first segment. Profiles
/// with fewer than 3 points are skipped and reported.
#[instrument(skip(profiles), fields(profiles = profiles.len()))]
pub fn revolution(
    profiles: &[Polygon],
    radius: f64,
    angle_step: f64,
    smooth: bool,
    close: bool,
) -> Result<Outcome<Mesh>, MeshError> {
    if !(MIN_ANGLE_STEP..=120.0).contains(&angle_step) {
        return Err(MeshError::InvalidAngleStep { step: angle_step });
    }
    if !radius.is_finite() {
        return Err(MeshError::InvalidDimension {
            name: "radius",
            value: radius,
        });
    }
    let rings = ring_count(angle_step);
    let angles: Vec<f64> = (0..rings)
        .map(|k| (k as f64 * angle_step).to_radians())
        .collect();

    let mut mesh = Mesh::new();
    let mut defects = Vec::new();
    for (p, profile) in profiles.iter().enumerate() {
        if !profile.is_usable() {
            record(
                &mut defects,
                Defect::degenerate(format!(
                    "profile {p} has {} points, skipped",
                    profile.len()
                )),
            );
            continue;
        }
        let profile = profile.oriented(Winding::Clockwise);
        let edges = edge_normals(&profile, close);
        if smooth {
            sweep_smooth(&mut mesh, &profile, &edges, radius, &angles, close);
        } else {
            sweep_faceted(&mut mesh, &profile, &edges, radius, &angles);
        }
    }
    debug!(
        rings,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "revolved profiles"
    );
    Ok(Outcome::with_defects(mesh, defects))
}

/// Number of distinct rings for `angle_step` degrees; the last gap may be
/// narrower than the others.
pub fn ring_count(angle_step: f64) -> usize {
    ((360.0 / angle_step) - 1e-9).ceil() as usize
}

/// Outward normal of each swept profile edge `j -> j + 1`, in profile
/// coordinates. Zero-length edges have none.
fn edge_normals(profile: &Polygon, close: bool) -> Vec<Option<Point2d>> {
    let n = profile.len();
    let count = if close { n } else { n - 1 };
    (0..count)
        .map(|j| {
            (profile.vertex(j + 1) - profile.vertex(j))
                .normalized()
                .map(|d| Point2d::new(-d.y, d.x))
        })
        .collect()
}

fn place(point: Point2d, radius: f64, angle: f64) -> Point3d {
    let dist = radius + point.x;
    Point3d::new(dist * angle.sin(), dist * angle.cos(), point.y)
}

fn orient(normal: Point2d, angle: f64) -> Vec3 {
    Vec3::new(normal.x * angle.sin(), normal.x * angle.cos(), normal.y)
}

fn sweep_smooth(
    mesh: &mut Mesh,
    profile: &Polygon,
    edges: &[Option<Point2d>],
    radius: f64,
    angles: &[f64],
    close: bool,
) {
    let n = profile.len();
    let e = edges.len();
    // averaged normal per profile vertex
    let normals: Vec<Point2d> = (0..n)
        .map(|j| {
            let before = if j > 0 || close { edges[(j + e - 1) % e] } else { None };
            let after = if j < e { edges[j] } else { None };
            match (before, after) {
                (Some(a), Some(b)) => (a + b).normalized().unwrap_or(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => Point2d::ORIGIN,
            }
        })
        .collect();

    let first = mesh.vertex_count() as u32;
    for &angle in angles {
        for (point, normal) in profile.iter().zip(&normals) {
            mesh.add_vertex(place(*point, radius, angle), orient(*normal, angle));
        }
    }
    let rings = angles.len();
    let id = |k: usize, j: usize| first + ((k % rings) * n + j % n) as u32;
    for k in 0..rings {
        for (j, edge) in edges.iter().enumerate() {
            if edge.is_none() {
                continue;
            }
            let (a, b) = (id(k, j), id(k, j + 1));
            let (d, c) = (id(k + 1, j), id(k + 1, j + 1));
            mesh.add_triangle(a, d, c);
            mesh.add_triangle(c, b, a);
        }
    }
}

fn sweep_faceted(
    mesh: &mut Mesh,
    profile: &Polygon,
    edges: &[Option<Point2d>],
    radius: f64,
    angles: &[f64],
) {
    let rings = angles.len();
    for k in 0..rings {
        let (start, end) = (angles[k], angles[(k + 1) % rings]);
        let end_unwrapped = if k + 1 == rings { std::f64::consts::TAU } else { end };
        let mid = (start + end_unwrapped) * 0.5;
        for (j, edge) in edges.iter().enumerate() {
            let Some(normal) = edge else {
                continue;
            };
            let normal = orient(*normal, mid);
            let (p0, p1) = (profile.vertex(j), profile.vertex(j + 1));
            let [a, b, c, d] = [
                place(p0, radius, start),
                place(p1, radius, start),
                place(p1, radius, end),
                place(p0, radius, end),
            ]
            .map(|p| mesh.add_vertex(p, normal));
            mesh.add_triangle(a, d, c);
            mesh.add_triangle(c, b, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn triangle_profile() -> Polygon {
        Polygon::from_pairs(&[(0.0, 0.0), (0.5, 0.0), (0.25, 0.5)])
    }

    #[test]
    fn test_ring_count() {
        assert_eq!(ring_count(90.0), 4);
        assert_eq!(ring_count(0.1), 3600);
        assert_eq!(ring_count(7.0), 52);
        assert_eq!(ring_count(120.0), 3);
    }

    #[test]
    fn test_rejects_bad_step() {
        assert!(matches!(
            revolution(&[triangle_profile()], 1.0, 0.0, true, true),
            Err(MeshError::InvalidAngleStep { .. })
        ));
        assert!(matches!(
            revolution(&[triangle_profile()], 1.0, 180.0, true, true),
            Err(MeshError::InvalidAngleStep { .. })
        ));
    }

    #[test]
    fn test_rejects_vanishing_step() {
        for step in [1e-300, f64::MIN_POSITIVE, 5e-4, f64::NAN] {
            assert!(matches!(
                revolution(&[triangle_profile()], 1.0, step, true, true),
                Err(MeshError::InvalidAngleStep { .. })
            ));
        }
        assert_eq!(ring_count(MIN_ANGLE_STEP), 360_000);
    }

    #[test]
    fn test_smooth_shares_ring_vertices() {
        let mesh = revolution(&[triangle_profile()], 1.0, 90.0, true, true)
            .expect("valid step")
            .value;
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert_eq!(mesh.triangle_count(), 4 * 3 * 2);
    }

    #[test]
    fn test_open_profile_skips_closing_segment() {
        let mesh = revolution(&[triangle_profile()], 1.0, 90.0, true, false)
            .expect("valid step")
            .value;
        assert_eq!(mesh.triangle_count(), 4 * 2 * 2);
    }

    #[test]
    fn test_faceted_seam_reuses_first_ring() {
        let mesh = revolution(&[triangle_profile()], 1.0, 90.0, false, true)
            .expect("valid step")
            .value;
        assert_eq!(mesh.vertex_count(), 4 * 3 * 4);
        let pts: Vec<Point3d> = mesh.vertices().iter().map(|v| v.position).collect();
        // the closing quads end exactly on the angle-0 ring
        let ring0: Vec<Point3d> = triangle_profile()
            .oriented(Winding::Clockwise)
            .iter()
            .map(|p| place(*p, 1.0, 0.0))
            .collect();
        for r in &ring0 {
            assert!(pts.iter().filter(|p| *p == r).count() >= 2);
        }
    }

    #[test]
    fn test_faceted_normals_point_away_from_profile() {
        let mesh = revolution(&[triangle_profile()], 2.0, 30.0, false, true)
            .expect("valid step")
            .value;
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle_positions(t);
            let geometric = (b - a).cross(&(c - a));
            let shading = mesh.vertices()[mesh.indices()[t * 3] as usize].normal;
            assert!(geometric.dot(&shading) > 0.0);
            assert_abs_diff_eq!(shading.length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_profile_is_reported() {
        let sliver = Polygon::from_pairs(&[(0.0, 0.0), (1.0, 0.0)]);
        let outcome = revolution(&[sliver, triangle_profile()], 1.0, 90.0, true, true)
            .expect("valid step");
        assert_eq!(outcome.defects.len(), 1);
        assert_eq!(outcome.value.vertex_count(), 12);
    }
}
