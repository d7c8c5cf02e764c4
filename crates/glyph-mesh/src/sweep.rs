//! Wall primitives swept along a contour: rounded bevels, straight walls and
//! flat rims.
//!
//! Every primitive winds its contour clockwise first, so the tangent normals
//! point away from the enclosed region and a positive offset grows it. Each
//! quad gets its own four vertices; corners that should look smooth end up
//! with bit-identical normals and are merged by [`crate::optimize`].

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use glyph_kernel::{
    Defect, Point2d, Point3d, Polygon, Tangent, Vec3, Winding, generate_tangents, grow, grow_with,
    record,
};

use crate::mesh::{Mesh, Vertex};
use crate::settings::{Facing, Side, Smoothing};

/// Placement of one quarter-circle bevel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelStage {
    /// Height of the flat face the bevel starts from.
    pub z: f64,
    pub radius: f64,
    pub slices: usize,
    /// Top bevels descend from `z`, bottom bevels ascend.
    pub side: Side,
    /// Outward bevels grow the contour, inward bevels shrink it.
    pub facing: Facing,
}

/// Sweep a quarter-circle profile from `polygon` at `stage.z` to the contour
/// offset by `stage.radius`, one `stage.radius` closer to the slab's middle.
///
/// With one slice the bevel is a flat chamfer with a single normal per
/// corner. Zero slices or a zero radius emit nothing.
pub fn bevel(
    mesh: &mut Mesh,
    polygon: &Polygon,
    stage: &BevelStage,
    smoothing: Smoothing,
    defects: &mut Vec<Defect>,
) {
    if !usable(polygon, "bevel", defects) || stage.slices == 0 || stage.radius == 0.0 {
        return;
    }
    let contour = polygon.oriented(Winding::Clockwise);
    let tangents = generate_tangents(&contour);
    let grow_sign = stage.facing.sign();

    let rings: Vec<Ring> = (0..=stage.slices)
        .map(|s| {
            let (out, drop) = quarter_profile(s, stage.slices);
            let points = if s == 0 {
                contour.clone()
            } else {
                grow_with(&contour, &tangents, grow_sign * stage.radius * out)
            };
            Ring {
                points,
                z: stage.z - stage.side.sign() * stage.radius * drop,
                theta: normal_theta(s, stage.slices),
            }
        })
        .collect();

    let reversed = (stage.side == Side::Bottom) != (stage.facing == Facing::Inward);
    let normal = |angle: f64, theta: f64| {
        wall_normal(angle) * (grow_sign * theta.sin()) + Vec3::Z * (stage.side.sign() * theta.cos())
    };
    for pair in rings.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for_each_edge(&tangents, smoothing, |i, j, lead, trail| {
            emit_quad(
                mesh,
                [
                    Vertex::new(upper.at(i), normal(lead, upper.theta)),
                    Vertex::new(upper.at(j), normal(trail, upper.theta)),
                    Vertex::new(lower.at(j), normal(trail, lower.theta)),
                    Vertex::new(lower.at(i), normal(lead, lower.theta)),
                ],
                reversed,
            );
        });
    }
}

/// Straight wall between two copies of `polygon` at `±depth/2`.
/// A non-positive depth emits nothing.
pub fn cylinder(
    mesh: &mut Mesh,
    polygon: &Polygon,
    depth: f64,
    facing: Facing,
    smoothing: Smoothing,
    defects: &mut Vec<Defect>,
) {
    if !usable(polygon, "wall", defects) || depth <= 0.0 {
        return;
    }
    let contour = polygon.oriented(Winding::Clockwise);
    let tangents = generate_tangents(&contour);
    let (top, bottom) = (depth * 0.5, -depth * 0.5);
    let points = contour.points();

    for_each_edge(&tangents, smoothing, |i, j, lead, trail| {
        let n_lead = wall_normal(lead) * facing.sign();
        let n_trail = wall_normal(trail) * facing.sign();
        emit_quad(
            mesh,
            [
                Vertex::new(points[i].with_z(top), n_lead),
                Vertex::new(points[j].with_z(top), n_trail),
                Vertex::new(points[j].with_z(bottom), n_trail),
                Vertex::new(points[i].with_z(bottom), n_lead),
            ],
            facing == Facing::Inward,
        );
    });
}

/// Flat band at height `z` between `polygon` and its offset by `width`.
pub fn fill_edge(
    mesh: &mut Mesh,
    polygon: &Polygon,
    width: f64,
    z: f64,
    side: Side,
    defects: &mut Vec<Defect>,
) {
    if !usable(polygon, "rim", defects) || width == 0.0 {
        return;
    }
    let inner = polygon.oriented(Winding::Clockwise);
    let outer = grow(&inner, width);
    let normal = Vec3::Z * side.sign();
    let n = inner.len();
    let reversed = (side == Side::Bottom) != (width < 0.0);

    for i in 0..n {
        let j = (i + 1) % n;
        emit_quad(
            mesh,
            [
                Vertex::new(inner.vertex(i).with_z(z), normal),
                Vertex::new(inner.vertex(j).with_z(z), normal),
                Vertex::new(outer.vertex(j).with_z(z), normal),
                Vertex::new(outer.vertex(i).with_z(z), normal),
            ],
            reversed,
        );
    }
}

struct Ring {
    points: Polygon,
    z: f64,
    /// Profile angle of the normal: 0 faces along z, π/2 faces sideways.
    theta: f64,
}

impl Ring {
    fn at(&self, i: usize) -> Point3d {
        self.points.vertex(i).with_z(self.z)
    }
}

/// `(outward, drop)` fractions of the radius at slice `s`. The end points are
/// exact so consecutive stages meet without gaps.
fn quarter_profile(s: usize, slices: usize) -> (f64, f64) {
    if s == 0 {
        return (0.0, 0.0);
    }
    if s >= slices {
        return (1.0, 1.0);
    }
    let theta = FRAC_PI_2 * s as f64 / slices as f64;
    (theta.sin(), 1.0 - theta.cos())
}

fn normal_theta(s: usize, slices: usize) -> f64 {
    if slices == 1 {
        FRAC_PI_4
    } else {
        FRAC_PI_2 * s as f64 / slices as f64
    }
}

fn wall_normal(angle: f64) -> Vec3 {
    let d = Point2d::from_compass(angle);
    Vec3::new(d.x, d.y, 0.0)
}

/// Visit every contour edge `i -> j` with the normal angles of its two ends.
fn for_each_edge(
    tangents: &[Tangent],
    smoothing: Smoothing,
    mut visit: impl FnMut(usize, usize, f64, f64),
) {
    let n = tangents.len();
    for i in 0..n {
        let j = (i + 1) % n;
        visit(
            i,
            j,
            smoothing.leading_angle(&tangents[i]),
            smoothing.trailing_angle(&tangents[j]),
        );
    }
}

/// Two triangles over corners `[a_i, a_j, b_j, b_i]`, counter-clockwise
/// unless `reversed`.
fn emit_quad(mesh: &mut Mesh, corners: [Vertex; 4], reversed: bool) {
    let [a0, a1, b1, b0] = corners.map(|v| mesh.add_vertex(v.position, v.normal));
    if reversed {
        mesh.add_triangle(b1, a1, a0);
        mesh.add_triangle(a0, b0, b1);
    } else {
        mesh.add_triangle(a0, a1, b1);
        mesh.add_triangle(b1, b0, a0);
    }
}

fn usable(polygon: &Polygon, what: &str, defects: &mut Vec<Defect>) -> bool {
    if polygon.is_usable() {
        return true;
    }
    record(
        defects,
        Defect::degenerate(format!("{what} contour has {} points, skipped", polygon.len())),
    );
    false
}
