//! Solids composed from the sweep primitives.
//!
//! Every recipe builds a slab centred on z = 0. The call order and the exact
//! arithmetic of each stage's end heights matter: a bevel's last ring and
//! the following wall's first ring must land on identical coordinates so
//! every edge ends up shared by exactly two triangles.

use glyph_kernel::{Defect, Outcome, Polygon, Winding, drill_detailed, grow, record};
use tracing::{debug, instrument};

use crate::cap::fill_face;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::settings::{BevelSettings, Facing, Side};
use crate::sweep::{BevelStage, bevel, cylinder, fill_edge};

/// Side wall of a slab around `contour`: rounded top edge, straight wall,
/// rounded bottom edge. Outward walls bulge `radius` past the contour,
/// inward walls shrink into it.
pub fn extrude_wall(
    mesh: &mut Mesh,
    contour: &Polygon,
    settings: &BevelSettings,
    facing: Facing,
    defects: &mut Vec<Defect>,
) {
    let contour = contour.oriented(Winding::Clockwise);
    let half = settings.height * 0.5;
    if settings.radius > 0.0 {
        for (z, side) in [(half, Side::Top), (-half, Side::Bottom)] {
            let stage = BevelStage {
                z,
                radius: settings.radius,
                slices: settings.slices,
                side,
                facing,
            };
            bevel(mesh, &contour, &stage, settings.smoothing, defects);
        }
    }
    let wall = grow(&contour, facing.sign() * settings.radius);
    cylinder(
        mesh,
        &wall,
        settings.height - 2.0 * settings.radius,
        facing,
        settings.smoothing,
        defects,
    );
}

/// Rounded solid extrusion of `polygon`. Without `cap` only the side wall
/// is built.
#[instrument(skip(polygon), fields(points = polygon.len()))]
pub fn bevel_extrude(
    polygon: &Polygon,
    settings: &BevelSettings,
    cap: bool,
) -> Result<Outcome<Mesh>, MeshError> {
    settings.validate()?;
    let mut mesh = Mesh::new();
    let mut defects = Vec::new();
    if !usable_outer(polygon, &mut defects) {
        return Ok(Outcome::with_defects(mesh, defects));
    }

    let contour = polygon.oriented(Winding::Clockwise);
    if cap {
        add_caps(&mut mesh, &contour, settings, &mut defects);
    }
    extrude_wall(&mut mesh, &contour, settings, Facing::Outward, &mut defects);
    Ok(Outcome::with_defects(mesh, defects))
}

/// Rounded solid extrusion of a polygon with holes.
///
/// The caps are the drilled contour; every hole that made it into the caps
/// gets its own inward wall. Dropped holes are reported and leave no trace
/// in the mesh.
#[instrument(skip(outer, holes), fields(points = outer.len(), holes = holes.len()))]
pub fn bevel_extrude_with_holes(
    outer: &Polygon,
    holes: &[Polygon],
    settings: &BevelSettings,
) -> Result<Outcome<Mesh>, MeshError> {
    settings.validate()?;
    let mut mesh = Mesh::new();
    let mut defects = Vec::new();
    if !usable_outer(outer, &mut defects) {
        return Ok(Outcome::with_defects(mesh, defects));
    }

    let outer = outer.oriented(Winding::Clockwise);
    let holes: Vec<Polygon> = holes
        .iter()
        .map(|h| h.oriented(Winding::Clockwise))
        .collect();
    let drilled = drill_detailed(&outer, &holes).collect_into(&mut defects);
    debug!(
        bridged = drilled.bridged.len(),
        contour = drilled.contour.len(),
        "drilled cap contour"
    );

    add_caps(&mut mesh, &drilled.contour, settings, &mut defects);
    extrude_wall(&mut mesh, &outer, settings, Facing::Outward, &mut defects);
    for &h in &drilled.bridged {
        extrude_wall(&mut mesh, &holes[h], settings, Facing::Inward, &mut defects);
    }
    Ok(Outcome::with_defects(mesh, defects))
}

/// Rounded frame of `width` around the outside of `polygon`: flat rims on
/// both faces, an outward wall along the grown contour and an inward wall
/// along `polygon` itself.
#[instrument(skip(polygon), fields(points = polygon.len()))]
pub fn bevel_edge(
    polygon: &Polygon,
    width: f64,
    settings: &BevelSettings,
) -> Result<Outcome<Mesh>, MeshError> {
    settings.validate()?;
    if !(width.is_finite() && width > 0.0) {
        return Err(MeshError::InvalidDimension {
            name: "width",
            value: width,
        });
    }
    let mut mesh = Mesh::new();
    let mut defects = Vec::new();
    if !usable_outer(polygon, &mut defects) {
        return Ok(Outcome::with_defects(mesh, defects));
    }

    let inner = polygon.oriented(Winding::Clockwise);
    let outer = grow(&inner, width);
    let half = settings.height * 0.5;
    fill_edge(&mut mesh, &inner, width, half, Side::Top, &mut defects);
    fill_edge(&mut mesh, &inner, width, -half, Side::Bottom, &mut defects);
    extrude_wall(&mut mesh, &outer, settings, Facing::Outward, &mut defects);
    extrude_wall(&mut mesh, &inner, settings, Facing::Inward, &mut defects);
    Ok(Outcome::with_defects(mesh, defects))
}

fn add_caps(mesh: &mut Mesh, contour: &Polygon, settings: &BevelSettings, defects: &mut Vec<Defect>) {
    let half = settings.height * 0.5;
    fill_face(mesh, contour, half, Side::Top, defects);
    fill_face(mesh, contour, -half, Side::Bottom, defects);
}

fn usable_outer(polygon: &Polygon, defects: &mut Vec<Defect>) -> bool {
    if polygon.is_usable() {
        return true;
    }
    record(
        defects,
        Defect::degenerate(format!(
            "outer contour has {} points, nothing extruded",
            polygon.len()
        )),
    );
    false
}
