//! Mesh checks used as test oracles and by the render tool's report.
//!
//! Edges are matched by welded position, not by index, so meshes with
//! per-face vertices (every sweep emits its own quad corners) are judged on
//! their shape.

use std::collections::HashMap;

use serde::Serialize;

use crate::mesh::Mesh;
use crate::optimize::weld_positions;

/// Positions closer than this count as the same point.
pub const WELD_EPSILON: f64 = 1e-6;

const AREA_EPSILON: f64 = 1e-12;
const NORMAL_LENGTH_TOLERANCE: f64 = 0.01;

/// Counts gathered by [`validate_mesh`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshValidation {
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Edges used by a single triangle.
    pub boundary_edges: usize,
    /// Edges used by more than two triangles.
    pub non_manifold_edges: usize,
    /// Two-triangle edges traversed in the same direction by both.
    pub inconsistent_edges: usize,
    pub degenerate_triangles: usize,
    pub non_unit_normals: usize,
    pub out_of_range_indices: usize,
    /// Positive for a closed mesh whose triangles face outward.
    pub signed_volume: f64,
}

impl MeshValidation {
    /// Every edge is shared by exactly two triangles.
    pub fn is_watertight(&self) -> bool {
        self.triangle_count > 0 && self.boundary_edges == 0 && self.non_manifold_edges == 0
    }

    /// Watertight with consistent winding across every edge.
    pub fn is_closed_manifold(&self) -> bool {
        self.is_watertight() && self.inconsistent_edges == 0 && self.out_of_range_indices == 0
    }

    /// Closed, outward facing and free of slivers and broken normals.
    pub fn is_printable(&self) -> bool {
        self.is_closed_manifold()
            && self.degenerate_triangles == 0
            && self.non_unit_normals == 0
            && self.signed_volume > 0.0
    }
}

/// Run every check over `mesh`.
pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let vertices = mesh.vertices();
    let mut report = MeshValidation {
        vertex_count: vertices.len(),
        triangle_count: mesh.triangle_count(),
        ..Default::default()
    };

    report.non_unit_normals = vertices
        .iter()
        .filter(|v| (v.normal.length() - 1.0).abs() > NORMAL_LENGTH_TOLERANCE)
        .count();

    let welded = weld_positions(mesh, WELD_EPSILON);
    // (low, high) -> (uses, uses running low -> high)
    let mut edges: HashMap<(u32, u32), (usize, usize)> = HashMap::new();

    for tri in mesh.triangles() {
        if tri.iter().any(|&i| i as usize >= vertices.len()) {
            report.out_of_range_indices += 1;
            continue;
        }
        let [a, b, c] = tri.map(|i| vertices[i as usize].position);
        let cross = (b - a).cross(&(c - a));
        if cross.length() * 0.5 < AREA_EPSILON {
            report.degenerate_triangles += 1;
        }
        report.signed_volume += a.to_vec3().dot(&b.to_vec3().cross(&c.to_vec3())) / 6.0;

        let w = tri.map(|i| welded[i as usize]);
        for (from, to) in [(w[0], w[1]), (w[1], w[2]), (w[2], w[0])] {
            if from == to {
                continue;
            }
            let entry = edges.entry((from.min(to), from.max(to))).or_insert((0, 0));
            entry.0 += 1;
            if from < to {
                entry.1 += 1;
            }
        }
    }

    for &(uses, forward) in edges.values() {
        match uses {
            1 => report.boundary_edges += 1,
            2 if forward != 1 => report.inconsistent_edges += 1,
            2 => {}
            _ => report.non_manifold_edges += 1,
        }
    }
    report
}
