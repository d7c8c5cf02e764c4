//! Vertex deduplication.
//!
//! Vertices are bucketed in a spatial hash whose cell size equals the
//! position tolerance, so any two vertices within tolerance sit in the same
//! or a neighbouring cell. Each vertex is compared against the survivors in
//! the 27 surrounding cells and merged with the first match.

use std::collections::HashMap;

use glyph_kernel::{Point3d, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::mesh::{Mesh, Vertex};

/// Per-axis absolute tolerances for merging two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeldTolerance {
    pub position: f64,
    pub normal: f64,
}

impl Default for WeldTolerance {
    fn default() -> Self {
        Self {
            position: 1e-4,
            normal: 1e-6,
        }
    }
}

type Cell = [i64; 3];

/// Grid of survivor indices keyed by quantized position.
pub(crate) struct SpatialHash {
    cell_size: f64,
    cells: HashMap<Cell, Vec<u32>>,
}

impl SpatialHash {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(f64::MIN_POSITIVE),
            cells: HashMap::new(),
        }
    }

    fn cell(&self, p: &Point3d) -> Cell {
        [
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        ]
    }

    /// Lowest stored index near `p` accepted by `matches`.
    pub(crate) fn find(&self, p: &Point3d, mut matches: impl FnMut(u32) -> bool) -> Option<u32> {
        let [cx, cy, cz] = self.cell(p);
        let mut best: Option<u32> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&[cx + dx, cy + dy, cz + dz]) else {
                        continue;
                    };
                    if let Some(&hit) = bucket.iter().find(|&&i| matches(i)) {
                        best = Some(best.map_or(hit, |b| b.min(hit)));
                    }
                }
            }
        }
        best
    }

    pub(crate) fn insert(&mut self, p: &Point3d, index: u32) {
        let cell = self.cell(p);
        self.cells.entry(cell).or_default().push(index);
    }
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

fn positions_close(a: &Point3d, b: &Point3d, tol: f64) -> bool {
    close(a.x, b.x, tol) && close(a.y, b.y, tol) && close(a.z, b.z, tol)
}

fn normals_close(a: &Vec3, b: &Vec3, tol: f64) -> bool {
    close(a.x, b.x, tol) && close(a.y, b.y, tol) && close(a.z, b.z, tol)
}

/// Merge duplicate vertices with the default tolerances.
pub fn optimize(mesh: &Mesh) -> Mesh {
    optimize_with(mesh, WeldTolerance::default())
}

/// Merge vertices whose position and normal both agree within `tol`.
///
/// Survivors keep their first-seen order and every triangle is kept, so the
/// result re-expands to the same triangle positions within tolerance.
#[instrument(skip(mesh), fields(vertices = mesh.vertex_count()))]
pub fn optimize_with(mesh: &Mesh, tol: WeldTolerance) -> Mesh {
    let mut hash = SpatialHash::new(tol.position);
    let mut kept: Vec<Vertex> = Vec::with_capacity(mesh.vertex_count());
    let remap: Vec<u32> = mesh
        .vertices()
        .iter()
        .map(|v| {
            let hit = hash.find(&v.position, |i| {
                let other = &kept[i as usize];
                positions_close(&other.position, &v.position, tol.position)
                    && normals_close(&other.normal, &v.normal, tol.normal)
            });
            hit.unwrap_or_else(|| {
                let idx = kept.len() as u32;
                kept.push(*v);
                hash.insert(&v.position, idx);
                idx
            })
        })
        .collect();

    let removed = mesh.vertex_count() - kept.len();
    info!(
        before = mesh.vertex_count(),
        after = kept.len(),
        removed,
        "deduplicated mesh vertices"
    );
    let mut out = Mesh::new();
    for v in &kept {
        out.add_vertex(v.position, v.normal);
    }
    for [a, b, c] in mesh.triangles() {
        out.add_triangle(remap[a as usize], remap[b as usize], remap[c as usize]);
    }
    out
}

/// Canonical index per vertex after merging positions within `tol`,
/// ignoring normals. Equal entries mark the same welded point.
pub fn weld_positions(mesh: &Mesh, tol: f64) -> Vec<u32> {
    let mut hash = SpatialHash::new(tol);
    let vertices = mesh.vertices();
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            hash.find(&v.position, |k| {
                positions_close(&vertices[k as usize].position, &v.position, tol)
            })
            .unwrap_or_else(|| {
                hash.insert(&v.position, i as u32);
                i as u32
            })
        })
        .collect()
}
