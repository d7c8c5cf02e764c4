use std::ops::AddAssign;

use glyph_kernel::{Point3d, Vec3};
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// A mesh corner: position plus shading normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3d,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Point3d, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// An indexed triangle mesh.
///
/// `indices` always holds whole triangles and every index refers to an
/// existing vertex. Triangles are counter-clockwise seen from the side the
/// surface faces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from raw parts, checking the index invariants.
    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle { len: indices.len() });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn add_vertex(&mut self, position: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(position, normal));
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        debug_assert!(
            [i0, i1, i2]
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
        );
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Index triples, one per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Corner positions of triangle `t`.
    pub fn triangle_positions(&self, t: usize) -> [Point3d; 3] {
        let tri = &self.indices[t * 3..t * 3 + 3];
        [
            self.vertices[tri[0] as usize].position,
            self.vertices[tri[1] as usize].position,
            self.vertices[tri[2] as usize].position,
        ]
    }

    /// Append `other`, offsetting its indices past this mesh's vertices.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn shift(&mut self, by: Vec3) -> &mut Self {
        for v in &mut self.vertices {
            v.position = v.position + by;
        }
        self
    }

    pub fn shifted(&self, by: Vec3) -> Mesh {
        let mut out = self.clone();
        out.shift(by);
        out
    }

    pub fn scale(&mut self, factor: f64) -> &mut Self {
        for v in &mut self.vertices {
            v.position = Point3d::new(
                v.position.x * factor,
                v.position.y * factor,
                v.position.z * factor,
            );
        }
        self
    }

    /// Turn the mesh inside out: reverse winding and negate normals.
    pub fn flip(&mut self) -> &mut Self {
        self.indices.reverse();
        for v in &mut self.vertices {
            v.normal = -v.normal;
        }
        self
    }

    /// Rotate about `axis` through the origin. A zero axis leaves the mesh
    /// untouched.
    pub fn rotate(&mut self, angle_deg: f64, axis: Vec3) -> &mut Self {
        let Some(axis) = Unit::try_new(Vector3::new(axis.x, axis.y, axis.z), 1e-12) else {
            return self;
        };
        let rotation = Rotation3::from_axis_angle(&axis, angle_deg.to_radians());
        self.transform(&rotation.to_homogeneous())
    }

    /// Apply an affine transform. Normals go through the inverse transpose of
    /// the linear part and are renormalized.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) -> &mut Self {
        let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear.try_inverse().map_or(linear, |inv| inv.transpose());
        for v in &mut self.vertices {
            let p = matrix.transform_point(&Point3::new(
                v.position.x,
                v.position.y,
                v.position.z,
            ));
            v.position = Point3d::new(p.x, p.y, p.z);
            let n = normal_matrix * Vector3::new(v.normal.x, v.normal.y, v.normal.z);
            v.normal = Vec3::new(n.x, n.y, n.z).normalized_or(v.normal);
        }
        self
    }

    /// Interleaved-free `f32` buffers for upload: positions, normals, indices.
    pub fn to_f32_buffers(&self) -> (Vec<f32>, Vec<f32>, Vec<u32>) {
        let mut positions = Vec::with_capacity(self.vertices.len() * 3);
        let mut normals = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            positions.extend_from_slice(&[
                v.position.x as f32,
                v.position.y as f32,
                v.position.z as f32,
            ]);
            normals.extend_from_slice(&[v.normal.x as f32, v.normal.y as f32, v.normal.z as f32]);
        }
        (positions, normals, self.indices.clone())
    }
}

impl AddAssign<&Mesh> for Mesh {
    fn add_assign(&mut self, rhs: &Mesh) {
        self.merge(rhs);
    }
}
