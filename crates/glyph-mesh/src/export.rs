//! STL and OBJ export.

use std::fmt::Write as _;

use glyph_kernel::Vec3;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Unit facet normal of triangle `t` from its winding, +z for slivers.
fn facet_normal(mesh: &Mesh, t: usize) -> Vec3 {
    let [a, b, c] = mesh.triangle_positions(t);
    (b - a).cross(&(c - a)).normalized().unwrap_or(Vec3::Z)
}

fn ensure_triangles(mesh: &Mesh) -> Result<(), MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok(())
}

/// Export a mesh as a binary STL file.
///
/// Binary STL format:
/// - 80-byte header (arbitrary text)
/// - u32 triangle count (little-endian)
/// - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
pub fn export_binary_stl(mesh: &Mesh, name: &str) -> Result<Vec<u8>, MeshError> {
    ensure_triangles(mesh)?;
    let tri_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(80 + 4 + tri_count * 50);

    let header = format!("binary STL: {name}");
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(80)]);
    buf.resize(80, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for t in 0..tri_count {
        let n = facet_normal(mesh, t);
        for value in [n.x, n.y, n.z] {
            buf.extend_from_slice(&(value as f32).to_le_bytes());
        }
        for p in mesh.triangle_positions(t) {
            for value in [p.x, p.y, p.z] {
                buf.extend_from_slice(&(value as f32).to_le_bytes());
            }
        }
        // attribute byte count, unused
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Export a mesh as an ASCII STL string.
pub fn export_ascii_stl(mesh: &Mesh, name: &str) -> Result<String, MeshError> {
    ensure_triangles(mesh)?;
    let mut out = String::with_capacity(mesh.triangle_count() * 300);
    let _ = writeln!(out, "solid {name}");

    for t in 0..mesh.triangle_count() {
        let n = facet_normal(mesh, t);
        let _ = writeln!(out, "  facet normal {} {} {}", n.x as f32, n.y as f32, n.z as f32);
        out.push_str("    outer loop\n");
        for p in mesh.triangle_positions(t) {
            let _ = writeln!(
                out,
                "      vertex {} {} {}",
                p.x as f32, p.y as f32, p.z as f32
            );
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    let _ = writeln!(out, "endsolid {name}");
    Ok(out)
}

/// Export a mesh as Wavefront OBJ with per-vertex normals.
pub fn export_obj(mesh: &Mesh, name: &str) -> Result<String, MeshError> {
    ensure_triangles(mesh)?;
    let mut out = String::with_capacity(mesh.vertex_count() * 64 + mesh.triangle_count() * 32);
    let _ = writeln!(out, "o {name}");
    for v in mesh.vertices() {
        let p = v.position;
        let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
    }
    for v in mesh.vertices() {
        let n = v.normal;
        let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
    }
    // OBJ indices are 1-based
    for [a, b, c] in mesh.triangles() {
        let _ = writeln!(out, "f {0}//{0} {1}//{1} {2}//{2}", a + 1, b + 1, c + 1);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_kernel::Point3d;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3d::new(0.0, 0.0, 0.0), Vec3::Z);
        let b = mesh.add_vertex(Point3d::new(1.0, 0.0, 0.0), Vec3::Z);
        let c = mesh.add_vertex(Point3d::new(0.0, 1.0, 0.0), Vec3::Z);
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn test_binary_stl_layout() {
        let bytes = export_binary_stl(&triangle(), "tri").expect("non-empty mesh");
        assert_eq!(bytes.len(), 80 + 4 + 50);
        assert!(bytes.starts_with(b"binary STL: tri"));
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn test_long_name_is_truncated() {
        let name = "x".repeat(200);
        let bytes = export_binary_stl(&triangle(), &name).expect("non-empty mesh");
        assert_eq!(bytes.len(), 134);
    }

    #[test]
    fn test_ascii_stl() {
        let text = export_ascii_stl(&triangle(), "tri").expect("non-empty mesh");
        assert!(text.starts_with("solid tri\n"));
        assert!(text.contains("facet normal 0 0 1"));
        assert_eq!(text.matches("vertex ").count(), 3);
        assert!(text.ends_with("endsolid tri\n"));
    }

    #[test]
    fn test_obj_is_one_based() {
        let text = export_obj(&triangle(), "tri").expect("non-empty mesh");
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 3);
        assert!(text.contains("f 1//1 2//2 3//3"));
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        assert_eq!(export_binary_stl(&Mesh::new(), "e"), Err(MeshError::EmptyMesh));
        assert_eq!(export_obj(&Mesh::new(), "e"), Err(MeshError::EmptyMesh));
    }
}
