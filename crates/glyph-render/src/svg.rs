//! Flat-shaded SVG previews of text meshes.

use glyph_kernel::Vec3;
use glyph_mesh::Mesh;

/// Isometric-ish projection. Text lies in the xy plane, so the glyph's y
/// axis is treated as "up" and its extrusion depth as the view axis.
fn project(x: f64, y: f64, z: f64) -> (f64, f64) {
    let yaw: f64 = 0.35;
    let pitch: f64 = 0.45;
    let (depth, up) = (-z, y);
    let rx = x * yaw.cos() - depth * yaw.sin();
    let rd = x * yaw.sin() + depth * yaw.cos();
    let pz = rd * pitch.sin() + up * pitch.cos();
    (rx, -pz)
}

struct TriInfo {
    corners: [usize; 3],
    depth: f64,
    brightness: f64,
    is_backface: bool,
}

pub fn mesh_to_svg(mesh: &Mesh, width: f64, height: f64, title: &str) -> String {
    if mesh.is_empty() {
        return format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
             <text x=\"10\" y=\"20\" font-family=\"monospace\" font-size=\"14\" fill=\"#ccc\">{title}</text>\
             </svg>\n"
        );
    }

    let projected: Vec<(f64, f64)> = mesh
        .vertices()
        .iter()
        .map(|v| project(v.position.x, v.position.y, v.position.z))
        .collect();
    let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
    let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
    for &(px, py) in &projected {
        min_x = min_x.min(px);
        max_x = max_x.max(px);
        min_y = min_y.min(py);
        max_y = max_y.max(py);
    }

    let padding = 40.0;
    let avail_w = width - 2.0 * padding;
    let avail_h = height - 2.0 * padding - 25.0;
    let data_w = (max_x - min_x).max(0.001);
    let data_h = (max_y - min_y).max(0.001);
    let scale = (avail_w / data_w).min(avail_h / data_h);
    let offset_x = padding + (avail_w - data_w * scale) / 2.0;
    let offset_y = padding + 25.0 + (avail_h - data_h * scale) / 2.0;
    let to_screen = |(px, py): (f64, f64)| {
        ((px - min_x) * scale + offset_x, (py - min_y) * scale + offset_y)
    };

    let light = Vec3::new(0.3, 0.5, 0.8).normalized_or(Vec3::new(0.0, 0.0, 1.0));
    let mut tris: Vec<TriInfo> = Vec::with_capacity(mesh.triangle_count());
    for (t, corners) in mesh.triangles().enumerate() {
        let [a, b, c] = mesh.triangle_positions(t);
        let normal = (b - a).cross(&(c - a));
        let len = normal.length().max(1e-12);
        let brightness = 0.3 + 0.7 * (normal.dot(&light) / len).abs().min(1.0);

        let corners = corners.map(|i| i as usize);
        let [p0, p1, p2] = corners.map(|i| projected.get(i).copied().unwrap_or((0.0, 0.0)));
        // Screen space is y-down, so front faces come out clockwise.
        let signed_area = (p1.0 - p0.0) * (p2.1 - p0.1) - (p2.0 - p0.0) * (p1.1 - p0.1);

        tris.push(TriInfo {
            corners,
            depth: (a.z + b.z + c.z) / 3.0,
            brightness,
            is_backface: signed_area > 0.0,
        });
    }
    // Painter's order: the front face sits at the most positive z.
    tris.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let num_tris = tris.len();
    let stroke_width = if num_tris > 200 { 0.2 } else { 0.5 };
    let stroke_color = if num_tris > 200 { "#222240" } else { "#2a2a4a" };

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" style=\"background:#1a1a2e\">\n\
         <text x=\"{}\" y=\"20\" font-family=\"monospace\" font-size=\"13\" fill=\"#8892b0\" text-anchor=\"middle\">{title}</text>\n",
        width / 2.0
    );
    for tri in tris.iter().filter(|t| !t.is_backface) {
        let [(x0, y0), (x1, y1), (x2, y2)] = tri.corners.map(|i| to_screen(projected[i]));
        let b = tri.brightness;
        let (r, g, bl) = ((100.0 * b) as u8, (160.0 * b) as u8, (220.0 * b) as u8);
        svg.push_str(&format!(
            "  <polygon points=\"{x0:.1},{y0:.1} {x1:.1},{y1:.1} {x2:.1},{y2:.1}\" \
             fill=\"rgb({r},{g},{bl})\" stroke=\"{stroke_color}\" stroke-width=\"{stroke_width}\"/>\n"
        ));
    }
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"10\" fill=\"#5a6080\" \
         text-anchor=\"middle\">{} triangles, {} vertices</text>\n",
        width / 2.0,
        height - 8.0,
        num_tris,
        mesh.vertex_count()
    ));
    svg.push_str("</svg>\n");
    svg
}
