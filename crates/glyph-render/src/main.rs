//! Lay out a string with a vector font and write it as a printable mesh.
//!
//! ```text
//! render_text <font.json> <text> [--config config.json] [--out text.stl] [--svg preview.svg]
//! ```
//!
//! The output format follows the `--out` extension: `.obj` writes Wavefront
//! OBJ, `.txt`/`.ascii` writes ASCII STL, anything else binary STL.

mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use glyph_font::{FontConfig, FontSource, VectorFont};
use glyph_kernel::Defect;
use glyph_mesh::{Mesh, export_ascii_stl, export_binary_stl, export_obj, validate_mesh};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    font: PathBuf,
    text: String,
    config: Option<PathBuf>,
    out: PathBuf,
    svg: Option<PathBuf>,
}

fn usage() -> &'static str {
    "usage: render_text <font.json> <text> [--config path] [--out path] [--svg path]"
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut out = None;
    let mut svg = None;
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--config" => &mut config,
            "--out" => &mut out,
            "--svg" => &mut svg,
            "-h" | "--help" => bail!(usage()),
            _ => {
                positional.push(arg);
                continue;
            }
        };
        let value = args
            .next()
            .with_context(|| format!("{arg} needs a value\n{}", usage()))?;
        *slot = Some(PathBuf::from(value));
    }

    let mut positional = positional.into_iter();
    let (Some(font), Some(text), None) = (positional.next(), positional.next(), positional.next())
    else {
        bail!(usage());
    };
    Ok(Args {
        font: PathBuf::from(font),
        // shells make a literal newline awkward to type
        text: text.replace("\\n", "\n"),
        config,
        out: out.unwrap_or_else(|| PathBuf::from("text.stl")),
        svg,
    })
}

fn init_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Print mesh quality info.
fn validate_and_report(name: &str, mesh: &Mesh) {
    let val = validate_mesh(mesh);
    let watertight = if val.is_watertight() { "watertight" } else { "open" };
    let printable = if val.is_printable() { "printable" } else { "not printable" };
    println!(
        "  {name}: {tris} tris, {verts} verts, {watertight}, {printable}, vol={vol:.3}",
        tris = mesh.triangle_count(),
        verts = mesh.vertex_count(),
        vol = val.signed_volume,
    );
    if val.boundary_edges > 0 || val.non_manifold_edges > 0 || val.inconsistent_edges > 0 {
        println!(
            "    boundary_edges={}, non_manifold={}, inconsistent={}",
            val.boundary_edges, val.non_manifold_edges, val.inconsistent_edges
        );
    }
    if val.degenerate_triangles > 0 || val.non_unit_normals > 0 {
        println!(
            "    degenerate={}, bad_normals={}",
            val.degenerate_triangles, val.non_unit_normals
        );
    }
}

fn report_defects(stage: &str, defects: &[Defect]) {
    if defects.is_empty() {
        return;
    }
    warn!(stage, count = defects.len(), "defects reported");
    for defect in defects {
        println!("  {stage}: {defect}");
    }
}

fn write_mesh(path: &Path, mesh: &Mesh, name: &str) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let written = match extension.as_deref() {
        Some("obj") => fs::write(path, export_obj(mesh, name)?),
        Some("txt" | "ascii") => fs::write(path, export_ascii_stl(mesh, name)?),
        _ => fs::write(path, export_binary_stl(mesh, name)?),
    };
    written.with_context(|| format!("writing {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => FontConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FontConfig::default(),
    };
    let source = FontSource::from_path(&args.font)
        .with_context(|| format!("loading font {}", args.font.display()))?;

    let (font, defects) = VectorFont::build(&source, &config)?.into_parts();
    report_defects("font", &defects);

    let (mesh, defects) = font.gen_text(&args.text).into_parts();
    report_defects("layout", &defects);
    if mesh.is_empty() {
        bail!("nothing to write: no glyph of {:?} is in the font", args.text);
    }

    println!("=== {} ===", args.out.display());
    validate_and_report("text", &mesh);
    write_mesh(&args.out, &mesh, "text")?;
    info!(
        path = %args.out.display(),
        triangles = mesh.triangle_count(),
        "mesh written"
    );

    if let Some(path) = &args.svg {
        let title = args.text.replace('\n', " / ");
        fs::write(path, svg::mesh_to_svg(&mesh, 800.0, 400.0, &title))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "preview written");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = parse_args(std::env::args().skip(1))?;
    run(args)
}
