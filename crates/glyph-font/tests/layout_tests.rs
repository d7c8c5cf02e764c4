use approx::assert_abs_diff_eq;

use glyph_font::{FontConfig, FontSource, VectorFont, calc_pos};
use glyph_kernel::{Winding, grow};
use glyph_mesh::validate_mesh;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
    vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
}

fn blocks() -> FontSource {
    let mut source = FontSource::new();
    source.insert('A' as i64, vec![rect(0.0, 0.0, 1.0, 1.0)]);
    // a slanted bar, so sheared projections differ from the box
    source.insert(
        'B' as i64,
        vec![vec![(0.0, 0.0), (0.6, 0.0), (1.4, 2.0), (0.8, 2.0)]],
    );
    source.insert(
        'O' as i64,
        vec![rect(0.0, 0.0, 2.0, 2.0), rect(0.5, 0.5, 1.5, 1.5)],
    );
    source
}

fn font() -> VectorFont {
    let outcome = VectorFont::build(&blocks(), &FontConfig::default()).expect("valid config");
    assert!(outcome.is_clean(), "{:?}", outcome.defects);
    outcome.value
}

#[test]
fn glyph_meshes_are_printable() {
    let font = font();
    for (_, glyph) in font.iter() {
        let report = validate_mesh(&glyph.mesh);
        assert!(report.is_printable(), "glyph {}: {report:?}", glyph.codepoint);
    }
}

#[test]
fn repeated_square_kerning_matches_recomputation() {
    let font = font();
    let config = font.config().clone();
    let a = font.glyph_for('A' as i64).expect("glyph A");

    let outer = grow(&a.faces[0].outer.oriented(Winding::Clockwise), config.grow_offset);
    let expected = a
        .kerning
        .shears
        .iter()
        .zip(&a.kerning.scales)
        .map(|(&shear, &scale)| {
            let positions: Vec<f64> = outer.iter().map(|p| calc_pos(shear, p)).collect();
            let left = positions.iter().copied().fold(f64::INFINITY, f64::min) - a.bbox.min_x;
            let right = positions.iter().copied().fold(f64::NEG_INFINITY, f64::max) - a.bbox.max_x;
            (right - left) * 0.8 + scale - (1.0 - config.letter_gap)
        })
        .fold(f64::INFINITY, f64::min);

    let kerning = a.kerning.get_kerning(Some(&a.kerning), config.letter_gap);
    assert_abs_diff_eq!(kerning, expected, epsilon = 1e-12);

    let placements = font.gen_text_chars("AA").value;
    assert_eq!(placements.len(), 2);
    let advance = placements[1].position.x - placements[0].position.x;
    assert_abs_diff_eq!(advance, a.width() + kerning, epsilon = 1e-12);
}

#[test]
fn space_separated_pair_is_centred() {
    let font = font();
    let config = font.config();
    let a = font.glyph_for('A' as i64).expect("glyph A");
    let b = font.glyph_for('B' as i64).expect("glyph B");
    let kerning = b.kerning.get_kerning(Some(&a.kerning), config.letter_gap);

    let placements = font.gen_text_chars("A B").value;
    assert_eq!(placements.len(), 2);
    let total = a.width() + 0.8 + kerning + b.width();
    assert_abs_diff_eq!(placements[0].position.x, -total * 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(
        placements[1].position.x,
        0.8 + a.width() + kerning - total * 0.5,
        epsilon = 1e-12
    );
    assert!(placements.iter().all(|p| p.position.y == 0.0));
}

#[test]
fn second_line_starts_fresh() {
    let font = font();
    let placements = font.gen_text_chars("AB\nB").value;
    assert_eq!(placements.len(), 3);
    assert_eq!(placements[2].position.y, -3.0);
    let b = font.glyph_for('B' as i64).expect("glyph B");
    // no kerning against the previous line's last glyph
    assert_abs_diff_eq!(placements[2].position.x, -b.width() * 0.5, epsilon = 1e-12);
}

#[test]
fn missing_glyphs_take_no_space() {
    let font = font();
    let with_gap = font.gen_text_chars("A?A");
    let without = font.gen_text_chars("AA");
    assert_eq!(with_gap.defects.len(), 1);
    assert_eq!(with_gap.value, without.value);
}

#[test]
fn merged_text_is_printable() {
    let font = font();
    let outcome = font.gen_text("OA\nBO");
    assert!(outcome.is_clean());
    let report = validate_mesh(&outcome.value);
    assert!(report.is_closed_manifold(), "{report:?}");
}

#[test]
fn placed_mesh_is_an_independent_copy() {
    let font = font();
    let placements = font.gen_text_chars("A").value;
    let mut placed = font.placed_mesh(&placements[0]).expect("known glyph");
    placed.scale(2.0);
    let stored = &font.glyph(placements[0].glyph).expect("known glyph").mesh;
    assert_ne!(&placed, stored);
    assert_eq!(placed.vertex_count(), stored.vertex_count());
}
