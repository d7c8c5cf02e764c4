//! Glyph table and text layout.

use std::collections::BTreeMap;

use glyph_kernel::{
    BoundingBox, Defect, Outcome, Point2d, PolygonWithHoles, Vec3, Winding, grow, record,
};
use glyph_mesh::{Mesh, bevel_extrude_with_holes, optimize};
use slotmap::{SlotMap, new_key_type};
use tracing::{debug, info, instrument};

use crate::classify::classify_contours;
use crate::config::FontConfig;
use crate::error::FontError;
use crate::kerning::{KerningBuilder, KerningSource};
use crate::source::FontSource;
use crate::utf8::Codepoints;

new_key_type! {
    pub struct GlyphId;
}

/// Everything derived from one codepoint's contours.
///
/// Glyphs are moved horizontally so their box starts at x = 0; vertical
/// coordinates stay in font units so baselines line up.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub codepoint: i64,
    pub faces: Vec<PolygonWithHoles>,
    /// Optimized solid centred on z = 0.
    pub mesh: Mesh,
    pub bbox: BoundingBox,
    pub kerning: KerningSource,
}

impl Glyph {
    pub fn width(&self) -> f64 {
        self.kerning.width()
    }
}

/// One glyph placed by text layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub glyph: GlyphId,
    pub position: Vec3,
}

/// An immutable table of extruded glyphs plus their spacing data.
#[derive(Debug, Clone)]
pub struct VectorFont {
    glyphs: SlotMap<GlyphId, Glyph>,
    by_codepoint: BTreeMap<i64, GlyphId>,
    global_box: BoundingBox,
    config: FontConfig,
}

impl VectorFont {
    /// Classify, extrude and measure every glyph of `source`.
    ///
    /// Only invalid configuration fails. Contours that cannot be used are
    /// dropped and reported in the outcome.
    #[instrument(skip_all, fields(glyphs = source.len()))]
    pub fn build(source: &FontSource, config: &FontConfig) -> Result<Outcome<Self>, FontError> {
        config.validate()?;
        let settings = config.bevel_settings();
        let mut defects = Vec::new();

        let sources: Vec<_> = source
            .polygons()
            .map(|(codepoint, polygons)| {
                let mut bbox = BoundingBox::empty();
                for polygon in &polygons {
                    bbox.grow(&polygon.bbox());
                }
                (codepoint, polygons, bbox)
            })
            .collect();
        let global_box = sources
            .iter()
            .fold(BoundingBox::empty(), |acc, (_, _, bbox)| acc.union(bbox));

        let mut glyphs = SlotMap::with_key();
        let mut by_codepoint = BTreeMap::new();
        for (codepoint, polygons, bbox) in sources {
            let offset = if bbox.is_empty() {
                Point2d::ORIGIN
            } else {
                Point2d::new(-bbox.min_x, 0.0)
            };
            let mut faces = classify_contours(polygons).collect_into(&mut defects);
            for face in &mut faces {
                face.shift(offset);
            }
            let bbox = shifted_box(&bbox, offset);

            let mut mesh = Mesh::new();
            let mut kerning = KerningBuilder::new(&config.kerning);
            for face in &faces {
                let solid = bevel_extrude_with_holes(&face.outer, &face.holes, &settings)?
                    .collect_into(&mut defects);
                mesh.merge(&optimize(&solid));

                let outer = face.outer.oriented(Winding::Clockwise);
                if config.grow_offset == 0.0 {
                    kerning.add_face(&outer);
                } else {
                    kerning.add_face(&grow(&outer, config.grow_offset));
                }
            }
            debug!(
                codepoint,
                faces = faces.len(),
                triangles = mesh.triangle_count(),
                "built glyph"
            );

            let id = glyphs.insert(Glyph {
                codepoint,
                faces,
                mesh,
                bbox,
                kerning: kerning.calc(bbox, global_box.min_x),
            });
            by_codepoint.insert(codepoint, id);
        }

        info!(
            glyphs = glyphs.len(),
            triangles = glyphs.values().map(|g| g.mesh.triangle_count()).sum::<usize>(),
            defects = defects.len(),
            "font built"
        );
        let font = Self {
            glyphs,
            by_codepoint,
            global_box,
            config: config.clone(),
        };
        Ok(Outcome::with_defects(font, defects))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// Union of every glyph's box, in source coordinates.
    pub fn global_box(&self) -> BoundingBox {
        self.global_box
    }

    pub fn glyph(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id)
    }

    pub fn glyph_id(&self, codepoint: i64) -> Option<GlyphId> {
        self.by_codepoint.get(&codepoint).copied()
    }

    pub fn glyph_for(&self, codepoint: i64) -> Option<&Glyph> {
        self.glyph_id(codepoint).and_then(|id| self.glyph(id))
    }

    /// Glyphs in codepoint order.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, &Glyph)> {
        self.by_codepoint
            .values()
            .filter_map(|&id| self.glyphs.get(id).map(|g| (id, g)))
    }

    /// Lay out UTF-8 `bytes`, one placement per drawn glyph.
    ///
    /// A space advances by the configured amount. A newline centres the
    /// finished line around x = 0, drops the baseline by the line height and
    /// forgets the previous glyph. Unknown codepoints and malformed bytes
    /// are skipped and reported.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn layout_bytes(&self, bytes: &[u8]) -> Outcome<Vec<Placement>> {
        let mut defects = Vec::new();
        let mut placements = Vec::new();
        let mut line: Vec<Placement> = Vec::new();
        let (mut xpos, mut ypos) = (0.0, 0.0);
        let mut prev: Option<&KerningSource> = None;
        let gap = self.config.letter_gap;

        for item in Codepoints::new(bytes) {
            let codepoint = match item {
                Ok(c) => c,
                Err(e) => {
                    record(&mut defects, Defect::encoding(e.to_string()));
                    continue;
                }
            };
            match char::from_u32(codepoint) {
                Some(' ') => {
                    xpos += self.config.layout.space_advance;
                    continue;
                }
                Some('\n') => {
                    finish_line(&mut placements, &mut line, xpos, ypos);
                    xpos = 0.0;
                    ypos -= self.config.layout.line_height;
                    // no kerning against the previous line's last glyph
                    prev = None;
                    continue;
                }
                _ => {}
            }
            let Some(id) = self.glyph_id(codepoint as i64) else {
                record(&mut defects, Defect::missing_glyph(codepoint as i64));
                continue;
            };
            let Some(glyph) = self.glyphs.get(id) else {
                continue;
            };
            xpos += glyph.kerning.get_kerning(prev, gap);
            line.push(Placement {
                glyph: id,
                position: Vec3::new(xpos, 0.0, 0.0),
            });
            xpos += glyph.kerning.width();
            prev = Some(&glyph.kerning);
        }
        finish_line(&mut placements, &mut line, xpos, ypos);

        debug!(placed = placements.len(), skipped = defects.len(), "laid out text");
        Outcome::with_defects(placements, defects)
    }

    /// Per-glyph placements for `text`.
    pub fn gen_text_chars(&self, text: &str) -> Outcome<Vec<Placement>> {
        self.layout_bytes(text.as_bytes())
    }

    /// All glyphs of `text` merged into one mesh.
    pub fn gen_text(&self, text: &str) -> Outcome<Mesh> {
        self.layout_bytes(text.as_bytes()).map(|placements| {
            let mut mesh = Mesh::new();
            for placement in &placements {
                if let Some(placed) = self.placed_mesh(placement) {
                    mesh += &placed;
                }
            }
            mesh
        })
    }

    /// An independent copy of the placed glyph's mesh, moved into position.
    pub fn placed_mesh(&self, placement: &Placement) -> Option<Mesh> {
        self.glyphs
            .get(placement.glyph)
            .map(|g| g.mesh.shifted(placement.position))
    }
}

fn finish_line(placements: &mut Vec<Placement>, line: &mut Vec<Placement>, xpos: f64, ypos: f64) {
    let shift = Vec3::new(-xpos * 0.5, ypos, 0.0);
    placements.extend(line.drain(..).map(|p| Placement {
        position: p.position + shift,
        ..p
    }));
}

fn shifted_box(bbox: &BoundingBox, by: Point2d) -> BoundingBox {
    if bbox.is_empty() {
        return *bbox;
    }
    BoundingBox::new(
        bbox.min_x + by.x,
        bbox.max_x + by.x,
        bbox.min_y + by.y,
        bbox.max_y + by.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glyph_kernel::DefectKind;

    fn square_font() -> VectorFont {
        let mut source = FontSource::new();
        source.insert('A' as i64, vec![vec![(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)]]);
        source.insert(
            'O' as i64,
            vec![
                vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)],
                vec![(0.5, 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 1.5)],
            ],
        );
        VectorFont::build(&source, &FontConfig::default())
            .expect("valid config")
            .value
    }

    #[test]
    fn test_glyphs_start_at_zero() {
        let font = square_font();
        let a = font.glyph_for('A' as i64).expect("glyph A");
        assert_eq!(a.bbox.min_x, 0.0);
        assert_eq!(a.width(), 1.0);
        assert_eq!(font.global_box().max_x, 3.0);
        assert_eq!(a.kerning.baseline_offset, 0.0);
        assert!(!a.mesh.is_empty());
    }

    #[test]
    fn test_counter_becomes_hole() {
        let font = square_font();
        let o = font.glyph_for('O' as i64).expect("glyph O");
        assert_eq!(o.faces.len(), 1);
        assert_eq!(o.faces[0].holes.len(), 1);
    }

    #[test]
    fn test_single_glyph_is_centred() {
        let font = square_font();
        let placements = font.gen_text_chars("A").value;
        assert_eq!(placements.len(), 1);
        assert_abs_diff_eq!(placements[0].position.x, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_newline_drops_baseline_and_resets_kerning() {
        let font = square_font();
        let placements = font.gen_text_chars("A\nA").value;
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].position, placements[1].position - Vec3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn test_unknown_and_malformed_input_is_reported() {
        let font = square_font();
        let outcome = font.layout_bytes(&[b'A', 0xff, b'Z']);
        assert_eq!(outcome.value.len(), 1);
        let kinds: Vec<DefectKind> = outcome.defects.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DefectKind::UnsupportedEncoding, DefectKind::MissingGlyph]
        );
    }

    #[test]
    fn test_gen_text_merges_placed_copies() {
        let font = square_font();
        let single = font.glyph_for('A' as i64).expect("glyph A").mesh.clone();
        let text = font.gen_text("AA").value;
        assert_eq!(text.vertex_count(), single.vertex_count() * 2);
        assert_eq!(text.triangle_count(), single.triangle_count() * 2);
    }
}
