//! Property-based tests for spacing and decoding.

use proptest::prelude::*;

use glyph_font::{Codepoints, KerningBuilder, KerningConfig, KerningSource, decode_utf8};
use glyph_kernel::{Point2d, Polygon};

/// Random quadrilateral with corners in the four quadrants of a unit cell.
fn arb_quad() -> impl Strategy<Value = Polygon> {
    prop::collection::vec((0.0f64..0.45, 0.0f64..0.45), 4).prop_map(|d| {
        Polygon::new(vec![
            Point2d::new(d[0].0, d[0].1),
            Point2d::new(1.0 - d[1].0, d[1].1),
            Point2d::new(1.0 - d[2].0, 1.0 - d[2].1),
            Point2d::new(d[3].0, 1.0 - d[3].1),
        ])
    })
}

fn source(face: &Polygon) -> KerningSource {
    let mut builder = KerningBuilder::new(&KerningConfig::default());
    builder.add_face(face);
    builder.calc(face.bbox(), 0.0)
}

proptest! {
    #[test]
    fn kerning_without_previous_is_zero(face in arb_quad(), gap in -1.0f64..1.0) {
        prop_assert_eq!(source(&face).get_kerning(None, gap), 0.0);
    }
}

proptest! {
    #[test]
    fn kerning_grows_with_gap(
        prev in arb_quad(),
        next in arb_quad(),
        gap in 0.0f64..1.0,
        extra in 0.0f64..1.0,
    ) {
        let (prev, next) = (source(&prev), source(&next));
        let narrow = next.get_kerning(Some(&prev), gap);
        let wide = next.get_kerning(Some(&prev), gap + extra);
        prop_assert!(wide >= narrow);
    }
}

proptest! {
    #[test]
    fn decoder_matches_std(text in "\\PC{0,24}") {
        let decoded: Vec<u32> = Codepoints::new(text.as_bytes())
            .collect::<Result<_, _>>()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let expected: Vec<u32> = text.chars().map(|c| c as u32).collect();
        prop_assert_eq!(decoded, expected);
    }
}

proptest! {
    #[test]
    fn decoder_never_overreads(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        if let Ok((_, len)) = decode_utf8(&bytes) {
            prop_assert!(len >= 1 && len <= 4 && len <= bytes.len());
        }
        let items = Codepoints::new(&bytes).count();
        prop_assert!(items <= bytes.len());
    }
}
