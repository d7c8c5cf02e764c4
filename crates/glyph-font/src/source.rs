//! Flattened glyph outlines as delivered by an outline decomposer.

use std::collections::BTreeMap;
use std::path::Path;

use glyph_kernel::Polygon;
use serde::{Deserialize, Serialize};

use crate::error::FontError;

/// Contours per codepoint, each contour a list of `(x, y)` pairs.
///
/// In JSON the keys are either decimal codepoints (`"65"`) or the character
/// itself (`"A"`); contours are arrays of `[x, y]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSource {
    pub glyphs: BTreeMap<i64, Vec<Vec<(f64, f64)>>>,
}

impl FontSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, codepoint: i64, contours: Vec<Vec<(f64, f64)>>) {
        self.glyphs.insert(codepoint, contours);
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Contours of every glyph as polygons, in codepoint order.
    pub fn polygons(&self) -> impl Iterator<Item = (i64, Vec<Polygon>)> + '_ {
        self.glyphs.iter().map(|(&codepoint, contours)| {
            let polygons = contours.iter().map(|c| Polygon::from_pairs(c)).collect();
            (codepoint, polygons)
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, FontError> {
        let raw: BTreeMap<String, Vec<Vec<(f64, f64)>>> = serde_json::from_str(json)?;
        let mut source = Self::new();
        for (key, contours) in raw {
            source.insert(parse_codepoint(&key)?, contours);
        }
        Ok(source)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

fn parse_codepoint(key: &str) -> Result<i64, FontError> {
    if let Ok(codepoint) = key.parse::<i64>() {
        return Ok(codepoint);
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as i64),
        _ => Err(FontError::InvalidCodepoint {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_character_keys() {
        let json = r#"{
            "65": [[[0, 0], [1, 0], [1, 1]]],
            "B": [[[0, 0], [1, 0], [1, 1], [0, 1]]],
            "7": []
        }"#;
        let source = FontSource::from_json_str(json).expect("valid source");
        assert_eq!(source.len(), 3);
        assert_eq!(source.glyphs[&65].len(), 1);
        assert_eq!(source.glyphs[&66][0].len(), 4);
        // digits are codepoints, not characters
        assert!(source.glyphs.contains_key(&7));
    }

    #[test]
    fn test_bad_key_is_rejected() {
        assert!(matches!(
            FontSource::from_json_str(r#"{"AB": []}"#),
            Err(FontError::InvalidCodepoint { .. })
        ));
        assert!(matches!(
            FontSource::from_json_str(r#"{"A": [[[0, 0, 1]]]}"#),
            Err(FontError::Json(_))
        ));
    }

    #[test]
    fn test_polygons_follow_codepoint_order() {
        let mut source = FontSource::new();
        source.insert(66, vec![vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]]);
        source.insert(65, vec![]);
        let order: Vec<i64> = source.polygons().map(|(c, _)| c).collect();
        assert_eq!(order, vec![65, 66]);
    }
}
