use std::path::Path;

use glyph_mesh::{BevelSettings, DEFAULT_AUTO_SMOOTH_ANGLE, Smoothing};
use serde::{Deserialize, Serialize};

use crate::error::FontError;

/// Shear sampling for the kerning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KerningConfig {
    /// Largest sampled shear angle, in degrees.
    pub max_angle_deg: f64,
    /// Samples on each side of zero; `2 * angle_steps + 1` angles in total.
    pub angle_steps: usize,
}

impl Default for KerningConfig {
    fn default() -> Self {
        Self {
            max_angle_deg: 20.0,
            angle_steps: 2,
        }
    }
}

/// Fixed advances used by text layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub space_advance: f64,
    /// Baseline drop per newline.
    pub line_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            space_advance: 0.8,
            line_height: 3.0,
        }
    }
}

/// Everything that shapes a font's glyph meshes and its spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Outline growth applied to kerning silhouettes only.
    pub grow_offset: f64,
    pub extrude_depth: f64,
    pub bevel_radius: f64,
    pub bevel_slices: usize,
    pub smooth: bool,
    pub letter_gap: f64,
    pub kerning: KerningConfig,
    pub layout: LayoutConfig,
    /// Smoothing threshold as a fraction of π.
    pub auto_smooth_angle: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            grow_offset: 0.1,
            extrude_depth: 0.3,
            bevel_radius: 0.06,
            bevel_slices: 1,
            smooth: true,
            letter_gap: 0.32,
            kerning: KerningConfig::default(),
            layout: LayoutConfig::default(),
            auto_smooth_angle: DEFAULT_AUTO_SMOOTH_ANGLE,
        }
    }
}

impl FontConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FontError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values that cannot produce geometry or spacing.
    pub fn validate(&self) -> Result<(), FontError> {
        finite("grow_offset", self.grow_offset)?;
        finite("letter_gap", self.letter_gap)?;
        finite("layout.space_advance", self.layout.space_advance)?;
        finite("layout.line_height", self.layout.line_height)?;
        if !(self.auto_smooth_angle.is_finite() && self.auto_smooth_angle >= 0.0) {
            return Err(invalid("auto_smooth_angle", "must be a non-negative number"));
        }
        let angle = self.kerning.max_angle_deg;
        if !(angle.is_finite() && (0.0..90.0).contains(&angle)) {
            return Err(invalid("kerning.max_angle_deg", "must be in [0, 90)"));
        }
        self.bevel_settings().validate()?;
        Ok(())
    }

    /// Extrusion parameters for glyph meshes.
    pub fn bevel_settings(&self) -> BevelSettings {
        BevelSettings {
            height: self.extrude_depth,
            radius: self.bevel_radius,
            slices: self.bevel_slices,
            smoothing: if self.smooth {
                Smoothing::new(self.auto_smooth_angle)
            } else {
                Smoothing::faceted()
            },
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> FontError {
    FontError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), FontError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_mesh::MeshError;

    #[test]
    fn test_defaults() {
        let config = FontConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.kerning.angle_steps, 2);
        assert_eq!(config.layout.line_height, 3.0);
        assert_eq!(config.bevel_settings().smoothing.threshold, 0.35);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FontConfig::from_json_str(r#"{"bevel_slices": 3, "kerning": {"angle_steps": 4}}"#)
            .expect("valid config");
        assert_eq!(config.bevel_slices, 3);
        assert_eq!(config.kerning.angle_steps, 4);
        assert_eq!(config.kerning.max_angle_deg, 20.0);
        assert_eq!(config.extrude_depth, 0.3);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            FontConfig::from_json_str(r#"{"bevel_slices": 0}"#),
            Err(FontError::Mesh(MeshError::ZeroSlices))
        ));
        assert!(matches!(
            FontConfig::from_json_str(r#"{"kerning": {"max_angle_deg": 90.0}}"#),
            Err(FontError::InvalidConfig { field: "kerning.max_angle_deg", .. })
        ));
        assert!(matches!(
            FontConfig::from_json_str(r#"{"bevel_radius": 0.2}"#),
            Err(FontError::Mesh(MeshError::RadiusTooLarge { .. }))
        ));
        assert!(matches!(
            FontConfig::from_json_str("{"),
            Err(FontError::Json(_))
        ));
    }

    #[test]
    fn test_faceted_when_not_smooth() {
        let config = FontConfig {
            smooth: false,
            ..FontConfig::default()
        };
        assert_eq!(config.bevel_settings().smoothing, Smoothing::faceted());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            FontConfig::from_path("/nonexistent/font-config.json"),
            Err(FontError::Io { .. })
        ));
    }
}
