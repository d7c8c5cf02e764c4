//! Non-fatal findings reported by the geometry pipeline.
//!
//! Nothing in the pipeline aborts on bad contours. Operations that may drop
//! data return an [`Outcome`]: the best-effort value plus every [`Defect`]
//! recorded while producing it, so the caller decides what to surface.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Classification of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectKind {
    /// A contour could not be placed consistently (ambiguous nesting, a hole
    /// outside its outer polygon, a hole with no valid bridge). It was dropped.
    GeometryDefect,
    /// A polygon with fewer than 3 points reached a triangulator. It was skipped.
    DegenerateInput,
    /// Text referenced a codepoint with no glyph. No geometry, no advance.
    MissingGlyph,
    /// Text contained a byte sequence that is not valid UTF-8.
    UnsupportedEncoding,
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Input data was lost.
    Error,
    /// Informational, usually intentional (e.g. unknown characters in text).
    Warning,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    pub kind: DefectKind,
    pub severity: Severity,
    pub message: String,
}

impl Defect {
    pub fn new(kind: DefectKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }

    pub fn geometry(message: impl Into<String>) -> Self {
        Self::new(DefectKind::GeometryDefect, Severity::Error, message)
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::new(DefectKind::DegenerateInput, Severity::Warning, message)
    }

    pub fn missing_glyph(codepoint: i64) -> Self {
        Self::new(
            DefectKind::MissingGlyph,
            Severity::Warning,
            format!("no glyph for codepoint U+{codepoint:04X}"),
        )
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(DefectKind::UnsupportedEncoding, Severity::Warning, message)
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{sev}] {}: {}", self.kind, self.message)
    }
}

/// A best-effort result together with the defects found while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub defects: Vec<Defect>,
}

impl<T> Outcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            defects: Vec::new(),
        }
    }

    pub fn with_defects(value: T, defects: Vec<Defect>) -> Self {
        Self { value, defects }
    }

    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            defects: self.defects,
        }
    }

    /// Move this outcome's defects into `sink` and return the bare value.
    pub fn collect_into(self, sink: &mut Vec<Defect>) -> T {
        sink.extend(self.defects);
        self.value
    }

    pub fn into_parts(self) -> (T, Vec<Defect>) {
        (self.value, self.defects)
    }
}

/// Record a defect, logging it as it happens.
pub fn record(sink: &mut Vec<Defect>, defect: Defect) {
    warn!(kind = %defect.kind, "{}", defect.message);
    sink.push(defect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_collect_into_moves_defects() {
        let outcome = Outcome::with_defects(7, vec![Defect::degenerate("two points")]);
        let mut sink = vec![Defect::geometry("earlier")];
        let value = outcome.collect_into(&mut sink);
        assert_eq!(value, 7);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].kind, DefectKind::DegenerateInput);
    }

    #[test]
    fn test_defect_display() {
        let d = Defect::missing_glyph(0x41);
        assert_eq!(d.to_string(), "[WARN] MissingGlyph: no glyph for codepoint U+0041");
    }

    #[test]
    fn test_outcome_map_keeps_defects() {
        let outcome = Outcome::with_defects(2, vec![Defect::geometry("x")]).map(|v| v * 3);
        assert_eq!(outcome.value, 6);
        assert!(!outcome.is_clean());
    }
}
