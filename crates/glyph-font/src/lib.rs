pub mod classify;
pub mod config;
pub mod error;
pub mod font;
pub mod kerning;
pub mod source;
pub mod utf8;

pub use classify::classify_contours;
pub use config::{FontConfig, KerningConfig, LayoutConfig};
pub use error::FontError;
pub use font::{Glyph, GlyphId, Placement, VectorFont};
pub use kerning::{KerningBuilder, KerningSource, calc_pos};
pub use source::FontSource;
pub use utf8::{Codepoints, Utf8DecodeError, decode_utf8, encode_utf8, utf8_len};
