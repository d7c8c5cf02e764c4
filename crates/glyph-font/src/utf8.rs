//! UTF-8 codepoint decoding at the text-layout boundary.
//!
//! Text arrives as raw bytes, so malformed input is expected and reported
//! per sequence instead of rejecting the whole string.

use thiserror::Error;

/// Why a byte sequence could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Utf8DecodeError {
    #[error("no bytes left")]
    Empty,
    #[error("byte {0:#04x} cannot start a sequence")]
    InvalidLead(u8),
    #[error("sequence needs {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("byte {0:#04x} is not a continuation byte")]
    InvalidContinuation(u8),
    #[error("codepoint {0:#x} is overlong")]
    Overlong(u32),
    #[error("codepoint {0:#x} is a surrogate")]
    Surrogate(u32),
    #[error("codepoint {0:#x} is beyond U+10FFFF")]
    OutOfRange(u32),
}

impl Utf8DecodeError {
    /// Bytes to skip before decoding again.
    pub fn skip(&self) -> usize {
        1
    }
}

/// Sequence length announced by a lead byte, `None` for continuation bytes
/// and bytes that never start a sequence.
pub fn utf8_len(first_byte: u8) -> Option<usize> {
    match first_byte {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

/// Decode the codepoint at the start of `bytes`, returning it with the
/// number of bytes it occupies.
pub fn decode_utf8(bytes: &[u8]) -> Result<(u32, usize), Utf8DecodeError> {
    let &lead = bytes.first().ok_or(Utf8DecodeError::Empty)?;
    let len = utf8_len(lead).ok_or(Utf8DecodeError::InvalidLead(lead))?;
    if bytes.len() < len {
        return Err(Utf8DecodeError::Truncated {
            needed: len,
            available: bytes.len(),
        });
    }

    let (mut codepoint, min) = match len {
        1 => return Ok((lead as u32, 1)),
        2 => ((lead & 0x1f) as u32, 0x80),
        3 => ((lead & 0x0f) as u32, 0x800),
        _ => ((lead & 0x07) as u32, 0x10000),
    };
    for &byte in &bytes[1..len] {
        if byte & 0xc0 != 0x80 {
            return Err(Utf8DecodeError::InvalidContinuation(byte));
        }
        codepoint = (codepoint << 6) | (byte & 0x3f) as u32;
    }

    if codepoint < min {
        return Err(Utf8DecodeError::Overlong(codepoint));
    }
    if (0xd800..=0xdfff).contains(&codepoint) {
        return Err(Utf8DecodeError::Surrogate(codepoint));
    }
    if codepoint > 0x10ffff {
        return Err(Utf8DecodeError::OutOfRange(codepoint));
    }
    Ok((codepoint, len))
}

/// Encode `codepoint` as UTF-8. Surrogates and values past U+10FFFF have no
/// encoding.
pub fn encode_utf8(codepoint: u32) -> Option<Vec<u8>> {
    let c = char::from_u32(codepoint)?;
    let mut buf = [0u8; 4];
    Some(c.encode_utf8(&mut buf).as_bytes().to_vec())
}

/// Iterator over decoded codepoints; malformed sequences yield their error
/// and advance by [`Utf8DecodeError::skip`].
pub struct Codepoints<'a> {
    bytes: &'a [u8],
}

impl<'a> Codepoints<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = Result<u32, Utf8DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bytes.is_empty() {
            return None;
        }
        let (item, used) = match decode_utf8(self.bytes) {
            Ok((codepoint, len)) => (Ok(codepoint), len),
            Err(e) => (Err(e), e.skip()),
        };
        self.bytes = &self.bytes[used.min(self.bytes.len())..];
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_every_length() {
        assert_eq!(decode_utf8(b"A"), Ok((0x41, 1)));
        assert_eq!(decode_utf8("é".as_bytes()), Ok((0xe9, 2)));
        assert_eq!(decode_utf8("€x".as_bytes()), Ok((0x20ac, 3)));
        assert_eq!(decode_utf8("😀".as_bytes()), Ok((0x1f600, 4)));
    }

    #[test]
    fn test_agrees_with_std() {
        let text = "añ€𝄞 z";
        let decoded: Vec<u32> = Codepoints::new(text.as_bytes())
            .collect::<Result<_, _>>()
            .expect("valid text");
        let expected: Vec<u32> = text.chars().map(|c| c as u32).collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(decode_utf8(&[]), Err(Utf8DecodeError::Empty));
        assert_eq!(decode_utf8(&[0x80]), Err(Utf8DecodeError::InvalidLead(0x80)));
        assert_eq!(decode_utf8(&[0xff]), Err(Utf8DecodeError::InvalidLead(0xff)));
        assert_eq!(
            decode_utf8(&[0xe2, 0x82]),
            Err(Utf8DecodeError::Truncated {
                needed: 3,
                available: 2
            })
        );
        assert_eq!(
            decode_utf8(&[0xc3, 0x41]),
            Err(Utf8DecodeError::InvalidContinuation(0x41))
        );
        assert_eq!(decode_utf8(&[0xc0, 0x80]), Err(Utf8DecodeError::Overlong(0)));
        assert_eq!(
            decode_utf8(&[0xed, 0xa0, 0x80]),
            Err(Utf8DecodeError::Surrogate(0xd800))
        );
        assert_eq!(
            decode_utf8(&[0xf4, 0x90, 0x80, 0x80]),
            Err(Utf8DecodeError::OutOfRange(0x110000))
        );
    }

    #[test]
    fn test_iterator_skips_one_byte_per_error() {
        let items: Vec<_> = Codepoints::new(&[0x41, 0xc3, 0x42]).collect();
        assert_eq!(
            items,
            vec![
                Ok(0x41),
                Err(Utf8DecodeError::InvalidContinuation(0x42)),
                Ok(0x42)
            ]
        );
    }

    #[test]
    fn test_encode_round_trips() {
        for c in [0x24u32, 0xa2, 0x939, 0x20ac, 0x10348] {
            let bytes = encode_utf8(c).expect("scalar value");
            assert_eq!(utf8_len(bytes[0]), Some(bytes.len()));
            assert_eq!(decode_utf8(&bytes), Ok((c, bytes.len())));
        }
        assert_eq!(encode_utf8(0xd800), None);
        assert_eq!(encode_utf8(0x110000), None);
    }
}
