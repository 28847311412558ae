//! Decoding of JSON string escapes.
//!
//! The reader only validates escapes while scanning; the payload it hands out
//! is the raw text between the quotes. [`unescape`] turns that raw text into
//! the string's bytes, using [`UnicodeEscapeBuffer`] for `\uXXXX` and
//! combining UTF-16 surrogate pairs into one code point.
//!
//! # Errors
//!
//! - A non-hexadecimal digit in `\uXXXX`, an unknown escape letter or a
//!   truncated escape returns [`ValueError::InvalidEscape`].
//! - A high surrogate not immediately followed by a low surrogate escape, or
//!   a low surrogate on its own, returns [`ValueError::InvalidSurrogate`].

use alloc::vec::Vec;

use super::error::ValueError;

/// Accumulates four hexadecimal digits into one UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
            b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
            _ => None,
        }
    }

    /// Feeds one hex digit.
    ///
    /// - Returns `Ok(None)` until four digits have been seen.
    /// - Returns `Ok(Some(unit))` on the fourth digit and resets.
    /// - Returns `Err` if `b` is not an ASCII hex digit.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, ValueError> {
        let d = Self::hex_val(b).ok_or(ValueError::InvalidEscape(b))?;
        debug_assert!(self.len < 4);

        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

fn push_char(out: &mut Vec<u8>, code: u32) -> Result<(), ValueError> {
    let ch = char::from_u32(code).ok_or(ValueError::InvalidSurrogate(code))?;
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    Ok(())
}

fn decode_unit(digits: &[u8]) -> Result<u16, ValueError> {
    let mut buffer = UnicodeEscapeBuffer::new();
    let mut unit = None;
    for &digit in digits {
        unit = buffer.feed(digit)?;
    }
    unit.ok_or(ValueError::InvalidEscape(b'u'))
}

/// Decodes the escapes in `raw`, the text between a string's quotes.
pub(crate) fn unescape(raw: &[u8]) -> Result<Vec<u8>, ValueError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw;
    let mut high: Option<u16> = None;

    while let Some(index) = memchr::memchr(b'\\', rest) {
        if let Some(unit) = high.filter(|_| index > 0) {
            return Err(ValueError::InvalidSurrogate(unit.into()));
        }
        out.extend_from_slice(&rest[..index]);
        let escape = *rest.get(index + 1).ok_or(ValueError::InvalidEscape(b'\\'))?;
        rest = &rest[index + 2..];

        if escape == b'u' {
            let digits = rest.get(..4).ok_or(ValueError::InvalidEscape(b'u'))?;
            let unit = decode_unit(digits)?;
            rest = &rest[4..];
            match (high.take(), unit) {
                (None, 0xD800..=0xDBFF) => high = Some(unit),
                (Some(h), 0xDC00..=0xDFFF) => {
                    let code = 0x1_0000 + ((u32::from(h) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                    push_char(&mut out, code)?;
                }
                (Some(h), _) => return Err(ValueError::InvalidSurrogate(h.into())),
                (None, _) => push_char(&mut out, unit.into())?,
            }
            continue;
        }

        if let Some(unit) = high {
            return Err(ValueError::InvalidSurrogate(unit.into()));
        }
        out.push(match escape {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            other => return Err(ValueError::InvalidEscape(other)),
        });
    }

    if let Some(unit) = high {
        return Err(ValueError::InvalidSurrogate(unit.into()));
    }
    out.extend_from_slice(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{UnicodeEscapeBuffer, unescape};
    use crate::reader::error::ValueError;

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'4').unwrap(), None);
        assert_eq!(buf.feed(b'1').unwrap(), Some(0x41));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        for b in *b"AbC" {
            assert!(buf.feed(b).unwrap().is_none());
        }
        assert_eq!(buf.feed(b'd').unwrap(), Some(0xABCD));
    }

    #[test]
    fn reset_clears_buffer() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert!(buf.feed(b'F').unwrap().is_none());
        buf.reset();
        for b in *b"004" {
            assert!(buf.feed(b).unwrap().is_none());
        }
        assert_eq!(buf.feed(b'2').unwrap(), Some(0x42));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'G').unwrap_err(), ValueError::InvalidEscape(b'G'));
    }

    #[test]
    fn unescape_simple_escapes() {
        assert_eq!(unescape(br#"a\"b\\c\/d\b\f\n\r\t"#).unwrap(), b"a\"b\\c/d\x08\x0C\n\r\t");
        assert_eq!(unescape(b"plain").unwrap(), b"plain");
    }

    #[test]
    fn unescape_unicode_and_pairs() {
        assert_eq!(unescape(br"\u00e9").unwrap(), "é".as_bytes());
        assert_eq!(unescape(br"x\uD83D\uDE00y").unwrap(), "x😀y".as_bytes());
    }

    #[test]
    fn unpaired_surrogates_are_rejected() {
        assert_eq!(unescape(br"\uD83D"), Err(ValueError::InvalidSurrogate(0xD83D)));
        assert_eq!(unescape(br"\uD83Dx\uDE00"), Err(ValueError::InvalidSurrogate(0xD83D)));
        assert_eq!(unescape(br"\uD83D\n"), Err(ValueError::InvalidSurrogate(0xD83D)));
        assert_eq!(unescape(br"\uDE00"), Err(ValueError::InvalidSurrogate(0xDE00)));
    }

    #[test]
    fn truncated_escape_is_rejected() {
        assert_eq!(unescape(b"abc\\"), Err(ValueError::InvalidEscape(b'\\')));
        assert_eq!(unescape(br"\u12"), Err(ValueError::InvalidEscape(b'u')));
        assert_eq!(unescape(br"\x"), Err(ValueError::InvalidEscape(b'x')));
    }
}
