//! Typed accessors for the current token's payload.

use alloc::{borrow::Cow, string::String};

use super::{
    JsonReader, TokenType, ValueKind,
    error::ValueError,
    escape_buffer::unescape,
    token::describe,
};

fn into_str(bytes: Cow<'_, [u8]>) -> Result<Cow<'_, str>, ValueError> {
    match bytes {
        Cow::Borrowed(bytes) => core::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|_| ValueError::InvalidUtf8),
        Cow::Owned(bytes) => String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|_| ValueError::InvalidUtf8),
    }
}

impl<'a> JsonReader<'a> {
    fn type_mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: describe(self.token_type, self.value_kind),
        }
    }

    fn is_value(&self, kind: ValueKind) -> bool {
        self.token_type == TokenType::Value && self.value_kind == kind
    }

    /// Decodes the current string value or property name.
    ///
    /// Borrows from the input when the payload has no escapes and lies in one
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] on any other token, and
    /// [`ValueError::InvalidUtf8`] or [`ValueError::InvalidSurrogate`] when
    /// the decoded bytes are not a valid string.
    pub fn get_str(&self) -> Result<Cow<'a, str>, ValueError> {
        if self.token_type != TokenType::PropertyName && !self.is_value(ValueKind::String) {
            return Err(self.type_mismatch("string"));
        }
        let raw = self.value_bytes();
        let bytes = if self.value_is_escaped {
            Cow::Owned(unescape(&raw)?)
        } else {
            raw
        };
        into_str(bytes)
    }

    /// The raw payload as text, escapes left as written.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidUtf8`] if the payload is not UTF-8.
    pub fn value_text(&self) -> Result<Cow<'a, str>, ValueError> {
        into_str(self.value_bytes())
    }

    /// The current `true` or `false` value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] on any other token.
    pub fn get_bool(&self) -> Result<bool, ValueError> {
        match (self.token_type, self.value_kind) {
            (TokenType::Value, ValueKind::True) => Ok(true),
            (TokenType::Value, ValueKind::False) => Ok(false),
            _ => Err(self.type_mismatch("boolean")),
        }
    }

    fn number_text(&self) -> Result<Cow<'a, str>, ValueError> {
        if !self.is_value(ValueKind::Number) {
            return Err(self.type_mismatch("number"));
        }
        self.value_text()
    }

    /// The current number as a signed integer.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] on any other token and
    /// [`ValueError::InvalidNumber`] for fractions, exponents and values out
    /// of range.
    pub fn get_i64(&self) -> Result<i64, ValueError> {
        self.number_text()?
            .parse()
            .map_err(|_| ValueError::InvalidNumber("i64"))
    }

    /// The current number as an unsigned integer.
    ///
    /// # Errors
    ///
    /// As [`JsonReader::get_i64`], also rejecting negative numbers.
    pub fn get_u64(&self) -> Result<u64, ValueError> {
        self.number_text()?
            .parse()
            .map_err(|_| ValueError::InvalidNumber("u64"))
    }

    /// The current number as a float.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] on any other token.
    pub fn get_f64(&self) -> Result<f64, ValueError> {
        self.number_text()?
            .parse()
            .map_err(|_| ValueError::InvalidNumber("f64"))
    }
}
