use bstr::BString;

/// The kind of the token the reader is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenType {
    /// Before the first token and after the end of input.
    #[default]
    None,
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// An object key, with the following `:` consumed.
    PropertyName,
    /// A string, number or literal.
    Value,
    /// Reserved. Comments are not JSON and are never produced.
    Comment,
}

/// The type of value a token carries.
///
/// The discriminants are ordered: `0..=1` are container starts, `2..=6` are
/// scalar values and `7` is the not-yet-classified placeholder.
/// [`ValueKind::is_scalar`] relies on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ValueKind {
    /// An object; carried by `StartObject` and `EndObject`.
    Object = 0,
    /// An array; carried by `StartArray` and `EndArray`.
    Array = 1,
    /// A string value.
    String = 2,
    /// A number value.
    Number = 3,
    /// `true`
    True = 4,
    /// `false`
    False = 5,
    /// `null`
    Null = 6,
    /// No value: property names and the reader before or after a document.
    #[default]
    Unknown = 7,
}

impl ValueKind {
    /// Returns `true` for strings, numbers and literals.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self as u8, 2..=6)
    }

    /// Returns `true` for objects and arrays.
    #[must_use]
    pub const fn is_container(self) -> bool {
        (self as u8) <= 1
    }
}

/// Describes a token for "expected X, got Y" messages.
#[must_use]
pub fn describe(token_type: TokenType, value_kind: ValueKind) -> &'static str {
    match token_type {
        TokenType::None => "end of input",
        TokenType::StartObject => "start of object",
        TokenType::EndObject => "end of object",
        TokenType::StartArray => "start of array",
        TokenType::EndArray => "end of array",
        TokenType::PropertyName => "property name",
        TokenType::Comment => "comment",
        TokenType::Value => match value_kind {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::True | ValueKind::False => "boolean",
            ValueKind::Null => "null",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Unknown => "value",
        },
    }
}

/// An owned snapshot of one token, detached from the input buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// The token kind.
    pub token_type: TokenType,
    /// The value kind.
    pub value_kind: ValueKind,
    /// Depth reported by [`JsonReader::current_depth`](crate::JsonReader::current_depth).
    pub depth: usize,
    /// Raw payload bytes, escapes left as written.
    pub content: BString,
}
