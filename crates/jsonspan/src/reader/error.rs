use core::fmt;

use thiserror::Error;

/// Renders a byte for messages: printable ASCII as is, anything else escaped.
struct Shown(u8);

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == b' ' || self.0.is_ascii_graphic() {
            write!(f, "{}", char::from(self.0))
        } else {
            write!(f, "{}", self.0.escape_ascii())
        }
    }
}

fn shown(byte: &u8) -> Shown {
    Shown(*byte)
}

/// A malformed-input error with the position of the offending byte.
///
/// `line` and `column` are 1-based; `column` counts bytes, not characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at {line}:{column}")]
pub struct ReaderError {
    pub(crate) source: SyntaxError,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl ReaderError {
    /// What went wrong.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxError {
        &self.source
    }

    /// 1-based line of the offending byte.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based byte column of the offending byte.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

/// Grammar violations raised while classifying tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The input ended inside a token or with containers still open.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A byte that cannot start or continue the expected production.
    #[error("invalid character '{}'", shown(.0))]
    InvalidCharacter(u8),
    /// A backslash followed by something other than a JSON escape.
    #[error("invalid escape sequence '\\{}'", shown(.0))]
    InvalidEscape(u8),
    /// A non-hexadecimal byte inside `\uXXXX`.
    #[error("invalid unicode escape sequence at character: '{}'", shown(.0))]
    InvalidUnicodeEscapeChar(u8),
    /// A raw byte below 0x20 inside a string.
    #[error("control character 0x{0:02X} in string")]
    ControlCharacterInString(u8),
    /// A misspelled `true`, `false` or `null`.
    #[error("invalid character '{}' in literal `{expected}`", shown(.found))]
    InvalidLiteral {
        /// The literal being matched.
        expected: &'static str,
        /// The first byte that diverged from it.
        found: u8,
    },
    /// A `}` or `]` that does not close the innermost container.
    #[error("unexpected '{}' does not close the open container", shown(.0))]
    MismatchedClose(u8),
    /// Content after the single top-level value.
    #[error("unexpected trailing character '{}'", shown(.0))]
    TrailingContent(u8),
    /// Nesting went deeper than the configured maximum.
    #[error("maximum depth of {0} exceeded")]
    DepthLimitExceeded(usize),
}

/// Invalid reader configuration, raised when the option is set.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The maximum depth must be positive.
    #[error("maximum depth must be positive, got {0}")]
    InvalidMaxDepth(usize),
}

/// Failures while decoding the current token's payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The current token is not of the requested kind.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        /// Description of the requested kind.
        expected: &'static str,
        /// Description of the current token.
        found: &'static str,
    },
    /// The decoded string is not UTF-8.
    #[error("string value is not valid UTF-8")]
    InvalidUtf8,
    /// A `\uXXXX` escape encoding half of a surrogate pair on its own.
    #[error("unpaired surrogate \\u{0:04X}")]
    InvalidSurrogate(u32),
    /// The number does not fit the requested type.
    #[error("number cannot be represented as {0}")]
    InvalidNumber(&'static str),
    /// A malformed escape in raw string content.
    #[error("invalid escape sequence '\\{}'", shown(.0))]
    InvalidEscape(u8),
}
