//! Pull-based JSON token classifier over a [`Cursor`].
//!
//! Each call to [`JsonReader::read`] skips whitespace, looks at the next
//! significant byte and scans one grammar production with cursor primitives:
//! run skips for strings, numbers and whitespace, and sequence matches for
//! literals. The token's payload is a [`Capture`] into the input, borrowed
//! unless the token straddled a segment boundary.
//!
//! The state machine only needs the previous token and the innermost open
//! container to decide what may come next:
//!
//! | previous token                | expected next                            |
//! |-------------------------------|------------------------------------------|
//! | `None`, `PropertyName`        | a value                                  |
//! | `StartObject`                 | `"` (property name) or `}`               |
//! | `StartArray`                  | a value or `]`                           |
//! | `Value`, `EndObject/EndArray` | `,` or the innermost close; end at depth 0 |
//!
//! Errors point at the first byte that breaks the grammar, never at the start
//! of the enclosing token.

use alloc::{borrow::Cow, vec::Vec};

use log::debug;

use crate::{capture::Capture, cursor::Cursor, sequence::Sequence};

pub(crate) mod error;
pub(crate) mod escape_buffer;
mod literal;
mod options;
mod token;
mod value;

pub use error::{ConfigError, ReaderError, SyntaxError, ValueError};
use literal::Literal;
pub use options::{DEFAULT_MAX_DEPTH, ReaderOptions};
pub use token::{Token, TokenType, ValueKind, describe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// A forward-only JSON reader over contiguous or segmented bytes.
///
/// ```rust
/// use jsonspan::{JsonReader, ReaderOptions, TokenType, ValueKind};
///
/// let mut reader = JsonReader::new(br#"{"a":[1,true]}"#, ReaderOptions::default());
/// let mut kinds = Vec::new();
/// while reader.read()? {
///     kinds.push((reader.token_type(), reader.value_kind(), reader.current_depth()));
/// }
/// assert_eq!(
///     kinds,
///     [
///         (TokenType::StartObject, ValueKind::Object, 0),
///         (TokenType::PropertyName, ValueKind::Unknown, 1),
///         (TokenType::StartArray, ValueKind::Array, 1),
///         (TokenType::Value, ValueKind::Number, 2),
///         (TokenType::Value, ValueKind::True, 2),
///         (TokenType::EndArray, ValueKind::Array, 1),
///         (TokenType::EndObject, ValueKind::Object, 0),
///     ]
/// );
/// # Ok::<(), jsonspan::ReaderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonReader<'a> {
    cursor: Cursor<'a, u8>,
    options: ReaderOptions,
    stack: Vec<Container>,
    token_type: TokenType,
    value_kind: ValueKind,
    value: Capture<'a, u8>,
    value_is_escaped: bool,
    token_start: usize,
    line: usize,
    line_start: usize,
    finished: bool,
    errored: bool,
}

impl<'a> JsonReader<'a> {
    /// Creates a reader over one contiguous buffer.
    #[must_use]
    pub fn new(input: &'a [u8], options: ReaderOptions) -> Self {
        Self::from_sequence(Sequence::from_slice(input), options)
    }

    /// Creates a reader over a segmented buffer.
    #[must_use]
    pub fn from_sequence(input: Sequence<'a, u8>, options: ReaderOptions) -> Self {
        Self {
            cursor: Cursor::new(input),
            options,
            stack: Vec::new(),
            token_type: TokenType::None,
            value_kind: ValueKind::Unknown,
            value: Capture::default(),
            value_is_escaped: false,
            token_start: 0,
            line: 1,
            line_start: 0,
            finished: false,
            errored: false,
        }
    }

    /// Advances to the next token.
    ///
    /// Returns `Ok(true)` when positioned on a token and `Ok(false)` once the
    /// single top-level value has been read completely. After an error the
    /// reader stays put and keeps returning `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReaderError`] on malformed input, including input that ends
    /// early and nesting beyond [`ReaderOptions::max_depth`].
    pub fn read(&mut self) -> Result<bool, ReaderError> {
        if self.finished || self.errored {
            return Ok(false);
        }
        let result = self.read_token();
        if let Err(err) = &result {
            debug!("json reader stopped: {err}");
            self.errored = true;
        }
        result
    }

    /// Skips the children of the current token.
    ///
    /// On a property name the reader moves to its value first. On a container
    /// start it reads up to and including the matching end token. On any
    /// other token this does nothing.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`JsonReader::read`].
    pub fn skip(&mut self) -> Result<(), ReaderError> {
        if self.token_type == TokenType::PropertyName {
            self.read()?;
        }
        if !matches!(self.token_type, TokenType::StartObject | TokenType::StartArray) {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 && self.read()? {
            match self.token_type {
                TokenType::StartObject | TokenType::StartArray => depth += 1,
                TokenType::EndObject | TokenType::EndArray => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    // --- Accessors -----------------------------------------------------------

    /// The kind of the current token.
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The value kind of the current token.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Nesting depth of the current token.
    ///
    /// Container starts and ends report the depth outside the container, so
    /// the outermost `{` and `}` are both at depth 0.
    #[must_use]
    pub fn current_depth(&self) -> usize {
        match self.token_type {
            TokenType::StartObject | TokenType::StartArray => self.stack.len().saturating_sub(1),
            _ => self.stack.len(),
        }
    }

    /// Raw payload of the current token.
    ///
    /// Strings and property names exclude the quotes and keep escapes as
    /// written. Numbers and literals are their text. Structural tokens are
    /// empty.
    #[must_use]
    pub fn value(&self) -> Capture<'a, u8> {
        self.value
    }

    /// Returns `true` when the payload straddles a segment boundary.
    #[must_use]
    pub fn has_value_sequence(&self) -> bool {
        self.value.as_slice().is_none()
    }

    /// Raw payload as one slice, copied only when it straddles segments.
    #[must_use]
    pub fn value_bytes(&self) -> Cow<'a, [u8]> {
        self.value.to_cow()
    }

    /// Returns `true` when the string payload contains escapes.
    #[must_use]
    pub fn value_is_escaped(&self) -> bool {
        self.value_is_escaped
    }

    /// Offset of the current token's first byte.
    #[must_use]
    pub fn token_start_index(&self) -> usize {
        self.token_start
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> usize {
        self.cursor.consumed()
    }

    /// 1-based line of the read position.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// 0-based byte offset of the read position within its line.
    #[must_use]
    pub fn byte_position_in_line(&self) -> usize {
        self.cursor.consumed() - self.line_start
    }

    /// The options this reader was created with.
    #[must_use]
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Snapshot of the current token.
    #[must_use]
    pub fn token(&self) -> Token {
        Token {
            token_type: self.token_type,
            value_kind: self.value_kind,
            depth: self.current_depth(),
            content: self.value.to_vec().into(),
        }
    }

    /// Iterates over the remaining tokens as snapshots.
    ///
    /// The iterator ends after the last token or after yielding an error.
    pub fn tokens(&mut self) -> Tokens<'_, 'a> {
        Tokens { reader: self }
    }

    // --- Scanning ------------------------------------------------------------

    fn syntax_error(&self, source: SyntaxError) -> ReaderError {
        ReaderError {
            source,
            line: self.line,
            column: self.byte_position_in_line() + 1,
        }
    }

    /// Error for the byte under the cursor, or end of input if there is none.
    fn unexpected(&self, found: Option<u8>) -> ReaderError {
        self.syntax_error(found.map_or(SyntaxError::UnexpectedEndOfInput, SyntaxError::InvalidCharacter))
    }

    fn skip_whitespace(&mut self) {
        loop {
            self.cursor.skip_while_any3(b' ', b'\t', b'\r');
            if !self.cursor.is_next(b'\n', true) {
                return;
            }
            self.line += 1;
            self.line_start = self.cursor.consumed();
        }
    }

    fn set_token(&mut self, token_type: TokenType, value_kind: ValueKind) -> Result<bool, ReaderError> {
        self.token_type = token_type;
        self.value_kind = value_kind;
        Ok(true)
    }

    fn read_token(&mut self) -> Result<bool, ReaderError> {
        self.skip_whitespace();
        self.value = Capture::default();
        self.value_is_escaped = false;
        self.token_start = self.cursor.consumed();

        let Some(byte) = self.cursor.try_peek() else {
            return self.read_end();
        };
        match self.token_type {
            TokenType::None | TokenType::PropertyName => self.read_value(byte),
            TokenType::StartObject => match byte {
                b'}' => self.end_container(byte),
                b'"' => self.read_property_name(),
                _ => Err(self.unexpected(Some(byte))),
            },
            TokenType::StartArray => match byte {
                b']' => self.end_container(byte),
                _ => self.read_value(byte),
            },
            TokenType::Value | TokenType::EndObject | TokenType::EndArray | TokenType::Comment => {
                self.read_after_value(byte)
            }
        }
    }

    fn read_end(&mut self) -> Result<bool, ReaderError> {
        if self.token_type == TokenType::None || !self.stack.is_empty() {
            return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput));
        }
        self.finished = true;
        self.token_type = TokenType::None;
        self.value_kind = ValueKind::Unknown;
        Ok(false)
    }

    fn read_after_value(&mut self, byte: u8) -> Result<bool, ReaderError> {
        let Some(&container) = self.stack.last() else {
            return Err(self.syntax_error(SyntaxError::TrailingContent(byte)));
        };
        match byte {
            b',' => {
                self.cursor.advance(1);
                self.skip_whitespace();
                self.token_start = self.cursor.consumed();
                match (container, self.cursor.try_peek()) {
                    (Container::Object, Some(b'"')) => self.read_property_name(),
                    (Container::Array, Some(next)) if next != b']' => self.read_value(next),
                    (_, found) => Err(self.unexpected(found)),
                }
            }
            b'}' | b']' => self.end_container(byte),
            _ => Err(self.unexpected(Some(byte))),
        }
    }

    fn read_value(&mut self, byte: u8) -> Result<bool, ReaderError> {
        match byte {
            b'{' => self.start_container(Container::Object),
            b'[' => self.start_container(Container::Array),
            b'"' => {
                self.read_string()?;
                self.set_token(TokenType::Value, ValueKind::String)
            }
            b'-' | b'0'..=b'9' => self.read_number(),
            _ => match Literal::from_first_byte(byte) {
                Some(literal) => self.read_literal(literal),
                None => Err(self.unexpected(Some(byte))),
            },
        }
    }

    fn start_container(&mut self, container: Container) -> Result<bool, ReaderError> {
        let max_depth = self.options.max_depth();
        if self.stack.len() + 1 > max_depth {
            let err = self.syntax_error(SyntaxError::DepthLimitExceeded(max_depth));
            debug!("depth limit {max_depth} reached at {}:{}", err.line, err.column);
            return Err(err);
        }
        self.stack.push(container);
        self.cursor.advance(1);
        match container {
            Container::Object => self.set_token(TokenType::StartObject, ValueKind::Object),
            Container::Array => self.set_token(TokenType::StartArray, ValueKind::Array),
        }
    }

    fn end_container(&mut self, byte: u8) -> Result<bool, ReaderError> {
        let expected = if byte == b'}' { Container::Object } else { Container::Array };
        if self.stack.last() != Some(&expected) {
            return Err(self.syntax_error(SyntaxError::MismatchedClose(byte)));
        }
        self.stack.pop();
        self.cursor.advance(1);
        match expected {
            Container::Object => self.set_token(TokenType::EndObject, ValueKind::Object),
            Container::Array => self.set_token(TokenType::EndArray, ValueKind::Array),
        }
    }

    fn read_property_name(&mut self) -> Result<bool, ReaderError> {
        self.read_string()?;
        self.skip_whitespace();
        match self.cursor.try_peek() {
            Some(b':') => self.cursor.advance(1),
            found => return Err(self.unexpected(found)),
        }
        self.set_token(TokenType::PropertyName, ValueKind::Unknown)
    }

    /// Scans a string with the cursor on its opening quote and stores the
    /// content between the quotes as the payload.
    fn read_string(&mut self) -> Result<(), ReaderError> {
        self.cursor.advance(1);
        let start = self.cursor.position();
        loop {
            self.cursor.skip_while(|b| b != b'"' && b != b'\\' && b >= 0x20);
            match self.cursor.try_peek() {
                Some(b'"') => break,
                Some(b'\\') => {
                    self.cursor.advance(1);
                    self.value_is_escaped = true;
                    self.read_escape()?;
                }
                Some(byte) => {
                    return Err(self.syntax_error(SyntaxError::ControlCharacterInString(byte)));
                }
                None => return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput)),
            }
        }
        self.value = Capture::from_sequence(self.cursor.sequence().slice(start, self.cursor.position()));
        self.cursor.advance(1);
        Ok(())
    }

    /// Validates one escape with the cursor just past the backslash.
    fn read_escape(&mut self) -> Result<(), ReaderError> {
        match self.cursor.try_peek() {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.cursor.advance(1);
                Ok(())
            }
            Some(b'u') => {
                self.cursor.advance(1);
                for _ in 0..4 {
                    match self.cursor.try_peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => self.cursor.advance(1),
                        Some(byte) => {
                            return Err(self.syntax_error(SyntaxError::InvalidUnicodeEscapeChar(byte)));
                        }
                        None => return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput)),
                    }
                }
                Ok(())
            }
            Some(byte) => Err(self.syntax_error(SyntaxError::InvalidEscape(byte))),
            None => Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput)),
        }
    }

    fn read_number(&mut self) -> Result<bool, ReaderError> {
        let start = self.cursor.position();
        self.cursor.is_next(b'-', true);
        match self.cursor.try_peek() {
            Some(b'0') => self.cursor.advance(1),
            Some(b'1'..=b'9') => {
                self.cursor.skip_while(|b| b.is_ascii_digit());
            }
            found => return Err(self.unexpected(found)),
        }
        if self.cursor.is_next(b'.', true) {
            self.expect_digits()?;
        }
        if self.cursor.is_next(b'e', true) || self.cursor.is_next(b'E', true) {
            if !self.cursor.is_next(b'+', true) {
                self.cursor.is_next(b'-', true);
            }
            self.expect_digits()?;
        }
        let end = self.cursor.position();
        self.expect_delimiter()?;
        self.value = Capture::from_sequence(self.cursor.sequence().slice(start, end));
        self.set_token(TokenType::Value, ValueKind::Number)
    }

    fn expect_digits(&mut self) -> Result<(), ReaderError> {
        if self.cursor.skip_while(|b| b.is_ascii_digit()) > 0 {
            return Ok(());
        }
        Err(self.unexpected(self.cursor.try_peek()))
    }

    /// Numbers and literals must be followed by a byte that can end them.
    fn expect_delimiter(&self) -> Result<(), ReaderError> {
        match self.cursor.try_peek() {
            None | Some(b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}') => Ok(()),
            found => Err(self.unexpected(found)),
        }
    }

    fn read_literal(&mut self, literal: Literal) -> Result<bool, ReaderError> {
        let start = self.cursor.position();
        let expected = literal.as_bytes();
        if !self.cursor.is_next_sequence(expected, true) {
            let mut scratch = [0u8; 5];
            let found = self.cursor.peek(&mut scratch[..expected.len()]);
            let index = literal.divergence(found);
            let diverging = found.get(index).copied();
            self.cursor.advance(index);
            return Err(self.syntax_error(match diverging {
                Some(found) => SyntaxError::InvalidLiteral {
                    expected: literal.as_str(),
                    found,
                },
                None => SyntaxError::UnexpectedEndOfInput,
            }));
        }
        let end = self.cursor.position();
        self.expect_delimiter()?;
        self.value = Capture::from_sequence(self.cursor.sequence().slice(start, end));
        self.set_token(TokenType::Value, literal.kind())
    }
}

/// Iterator returned by [`JsonReader::tokens`].
#[derive(Debug)]
pub struct Tokens<'r, 'a> {
    reader: &'r mut JsonReader<'a>,
}

impl Iterator for Tokens<'_, '_> {
    type Item = Result<Token, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read() {
            Ok(true) => Some(Ok(self.reader.token())),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
