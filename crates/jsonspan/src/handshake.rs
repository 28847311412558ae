//! Handshake request validation on top of the token stream.
//!
//! A handshake request is a single JSON object with a string `protocol` and
//! an integer `version`, e.g. `{"protocol":"json","version":1}`. Unknown
//! properties are skipped whatever their shape. The request is normally the
//! first record-separated message on a connection; see
//! [`try_parse_request`].

use alloc::borrow::Cow;

use thiserror::Error;

use crate::{
    framing,
    reader::{
        JsonReader, ReaderError, ReaderOptions, TokenType, ValueError, ValueKind, describe,
    },
    sequence::Sequence,
};

const PROTOCOL_PROPERTY: &str = "protocol";
const VERSION_PROPERTY: &str = "version";

/// A validated handshake request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest<'a> {
    /// Name of the protocol the client wants to speak.
    pub protocol: Cow<'a, str>,
    /// Protocol version requested by the client.
    pub version: i64,
}

/// Why a handshake request was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandshakeError {
    /// The message is not well-formed JSON.
    #[error(transparent)]
    Reader(#[from] ReaderError),
    /// A property value could not be decoded.
    #[error(transparent)]
    Value(#[from] ValueError),
    /// A token of the wrong kind.
    #[error("expected {expected}, got {found}")]
    UnexpectedToken {
        /// Description of the token that was required.
        expected: &'static str,
        /// Description of the token that was found.
        found: &'static str,
    },
    /// A required property never appeared.
    #[error("missing required property '{0}'")]
    MissingProperty(&'static str),
}

fn expect(reader: &JsonReader<'_>, token_type: TokenType, value_kind: ValueKind) -> Result<(), HandshakeError> {
    if reader.token_type() == token_type && reader.value_kind() == value_kind {
        return Ok(());
    }
    Err(HandshakeError::UnexpectedToken {
        expected: describe(token_type, value_kind),
        found: describe(reader.token_type(), reader.value_kind()),
    })
}

/// Validates one handshake request payload.
///
/// ```rust
/// use jsonspan::{Sequence, handshake};
///
/// let request = handshake::parse_request(Sequence::from_slice(
///     br#"{"protocol":"json","extra":[1,{"x":null}],"version":1}"#,
/// ))?;
/// assert_eq!(request.protocol, "json");
/// assert_eq!(request.version, 1);
/// # Ok::<(), handshake::HandshakeError>(())
/// ```
///
/// # Errors
///
/// Returns [`HandshakeError`] when the payload is malformed, is not an object,
/// has a property of the wrong type or lacks `protocol` or `version`.
pub fn parse_request(payload: Sequence<'_, u8>) -> Result<HandshakeRequest<'_>, HandshakeError> {
    let mut reader = JsonReader::from_sequence(payload, ReaderOptions::default());
    reader.read()?;
    expect(&reader, TokenType::StartObject, ValueKind::Object)?;

    let mut protocol = None;
    let mut version = None;
    while reader.read()? && reader.token_type() == TokenType::PropertyName {
        let name = reader.get_str()?;
        match &*name {
            PROTOCOL_PROPERTY => {
                reader.read()?;
                expect(&reader, TokenType::Value, ValueKind::String)?;
                protocol = Some(reader.get_str()?);
            }
            VERSION_PROPERTY => {
                reader.read()?;
                expect(&reader, TokenType::Value, ValueKind::Number)?;
                version = Some(reader.get_i64()?);
            }
            _ => reader.skip()?,
        }
    }
    expect(&reader, TokenType::EndObject, ValueKind::Object)?;
    // Nothing may follow the object.
    reader.read()?;

    Ok(HandshakeRequest {
        protocol: protocol.ok_or(HandshakeError::MissingProperty(PROTOCOL_PROPERTY))?,
        version: version.ok_or(HandshakeError::MissingProperty(VERSION_PROPERTY))?,
    })
}

/// Frames and validates a handshake request at the front of `buffer`.
///
/// Returns `Ok(None)`, consuming nothing, while the request's record
/// separator has not arrived yet.
///
/// # Errors
///
/// As [`parse_request`]; the framed message is consumed from `buffer` even
/// when it is rejected.
pub fn try_parse_request<'a>(
    buffer: &mut Sequence<'a, u8>,
) -> Result<Option<HandshakeRequest<'a>>, HandshakeError> {
    match framing::try_parse_message(buffer) {
        Some(payload) => parse_request(payload).map(Some),
        None => Ok(None),
    }
}
