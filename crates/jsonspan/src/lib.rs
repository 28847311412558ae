//! Zero-copy JSON tokenizing over contiguous or segmented byte buffers.
//!
//! The crate is built in two layers:
//!
//! - [`Cursor`] scans a [`Sequence`], one logical stream stored as one span or
//!   as a chain of disjoint spans. Searches answer from the current span when
//!   they can and walk into later segments only when a match straddles a
//!   boundary. A search that fails leaves the cursor where it was.
//! - [`JsonReader`] classifies the bytes under a cursor into tokens, tracking
//!   nesting depth and reporting malformed input with its line and column.
//!
//! Reading the same document as one span or split into arbitrary segments
//! yields the same tokens; only the [`Capture`] representation of payloads
//! that straddle a boundary differs.
//!
//! ```rust
//! use jsonspan::{JsonReader, ReaderOptions, SegmentList, TokenType, ValueKind};
//!
//! let list: SegmentList<'_, u8> =
//!     [&br#"{"protocol":"du"#[..], &br#"mmy","version":1}"#[..]].into_iter().collect();
//! let mut reader = JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default());
//!
//! assert!(reader.read()?);
//! assert_eq!(reader.token_type(), TokenType::StartObject);
//! assert!(reader.read()?);
//! assert_eq!(reader.get_str()?, "protocol");
//! assert!(reader.read()?);
//! assert_eq!(reader.value_kind(), ValueKind::String);
//! assert!(reader.has_value_sequence());
//! assert_eq!(reader.get_str()?, "dummy");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod capture;
mod cursor;
mod element;
mod reader;
mod sequence;

pub mod framing;
pub mod handshake;

#[cfg(any(test, feature = "fuzzing"))]
pub mod chunk_utils;

#[cfg(test)]
mod tests;

pub use capture::Capture;
pub use cursor::{Cursor, PROBE_STACK_LEN};
pub use element::Element;
pub use reader::{
    ConfigError, DEFAULT_MAX_DEPTH, JsonReader, ReaderError, ReaderOptions, SyntaxError, Token,
    TokenType, Tokens, ValueError, ValueKind, describe,
};
pub use sequence::{Segment, SegmentList, Sequence, SequencePosition, Spans};
