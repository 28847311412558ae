//! Record-separator framing.
//!
//! Each message is a text payload followed by the ASCII record separator
//! (`0x1E`). Payloads may arrive split over any number of segments; framing
//! slices them off the front of the buffered sequence without copying.

use alloc::vec::Vec;

use crate::{cursor::Cursor, sequence::Sequence};

/// The byte terminating every message.
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// Slices one complete message off the front of `buffer`.
///
/// On success `buffer` is advanced past the separator and the payload (without
/// the separator) is returned. When no separator is buffered yet, returns
/// `None` and leaves `buffer` untouched.
///
/// ```rust
/// use jsonspan::{SegmentList, framing};
///
/// let list: SegmentList<'_, u8> = [&b"{}\x1e{\"a\""[..], &b":1}\x1e"[..]].into_iter().collect();
/// let mut buffer = list.as_sequence();
///
/// let first = framing::try_parse_message(&mut buffer).unwrap();
/// assert_eq!(first.to_vec(), b"{}");
/// let second = framing::try_parse_message(&mut buffer).unwrap();
/// assert_eq!(second.to_vec(), br#"{"a":1}"#);
/// assert!(framing::try_parse_message(&mut buffer).is_none());
/// assert!(buffer.is_empty());
/// ```
pub fn try_parse_message<'a>(buffer: &mut Sequence<'a, u8>) -> Option<Sequence<'a, u8>> {
    let mut cursor = Cursor::new(*buffer);
    let start = cursor.position();
    if !cursor.skip_to(RECORD_SEPARATOR, false) {
        return None;
    }
    let payload = buffer.slice(start, cursor.position());
    cursor.advance(1);
    *buffer = cursor.unread_sequence();
    Some(payload)
}

/// Appends `payload` and the terminating separator to `output`.
pub fn write_message(payload: &[u8], output: &mut Vec<u8>) {
    output.reserve(payload.len() + 1);
    output.extend_from_slice(payload);
    output.push(RECORD_SEPARATOR);
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::sequence::SegmentList;

    #[test]
    fn written_messages_frame_back() {
        let mut wire = Vec::new();
        write_message(br#"{"protocol":"json","version":1}"#, &mut wire);
        write_message(b"", &mut wire);
        assert_eq!(wire.iter().filter(|&&b| b == RECORD_SEPARATOR).count(), 2);

        let mut buffer = Sequence::from_slice(&wire);
        let first = try_parse_message(&mut buffer).unwrap();
        assert!(first.is_single_segment());
        assert_eq!(first.to_vec(), br#"{"protocol":"json","version":1}"#);
        assert!(try_parse_message(&mut buffer).unwrap().is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn incomplete_message_is_left_buffered() {
        let list: SegmentList<'_, u8> = [&b"{\"a\":"[..], &b"1"[..]].into_iter().collect();
        let mut buffer = list.as_sequence();
        assert!(try_parse_message(&mut buffer).is_none());
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.start(), list.as_sequence().start());
    }

    #[test]
    fn separator_split_from_payload() {
        let list: SegmentList<'_, u8> = [&b"ab"[..], &b"\x1e"[..], &b"cd"[..]].into_iter().collect();
        let mut buffer = list.as_sequence();
        let payload = try_parse_message(&mut buffer).unwrap();
        assert!(payload.is_single_segment());
        assert_eq!(payload.first_span(), b"ab");
        assert_eq!(buffer.to_vec(), b"cd");
    }
}
