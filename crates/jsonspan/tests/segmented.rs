#![expect(missing_docs)]

mod common;

use std::borrow::Cow;

use jsonspan::{Capture, Cursor, JsonReader, ReaderOptions, SegmentList, TokenType, ValueKind};
use rstest::rstest;

use crate::common::{STREAM, first_error, render, segments, stream_chunks};

fn compact() -> String {
    STREAM.concat()
}

fn fixed_width(bytes: &[u8], width: usize) -> Vec<&[u8]> {
    bytes.chunks(width).collect()
}

#[rstest]
#[case::single_bytes(1)]
#[case::pairs(2)]
#[case::triples(3)]
#[case::sevens(7)]
#[case::one_span(usize::MAX)]
fn fixed_width_chunks_render_like_contiguous(
    #[case] width: usize,
    #[values(false, true)] with_empty: bool,
) {
    let text = compact();
    let bytes = text.as_bytes();
    let expected = render(JsonReader::new(bytes, ReaderOptions::default()));

    let chunks = fixed_width(bytes, width.min(bytes.len()));
    let list = segments(&chunks, with_empty);
    let actual = render(JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default()));
    assert_eq!(actual, expected);
}

#[rstest]
fn every_two_way_split_renders_like_contiguous(#[values(false, true)] with_empty: bool) {
    let text = compact();
    let bytes = text.as_bytes();
    let expected = render(JsonReader::new(bytes, ReaderOptions::default()));
    for split in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(split);
        let list = segments(&[head, tail], with_empty);
        let actual = render(JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default()));
        assert_eq!(actual, expected, "split at {split}");
    }
}

#[rstest]
#[case::unterminated_string(br#"{"a":"abc"#)]
#[case::bad_escape(br#"["ok","a\qb"]"#)]
#[case::bad_unicode(br#"["\u00G0"]"#)]
#[case::control_character(b"[\"a\tb\"]")]
#[case::bad_literal(b"[true, nul1]")]
#[case::bad_number(b"[1.2.3]")]
#[case::trailing_comma(br#"{"a":1,}"#)]
#[case::mismatched_close(br#"{"a":[1}"#)]
#[case::trailing_content(b"{} x")]
#[case::later_line(b"[\n1,\r\n2,\n  -]")]
fn errors_report_same_position_for_every_split(#[case] input: &[u8]) {
    let expected = first_error(JsonReader::new(input, ReaderOptions::default()))
        .expect("input must be malformed");
    for split in 0..=input.len() {
        let (head, tail) = input.split_at(split);
        let list = segments(&[head, tail], true);
        let actual = first_error(JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default()));
        assert_eq!(actual.as_ref(), Some(&expected), "split at {split}");
    }
}

#[test]
fn straddling_values_are_copied_and_others_borrowed() {
    let chunks = stream_chunks();
    let list = segments(&chunks, false);
    let mut reader = JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default());

    let mut straddling = Vec::new();
    while reader.read().unwrap() {
        if reader.token_type() == TokenType::Value || reader.token_type() == TokenType::PropertyName {
            let owned = matches!(reader.value_bytes(), Cow::Owned(_));
            assert_eq!(owned, reader.has_value_sequence());
            if owned {
                straddling.push(reader.value_text().unwrap().into_owned());
            }
        }
    }
    assert_eq!(straddling, ["json", "Send", r#"a\"b"#, "-12.5", "true", "null"]);
}

#[test]
fn getters_decode_straddling_values() {
    let list: SegmentList<'_, u8> = [
        &b"[18446744"[..],
        &b"073709551615, -4"[..],
        &b"2, \"\\u00"[..],
        &b"e9\", fal"[..],
        &b"se]"[..],
    ]
    .into_iter()
    .collect();
    let mut reader = JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default());
    assert!(reader.read().unwrap());
    assert!(reader.read().unwrap());
    assert_eq!(reader.get_u64().unwrap(), u64::MAX);
    assert!(reader.read().unwrap());
    assert_eq!(reader.get_i64().unwrap(), -42);
    assert!(reader.read().unwrap());
    assert_eq!(reader.value_kind(), ValueKind::String);
    assert!(reader.value_is_escaped());
    assert_eq!(reader.get_str().unwrap(), "\u{e9}");
    assert!(reader.read().unwrap());
    assert!(!reader.get_bool().unwrap());
    assert!(reader.read().unwrap());
    assert_eq!(reader.token_type(), TokenType::EndArray);
    assert!(!reader.read().unwrap());
}

#[test]
fn token_positions_match_contiguous() {
    let text = compact();
    let bytes = text.as_bytes();
    let chunks = stream_chunks();
    let list = segments(&chunks, true);

    let mut flat = JsonReader::new(bytes, ReaderOptions::default());
    let mut split = JsonReader::from_sequence(list.as_sequence(), ReaderOptions::default());
    while flat.read().unwrap() {
        assert!(split.read().unwrap());
        assert_eq!(flat.token_start_index(), split.token_start_index());
        assert_eq!(flat.bytes_consumed(), split.bytes_consumed());
        assert_eq!(flat.token(), split.token());
    }
    assert!(!split.read().unwrap());
}

#[test]
fn cursor_reads_straddling_delimited_fields() {
    let list: SegmentList<'_, u8> = [&b"key=va"[..], &b""[..], &b"lue;rest"[..]].into_iter().collect();
    let mut cursor = Cursor::new(list.as_sequence());

    let key = cursor.read_to(b'=', true).unwrap();
    assert!(matches!(key, Capture::Borrowed(b"key")));
    let value = cursor.read_to_any(b";,", true).unwrap();
    assert!(value.is_segmented());
    assert_eq!(value, *b"value");
    assert_eq!(value.to_cow(), Cow::<[u8]>::Owned(b"value".to_vec()));
    assert!(cursor.read_to(b';', true).is_none());
    assert_eq!(cursor.unread_span(), b"rest");
}
