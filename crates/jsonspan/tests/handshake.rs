#![expect(missing_docs)]

mod common;

use jsonspan::{
    SegmentList, Sequence, SyntaxError,
    framing::{self, RECORD_SEPARATOR},
    handshake::{HandshakeError, HandshakeRequest, parse_request, try_parse_request},
};
use rstest::rstest;

use crate::common::{ORIGINAL, STREAM, segments, stream_chunks};

fn parse(input: &[u8]) -> Result<HandshakeRequest<'_>, HandshakeError> {
    parse_request(Sequence::from_slice(input))
}

#[test]
fn minimal_request() {
    let request = parse(br#"{"protocol":"json","version":1}"#).unwrap();
    assert_eq!(request.protocol, "json");
    assert_eq!(request.version, 1);
}

#[rstest]
#[case::reordered(br#"{"version":2,"protocol":"messagepack"}"#, "messagepack", 2)]
#[case::whitespace(b" {\n  \"protocol\" : \"json\" ,\r\n  \"version\" : 1\n}\n", "json", 1)]
#[case::escaped_protocol(br#"{"protocol":"j\u0073on","version":1}"#, "json", 1)]
#[case::unknown_scalars(br#"{"a":null,"protocol":"json","b":true,"version":1,"c":"x"}"#, "json", 1)]
#[case::unknown_containers(br#"{"protocol":"json","x":{"y":[1,{"z":[]}]},"version":1,"w":[]}"#, "json", 1)]
#[case::negative_version(br#"{"protocol":"json","version":-3}"#, "json", -3)]
#[case::duplicate_wins_last(br#"{"protocol":"a","protocol":"json","version":1}"#, "json", 1)]
fn accepted_requests(#[case] input: &[u8], #[case] protocol: &str, #[case] version: i64) {
    let request = parse(input).unwrap();
    assert_eq!(request.protocol, protocol);
    assert_eq!(request.version, version);
}

#[rstest]
#[case::missing_protocol(br#"{"version":1}"#, "missing required property 'protocol'")]
#[case::missing_version(br#"{"protocol":"json"}"#, "missing required property 'version'")]
#[case::empty_object(b"{}", "missing required property 'protocol'")]
#[case::not_an_object(b"[]", "expected start of object, got start of array")]
#[case::scalar(b"1", "expected start of object, got number")]
#[case::protocol_number(br#"{"protocol":1,"version":1}"#, "expected string, got number")]
#[case::protocol_null(br#"{"protocol":null,"version":1}"#, "expected string, got null")]
#[case::version_string(br#"{"protocol":"json","version":"1"}"#, "expected number, got string")]
#[case::version_object(br#"{"protocol":"json","version":{}}"#, "expected number, got start of object")]
#[case::version_fraction(br#"{"protocol":"json","version":1.5}"#, "number cannot be represented as i64")]
#[case::version_overflow(br#"{"protocol":"json","version":9223372036854775808}"#, "number cannot be represented as i64")]
#[case::bad_surrogate(br#"{"protocol":"\uD800","version":1}"#, "unpaired surrogate \\uD800")]
#[case::trailing_content(br#"{"protocol":"json","version":1} {}"#, "unexpected trailing character '{' at 1:33")]
#[case::malformed(br#"{"protocol":"json","version":1"#, "unexpected end of input at 1:31")]
#[case::empty(b"", "unexpected end of input at 1:1")]
fn rejected_requests(#[case] input: &[u8], #[case] message: &str) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn malformed_request_keeps_reader_error() {
    let HandshakeError::Reader(err) = parse(br#"{"protocol" "json"}"#).unwrap_err() else {
        panic!("expected a reader error");
    };
    assert_eq!(err.syntax(), &SyntaxError::InvalidCharacter(b'"'));
    assert_eq!((err.line(), err.column()), (1, 13));
}

#[test]
fn request_split_across_segments() {
    let chunks = stream_chunks();
    for with_empty in [false, true] {
        let list = segments(&chunks, with_empty);
        let request = parse_request(list.as_sequence()).unwrap();
        assert_eq!(request.protocol, "json");
        assert_eq!(request.version, 1);
    }
    assert!(parse(ORIGINAL.as_bytes()).is_ok());
}

#[test]
fn framed_request_waits_for_separator() {
    let mut wire = Vec::new();
    framing::write_message(STREAM.concat().as_bytes(), &mut wire);
    wire.extend_from_slice(b"{\"type\":6}");

    let cut = wire.iter().position(|&b| b == RECORD_SEPARATOR).unwrap();
    let (head, tail) = wire.split_at(cut);

    // Everything but the separator has arrived.
    let partial: SegmentList<'_, u8> = [head].into_iter().collect();
    let mut buffer = partial.as_sequence();
    assert_eq!(try_parse_request(&mut buffer), Ok(None));
    assert_eq!(buffer.len(), head.len());

    let full: SegmentList<'_, u8> = [head, tail].into_iter().collect();
    let mut buffer = full.as_sequence();
    let request = try_parse_request(&mut buffer).unwrap().unwrap();
    assert_eq!(request.protocol, "json");
    assert_eq!(request.version, 1);
    assert_eq!(buffer.to_vec(), b"{\"type\":6}");
}

#[test]
fn rejected_framed_request_is_consumed() {
    let mut wire = Vec::new();
    framing::write_message(br#"{"protocol":"json"}"#, &mut wire);
    framing::write_message(br#"{"protocol":"json","version":1}"#, &mut wire);

    let mut buffer = Sequence::from_slice(&wire);
    assert_eq!(
        try_parse_request(&mut buffer),
        Err(HandshakeError::MissingProperty("version"))
    );
    let request = try_parse_request(&mut buffer).unwrap().unwrap();
    assert_eq!(request.version, 1);
    assert!(buffer.is_empty());
    assert_eq!(try_parse_request(&mut buffer), Ok(None));
}
