#![allow(missing_docs, dead_code)]
#![expect(clippy::needless_raw_string_hashes)]

use std::fmt::Write;

use jsonspan::{JsonReader, ReaderError, SegmentList, TokenType};

pub const ORIGINAL: &str = r#"
{
    "protocol": "json",
    "version": 1,
    "target": "Send",
    "arguments": [
        "a\"b",
        -12.5,
        true,
        null,
        {
            "nested": [],
            "empty": {}
        }
    ],
    "headers": {
        "x-trace": "abc"
    }
}"#;

// A request split the way a socket might deliver it. Chunks are cut inside
// strings, numbers, literals and escapes, and between closing brackets.
#[rustfmt::skip]
pub const STREAM: [&str; 11] = [
    r#"{"protocol":"js"#,                   // inside a string
    r#"on","version":1"#,                   // number ends at the chunk end
    r#","target":"Se"#,                     // inside a string
    r#"nd","arguments":["a\"#,              // between backslash and escaped quote
    r#""b",-1"#,                            // inside a number
    r#"2.5,tr"#,                            // inside `true`
    r#"ue,nu"#,                             // inside `null`
    r#"ll,{"nested":["#,                    // array start ...
    r#"],"empty":{}}"#,                     // ... and its end in the next chunk
    r#"],"headers":{"x-trace":"abc"}"#,     // array end -> property
    r#"}"#,                                 // closes the top-level object
];

/// Collects `chunks` into a segment list, optionally with an empty segment
/// before and after each chunk.
pub fn segments<'a>(chunks: &[&'a [u8]], with_empty: bool) -> SegmentList<'a, u8> {
    let mut list = SegmentList::new();
    for &chunk in chunks {
        if with_empty {
            list.push(&[]);
        }
        list.push(chunk);
    }
    if with_empty {
        list.push(&[]);
    }
    list
}

pub fn stream_chunks() -> Vec<&'static [u8]> {
    STREAM.iter().map(|chunk| chunk.as_bytes()).collect()
}

/// Renders one line per token. Reading stops at the first error, which is
/// rendered as the last line.
pub fn render(mut reader: JsonReader<'_>) -> String {
    let mut out = String::new();
    loop {
        match reader.read() {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                writeln!(out, "error: {err}").unwrap();
                break;
            }
        }
        let depth = reader.current_depth();
        match reader.token_type() {
            TokenType::PropertyName => {
                writeln!(out, "{depth} PropertyName {:?}", reader.get_str().unwrap()).unwrap();
            }
            TokenType::Value => {
                let kind = reader.value_kind();
                match reader.get_str() {
                    Ok(text) => writeln!(out, "{depth} Value {kind:?} {text:?}").unwrap(),
                    Err(_) => {
                        writeln!(out, "{depth} Value {kind:?} {}", reader.value_text().unwrap()).unwrap();
                    }
                }
            }
            other => writeln!(out, "{depth} {other:?}").unwrap(),
        }
    }
    out
}

/// Reads to the end and returns the first error, if any.
pub fn first_error(mut reader: JsonReader<'_>) -> Option<ReaderError> {
    loop {
        match reader.read() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => return Some(err),
        }
    }
}

#[test]
fn assert_stream_example() {
    let streamed = STREAM.join("");

    let value: serde_json::Value = serde_json::from_str(ORIGINAL).unwrap();
    let original = serde_json::to_string(&value).unwrap();

    assert_eq!(streamed, original);
}
