#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonspan::{
    JsonReader, ReaderError, ReaderOptions, SegmentList, Token, TokenType, ValueKind,
    chunk_utils::{segments, split_by_seed},
    framing, handshake,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"\r\n"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x0F);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;
            prefix += append_whitespace(&mut data[prefix..], limit);
            let limit = max_size - prefix;
            prefix += append_value(&mut data[prefix..], size, limit);
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append up to eight JSON whitespace sequences to `buf` without exceeding
/// `limit`. Returns the number of bytes written.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let count = rng.random_range(1..=limit.min(8));
        let mut written = 0;
        for _ in 0..count {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Reads every token, exercising the typed getters along the way. The
/// getters may fail but must not panic.
fn observe(mut reader: JsonReader<'_>) -> (Vec<Token>, Option<ReaderError>) {
    let mut tokens = Vec::new();
    loop {
        match reader.read() {
            Ok(true) => {}
            Ok(false) => return (tokens, None),
            Err(err) => return (tokens, Some(err)),
        }
        match (reader.token_type(), reader.value_kind()) {
            (TokenType::PropertyName, _) | (TokenType::Value, ValueKind::String) => {
                let _ = reader.get_str();
            }
            (TokenType::Value, ValueKind::Number) => {
                let _ = (reader.get_i64(), reader.get_u64(), reader.get_f64());
            }
            (TokenType::Value, ValueKind::True | ValueKind::False) => {
                assert!(reader.get_bool().is_ok());
            }
            _ => {}
        }
        tokens.push(reader.token());
    }
}

fn reader(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let data = &data[HEADER..];

    // Low bits pick the depth limit: 1, 2, 8 or the default.
    let options = match flags & 3 {
        0 => ReaderOptions::default(),
        depth => ReaderOptions::default()
            .with_max_depth([1, 2, 8][usize::from(depth - 1)])
            .expect("positive depth"),
    };
    let with_empty = flags & 4 != 0;

    let chunks = split_by_seed(data, split_seed);
    let list: SegmentList<'_, u8> = segments(&chunks, with_empty);

    let contiguous = observe(JsonReader::new(data, options));
    let segmented = observe(JsonReader::from_sequence(list.as_sequence(), options));
    assert_eq!(contiguous, segmented);

    if flags & 8 != 0 {
        let mut buffer = list.as_sequence();
        while let Some(message) = framing::try_parse_message(&mut buffer) {
            let _ = handshake::parse_request(message);
        }
    }
}

fuzz_target!(|data: &[u8]| reader(data));
