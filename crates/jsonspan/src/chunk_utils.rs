//! Helpers that cut a payload into segments for tests and fuzzing.

use alloc::vec::Vec;

use crate::sequence::SegmentList;

/// Split `payload` into approximately equal-sized chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Split `payload` into chunks whose sizes are derived from `split_seed`.
///
/// Every chunk is at least one byte and the chunks concatenate back to
/// `payload`. The same seed always gives the same split.
#[must_use]
pub fn split_by_seed(payload: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut state = split_seed;
    let mut rest = payload;
    while !rest.is_empty() {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let size = usize::try_from(state % rest.len() as u64).unwrap_or(0) + 1;
        let (chunk, tail) = rest.split_at(size);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Collects `chunks` into a segment list, optionally interleaving empty
/// segments.
#[must_use]
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
