//! Cursor: a scanning position over a segmented sequence.
//!
//! What it does
//! - Walks a [`Sequence`] span by span, exposing delimiter searches
//!   (`read_to*`, `skip_to*`), run skips (`skip_while*`) and lookahead
//!   (`is_next*`, `peek`).
//! - Answers from the current span whenever it can (fast path) and walks into
//!   later segments only when the answer is not in the current span (slow
//!   path). Results found on the slow path are returned as a slice of the
//!   sequence rather than being copied.
//!
//! Invariants
//! - The unread part of the current span followed by every later span equals
//!   the sequence minus the consumed prefix.
//! - `consumed` never decreases.
//! - Exhausted spans are stepped over eagerly: unless the cursor is at the
//!   end, the current span always has unread elements. Positions reported by
//!   [`Cursor::position`] are therefore canonical.
//! - A search that finds nothing leaves the cursor exactly as it was. The
//!   cursor is `Copy`; searches snapshot it up front and assign the snapshot
//!   back on failure.

use alloc::vec;

use log::trace;

use crate::{
    capture::Capture,
    element::Element,
    sequence::{Sequence, SequencePosition},
};

/// Probes up to this many elements use an on-stack scratch buffer.
pub const PROBE_STACK_LEN: usize = 16;

/// A `Copy` scanning cursor over a [`Sequence`].
///
/// ```rust
/// use jsonspan::{Cursor, SegmentList};
///
/// let list: SegmentList<'_, u8> = [&b"key=va"[..], &b"lue;rest"[..]].into_iter().collect();
/// let mut cursor = Cursor::new(list.as_sequence());
///
/// let key = cursor.read_to(b'=', true).unwrap();
/// assert_eq!(key.as_slice(), Some(&b"key"[..]));
///
/// let value = cursor.read_to(b';', true).unwrap();
/// assert!(value.is_segmented());
/// assert_eq!(&*value.to_cow(), b"value");
///
/// assert!(cursor.read_to(b'=', true).is_none());
/// assert_eq!(cursor.consumed(), 10);
/// ```
pub struct Cursor<'a, T> {
    sequence: Sequence<'a, T>,
    segment: usize,
    span: &'a [T],
    span_base: usize,
    index: usize,
    consumed: usize,
    length: usize,
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> core::fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("segment", &self.segment)
            .field("offset", &(self.span_base + self.index))
            .field("consumed", &self.consumed)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl<'a, T> Cursor<'a, T> {
    /// Creates a cursor at the start of `sequence`.
    #[must_use]
    pub fn new(sequence: Sequence<'a, T>) -> Self {
        let segment = sequence.start().segment();
        let (span_base, span) = sequence.span_at(segment);
        let mut cursor = Self {
            sequence,
            segment,
            span,
            span_base,
            index: 0,
            consumed: 0,
            length: sequence.len(),
        };
        if span.is_empty() {
            cursor.next_span();
        }
        cursor
    }

    /// Creates a cursor over one contiguous span.
    #[must_use]
    pub fn from_slice(memory: &'a [T]) -> Self {
        Self::new(Sequence::from_slice(memory))
    }

    /// Moves to the next non-empty span, or parks at the end of the sequence.
    fn next_span(&mut self) {
        let last = self.sequence.end().segment();
        while self.segment < last {
            self.segment += 1;
            let (base, span) = self.sequence.span_at(self.segment);
            if !span.is_empty() {
                self.span = span;
                self.span_base = base;
                self.index = 0;
                return;
            }
        }
        let (base, span) = self.sequence.span_at(last);
        self.segment = last;
        self.span = span;
        self.span_base = base;
        self.index = span.len();
    }

    /// Advances inside the current span. `count` must not exceed the unread
    /// part of the span.
    #[inline]
    fn advance_in_span(&mut self, count: usize) {
        debug_assert!(self.index + count <= self.span.len());
        self.index += count;
        self.consumed += count;
        if self.index == self.span.len() {
            self.next_span();
        }
    }

    /// The sequence this cursor walks.
    #[must_use]
    pub fn sequence(&self) -> Sequence<'a, T> {
        self.sequence
    }

    /// Number of elements consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of elements left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.length - self.consumed
    }

    /// Returns `true` once every element has been consumed.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.consumed == self.length
    }

    /// Position of the next unread element.
    #[must_use]
    pub fn position(&self) -> SequencePosition {
        SequencePosition::new(self.segment, self.span_base + self.index)
    }

    /// The unread part of the current span.
    #[must_use]
    pub fn unread_span(&self) -> &'a [T] {
        &self.span[self.index..]
    }

    /// Everything not yet consumed.
    #[must_use]
    pub fn unread_sequence(&self) -> Sequence<'a, T> {
        self.sequence.slice_from(self.position())
    }

    /// Moves forward `count` elements, crossing segments as needed.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` elements remain.
    pub fn advance(&mut self, count: usize) {
        assert!(
            count <= self.remaining(),
            "cannot advance {count} elements with {} remaining",
            self.remaining()
        );
        let mut count = count;
        loop {
            let unread = self.span.len() - self.index;
            if count < unread {
                self.index += count;
                self.consumed += count;
                return;
            }
            self.advance_in_span(unread);
            count -= unread;
            if count == 0 || self.is_end() {
                return;
            }
        }
    }

    /// Consumes everything that is left.
    pub fn advance_to_end(&mut self) {
        self.advance(self.remaining());
    }

    /// Copies the next elements into `dest` without moving the cursor.
    ///
    /// When the current span already holds `dest.len()` unread elements the
    /// result borrows from it and `dest` is left untouched. Otherwise `dest`
    /// is filled across segment boundaries; the result is shorter than `dest`
    /// if the input ends first.
    pub fn peek<'b>(&self, dest: &'b mut [T]) -> &'b [T]
    where
        'a: 'b,
        T: Copy,
    {
        let unread = self.unread_span();
        if unread.len() >= dest.len() {
            return &unread[..dest.len()];
        }
        let mut probe = *self;
        let mut filled = 0;
        while filled < dest.len() && !probe.is_end() {
            let unread = probe.unread_span();
            let count = unread.len().min(dest.len() - filled);
            dest[filled..filled + count].copy_from_slice(&unread[..count]);
            filled += count;
            probe.advance_in_span(count);
        }
        &dest[..filled]
    }
}

impl<'a, T: Element> Cursor<'a, T> {
    /// The next element, without consuming it.
    #[must_use]
    pub fn try_peek(&self) -> Option<T> {
        self.unread_span().first().copied()
    }

    /// The element `offset` positions ahead, without consuming anything.
    #[must_use]
    pub fn try_peek_at(&self, offset: usize) -> Option<T> {
        if let Some(&value) = self.unread_span().get(offset) {
            return Some(value);
        }
        if offset >= self.remaining() {
            return None;
        }
        let mut probe = *self;
        probe.advance(offset);
        probe.try_peek()
    }

    /// Consumes and returns the next element.
    pub fn try_read(&mut self) -> Option<T> {
        let value = self.try_peek()?;
        self.advance_in_span(1);
        Some(value)
    }

    // --- Delimiter searches ------------------------------------------------

    /// Reads everything before the first `delimiter`.
    ///
    /// With `advance_past` the cursor ends up just after the delimiter,
    /// otherwise on it. Returns `None`, with the cursor unchanged, if the
    /// delimiter does not occur in the remaining input.
    pub fn read_to(&mut self, delimiter: T, advance_past: bool) -> Option<Capture<'a, T>> {
        self.read_to_with(|span| T::find(span, delimiter), advance_past)
    }

    /// Reads everything before the first element that is in `delimiters`.
    ///
    /// An empty set never matches.
    pub fn read_to_any(&mut self, delimiters: &[T], advance_past: bool) -> Option<Capture<'a, T>> {
        match *delimiters {
            [] => None,
            [a] => self.read_to_with(|span| T::find(span, a), advance_past),
            [a, b] => self.read_to_with(|span| T::find2(span, a, b), advance_past),
            [a, b, c] => self.read_to_with(|span| T::find3(span, a, b, c), advance_past),
            _ => self.read_to_with(|span| T::find_any(span, delimiters), advance_past),
        }
    }

    #[inline]
    fn read_to_with(
        &mut self,
        find: impl Fn(&[T]) -> Option<usize>,
        advance_past: bool,
    ) -> Option<Capture<'a, T>> {
        let unread = self.unread_span();
        if let Some(index) = find(unread) {
            self.advance_in_span(index + usize::from(advance_past));
            return Some(Capture::Borrowed(&unread[..index]));
        }
        self.read_to_slow(find, advance_past)
    }

    #[cold]
    fn read_to_slow(
        &mut self,
        find: impl Fn(&[T]) -> Option<usize>,
        advance_past: bool,
    ) -> Option<Capture<'a, T>> {
        let snapshot = *self;
        let start = self.position();
        // The current span was searched by the fast path.
        self.advance_in_span(self.unread_span().len());
        while !self.is_end() {
            let unread = self.unread_span();
            if let Some(index) = find(unread) {
                self.advance_in_span(index);
                let content = self.sequence.slice(start, self.position());
                trace!(
                    "read_to crossed segments {}..={} ({} elements)",
                    start.segment(),
                    self.segment,
                    content.len()
                );
                if advance_past {
                    self.advance_in_span(1);
                }
                return Some(Capture::Segmented(content));
            }
            self.advance_in_span(unread.len());
        }
        *self = snapshot;
        None
    }

    /// Reads everything before the first occurrence of the run `delimiter`.
    ///
    /// Matching is a sliding window: find the first element of the run, probe
    /// the following `delimiter.len()` elements, and on a mismatch move one
    /// element forward and retry. An empty `delimiter` matches immediately
    /// without consuming anything.
    pub fn read_to_sequence(
        &mut self,
        delimiter: &[T],
        advance_past: bool,
    ) -> Option<Capture<'a, T>> {
        let Some(&first) = delimiter.first() else {
            return Some(Capture::Borrowed(&[]));
        };
        let snapshot = *self;
        let start = self.position();
        while self.skip_to(first, false) {
            if self.is_next_sequence(delimiter, false) {
                let content = self.sequence.slice(start, self.position());
                if advance_past {
                    self.advance(delimiter.len());
                }
                return Some(Capture::from_sequence(content));
            }
            self.advance_in_span(1);
        }
        *self = snapshot;
        None
    }

    /// Moves to the first `delimiter` (past it with `advance_past`).
    ///
    /// Returns `false`, with the cursor unchanged, if there is none.
    pub fn skip_to(&mut self, delimiter: T, advance_past: bool) -> bool {
        self.skip_to_with(|span| T::find(span, delimiter), advance_past)
    }

    /// Moves to the first element in `delimiters` (past it with
    /// `advance_past`). An empty set never matches.
    pub fn skip_to_any(&mut self, delimiters: &[T], advance_past: bool) -> bool {
        match *delimiters {
            [] => false,
            [a] => self.skip_to_with(|span| T::find(span, a), advance_past),
            [a, b] => self.skip_to_with(|span| T::find2(span, a, b), advance_past),
            [a, b, c] => self.skip_to_with(|span| T::find3(span, a, b, c), advance_past),
            _ => self.skip_to_with(|span| T::find_any(span, delimiters), advance_past),
        }
    }

    #[inline]
    fn skip_to_with(&mut self, find: impl Fn(&[T]) -> Option<usize>, advance_past: bool) -> bool {
        if let Some(index) = find(self.unread_span()) {
            self.advance_in_span(index + usize::from(advance_past));
            return true;
        }
        let snapshot = *self;
        self.advance_in_span(self.unread_span().len());
        while !self.is_end() {
            let unread = self.unread_span();
            if let Some(index) = find(unread) {
                self.advance_in_span(index + usize::from(advance_past));
                return true;
            }
            self.advance_in_span(unread.len());
        }
        *self = snapshot;
        false
    }

    // --- Run skips ---------------------------------------------------------

    /// Consumes the longest run of elements matching `predicate` and returns
    /// its length.
    pub fn skip_while(&mut self, mut predicate: impl FnMut(T) -> bool) -> usize {
        let mut skipped = 0;
        while !self.is_end() {
            let unread = self.unread_span();
            let run = unread
                .iter()
                .position(|&e| !predicate(e))
                .unwrap_or(unread.len());
            self.advance_in_span(run);
            skipped += run;
            if run < unread.len() {
                break;
            }
        }
        skipped
    }

    /// Consumes a run of `value`.
    pub fn skip_while_equal(&mut self, value: T) -> usize {
        self.skip_while(|e| e == value)
    }

    /// Consumes a run of `a` or `b`.
    pub fn skip_while_any2(&mut self, a: T, b: T) -> usize {
        self.skip_while(|e| e == a || e == b)
    }

    /// Consumes a run of `a`, `b` or `c`.
    pub fn skip_while_any3(&mut self, a: T, b: T, c: T) -> usize {
        self.skip_while(|e| e == a || e == b || e == c)
    }

    /// Consumes a run of `a`, `b`, `c` or `d`.
    pub fn skip_while_any4(&mut self, a: T, b: T, c: T, d: T) -> usize {
        self.skip_while(|e| e == a || e == b || e == c || e == d)
    }

    /// Consumes a run of elements contained in `values`.
    pub fn skip_while_any(&mut self, values: &[T]) -> usize {
        match *values {
            [] => 0,
            [a] => self.skip_while_equal(a),
            [a, b] => self.skip_while_any2(a, b),
            [a, b, c] => self.skip_while_any3(a, b, c),
            [a, b, c, d] => self.skip_while_any4(a, b, c, d),
            _ => self.skip_while(|e| values.contains(&e)),
        }
    }

    // --- Lookahead ---------------------------------------------------------

    /// Checks whether the next element is `value`, consuming it with
    /// `advance_past`.
    pub fn is_next(&mut self, value: T, advance_past: bool) -> bool {
        if self.try_peek() != Some(value) {
            return false;
        }
        if advance_past {
            self.advance_in_span(1);
        }
        true
    }

    /// Checks whether the input continues with `values`, consuming them with
    /// `advance_past`.
    pub fn is_next_sequence(&mut self, values: &[T], advance_past: bool) -> bool {
        let unread = self.unread_span();
        let matched = if unread.len() >= values.len() {
            unread.starts_with(values)
        } else {
            self.probe_matches(values)
        };
        if matched && advance_past {
            self.advance(values.len());
        }
        matched
    }

    #[cold]
    fn probe_matches(&self, values: &[T]) -> bool {
        let Some(&seed) = values.first() else {
            return true;
        };
        if self.remaining() < values.len() {
            return false;
        }
        if values.len() <= PROBE_STACK_LEN {
            let mut scratch = [seed; PROBE_STACK_LEN];
            self.peek(&mut scratch[..values.len()]) == values
        } else {
            trace!("probing {} elements through a heap buffer", values.len());
            let mut scratch = vec![seed; values.len()];
            self.peek(&mut scratch) == values
        }
    }
}
