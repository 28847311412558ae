//! Segment sequences: one logical stream of elements stored as a chain of
//! disjoint, immutable spans.
//!
//! Overview
//! - [`SegmentList`] owns the chain (a `Vec` of borrowed spans plus the running
//!   element count before each span). It is built once and never mutated
//!   while a [`Sequence`] borrows it.
//! - [`Sequence`] is a `Copy` view over either a single contiguous span or a
//!   `SegmentList`, bounded by a start and an end [`SequencePosition`].
//!   Slicing a sequence never copies elements.
//!
//! Invariants
//! - Positions are only meaningful against the sequence (or a slice of the
//!   sequence) that produced them.
//! - Every `Sequence` keeps its bounds canonical: the start never sits at the
//!   end of a segment that is followed by more content, and the end never
//!   sits at offset 0 of a later segment. `is_single_segment()` is therefore
//!   exact: it reports whether the content truly lies in one segment.

use alloc::vec::Vec;
use core::fmt;

/// Names a location inside a [`Sequence`]: a segment index plus an offset
/// within that segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SequencePosition {
    segment: usize,
    offset: usize,
}

impl SequencePosition {
    /// Creates a position from a segment index and an offset in that segment.
    #[must_use]
    pub const fn new(segment: usize, offset: usize) -> Self {
        Self { segment, offset }
    }

    /// Index of the segment this position points into.
    #[must_use]
    pub const fn segment(self) -> usize {
        self.segment
    }

    /// Offset of this position inside its segment.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }
}

/// One contiguous block of a [`SegmentList`].
#[derive(Debug, PartialEq, Eq)]
pub struct Segment<'a, T> {
    memory: &'a [T],
    running_index: usize,
}

impl<T> Clone for Segment<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Segment<'_, T> {}

impl<'a, T> Segment<'a, T> {
    /// The elements stored in this segment.
    #[must_use]
    pub fn memory(&self) -> &'a [T] {
        self.memory
    }

    /// Number of elements in all segments before this one.
    #[must_use]
    pub fn running_index(&self) -> usize {
        self.running_index
    }
}

/// An ordered chain of borrowed spans forming one logical stream.
///
/// ```rust
/// use jsonspan::{SegmentList, Sequence};
///
/// let list: SegmentList<'_, u8> = [&b"{\"a\""[..], &b":1}"[..]].into_iter().collect();
/// let sequence = Sequence::from_segments(&list);
/// assert_eq!(sequence.len(), 7);
/// assert!(!sequence.is_single_segment());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentList<'a, T> {
    segments: Vec<Segment<'a, T>>,
    len: usize,
}

impl<T> Default for SegmentList<'_, T> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            len: 0,
        }
    }
}

impl<'a, T> SegmentList<'a, T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a span to the end of the chain. Empty spans are kept; the
    /// cursor steps over them.
    pub fn push(&mut self, memory: &'a [T]) {
        self.segments.push(Segment {
            memory,
            running_index: self.len,
        });
        self.len += memory.len();
    }

    /// Total number of elements across all segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The segments in stream order.
    #[must_use]
    pub fn segments(&self) -> &[Segment<'a, T>] {
        &self.segments
    }

    /// A sequence spanning the whole chain.
    #[must_use]
    pub fn as_sequence(&self) -> Sequence<'_, T> {
        Sequence::from_segments(self)
    }
}

impl<'a, T> FromIterator<&'a [T]> for SegmentList<'a, T> {
    fn from_iter<I: IntoIterator<Item = &'a [T]>>(iter: I) -> Self {
        let mut list = SegmentList::new();
        for memory in iter {
            list.push(memory);
        }
        list
    }
}

enum Repr<'a, T> {
    Single(&'a [T]),
    Chain(&'a [Segment<'a, T>]),
}

impl<T> Clone for Repr<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Repr<'_, T> {}

/// A read-only, `Copy` view over a contiguous span or a segment chain.
pub struct Sequence<'a, T> {
    repr: Repr<'a, T>,
    start: SequencePosition,
    end: SequencePosition,
}

impl<T> Clone for Sequence<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Sequence<'_, T> {}

impl<T> Default for Sequence<'_, T> {
    fn default() -> Self {
        Sequence::from_slice(&[])
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("spans", &self.spans().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> Sequence<'a, T> {
    /// A sequence over one contiguous span.
    #[must_use]
    pub fn from_slice(memory: &'a [T]) -> Self {
        Self {
            repr: Repr::Single(memory),
            start: SequencePosition::new(0, 0),
            end: SequencePosition::new(0, memory.len()),
        }
    }

    /// A sequence over every segment of `list`.
    #[must_use]
    pub fn from_segments(list: &'a SegmentList<'a, T>) -> Self {
        let segments = list.segments();
        let Some(last) = segments.last() else {
            return Self::from_slice(&[]);
        };
        Self::canonical(
            Repr::Chain(segments),
            SequencePosition::new(0, 0),
            SequencePosition::new(segments.len() - 1, last.memory.len()),
        )
    }

    fn canonical(repr: Repr<'a, T>, mut start: SequencePosition, mut end: SequencePosition) -> Self {
        let this = Self { repr, start, end };
        while start.segment < end.segment && start.offset == this.raw_segment(start.segment).len() {
            start = SequencePosition::new(start.segment + 1, 0);
        }
        while end.segment > start.segment && end.offset == 0 {
            let previous = end.segment - 1;
            end = SequencePosition::new(previous, this.raw_segment(previous).len());
        }
        Self { repr, start, end }
    }

    fn raw_segment(&self, index: usize) -> &'a [T] {
        match self.repr {
            Repr::Single(memory) => memory,
            Repr::Chain(segments) => segments[index].memory,
        }
    }

    /// Returns the portion of segment `index` inside the bounds, with the
    /// offset of that portion within the segment.
    pub(crate) fn span_at(&self, index: usize) -> (usize, &'a [T]) {
        let memory = self.raw_segment(index);
        let lo = if index == self.start.segment {
            self.start.offset
        } else {
            0
        };
        let hi = if index == self.end.segment {
            self.end.offset
        } else {
            memory.len()
        };
        (lo, &memory[lo..hi])
    }

    /// Absolute element offset of `position` from the beginning of the
    /// underlying buffer or chain.
    #[must_use]
    pub fn offset_of(&self, position: SequencePosition) -> usize {
        match self.repr {
            Repr::Single(_) => position.offset,
            Repr::Chain(segments) => segments[position.segment].running_index + position.offset,
        }
    }

    /// Number of elements between start and end.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offset_of(self.end) - self.offset_of(self.start)
    }

    /// Returns `true` if the sequence holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if all content lies in one segment.
    #[must_use]
    pub fn is_single_segment(&self) -> bool {
        self.start.segment == self.end.segment
    }

    /// The first (possibly only) span of content.
    #[must_use]
    pub fn first_span(&self) -> &'a [T] {
        self.span_at(self.start.segment).1
    }

    /// Position of the first element.
    #[must_use]
    pub fn start(&self) -> SequencePosition {
        self.start
    }

    /// Position just past the last element.
    #[must_use]
    pub fn end(&self) -> SequencePosition {
        self.end
    }

    /// The elements between `start` (inclusive) and `end` (exclusive).
    ///
    /// Both positions must come from this sequence, with `start <= end`.
    #[must_use]
    pub fn slice(&self, start: SequencePosition, end: SequencePosition) -> Self {
        debug_assert!(self.start <= start && start <= end && end <= self.end);
        Self::canonical(self.repr, start, end)
    }

    /// The elements from `start` to the end of this sequence.
    #[must_use]
    pub fn slice_from(&self, start: SequencePosition) -> Self {
        self.slice(start, self.end)
    }

    /// Iterates over the non-empty spans in order.
    #[must_use]
    pub fn spans(&self) -> Spans<'a, T> {
        Spans {
            sequence: *self,
            next: self.start.segment,
        }
    }

    /// Iterates over every element.
    pub fn iter(&self) -> impl Iterator<Item = T> + use<'a, T>
    where
        T: Copy,
    {
        self.spans().flat_map(|span| span.iter().copied())
    }

    /// Copies the content into one contiguous vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        for span in self.spans() {
            out.extend_from_slice(span);
        }
        out
    }
}

/// Iterator over the non-empty spans of a [`Sequence`].
pub struct Spans<'a, T> {
    sequence: Sequence<'a, T>,
    next: usize,
}

impl<'a, T> Iterator for Spans<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        while self.next <= self.sequence.end.segment {
            let (_, span) = self.sequence.span_at(self.next);
            self.next += 1;
            if !span.is_empty() {
                return Some(span);
            }
        }
        None
    }
}
