use alloc::{borrow::Cow, vec::Vec};
use core::fmt;

use crate::sequence::Sequence;

/// The content located by a cursor search or a reader token.
///
/// - `Borrowed`: the content lies in one span and is returned as a view into
///   it.
/// - `Segmented`: the content was reached through the cross-segment path. No
///   bytes are copied until [`Capture::to_cow`] is asked for one contiguous
///   slice, and even then only if the content really straddles a boundary.
pub enum Capture<'a, T> {
    /// A view into one span.
    Borrowed(&'a [T]),
    /// A slice of the underlying sequence spanning several segments.
    Segmented(Sequence<'a, T>),
}

impl<T> Clone for Capture<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Capture<'_, T> {}

impl<T> Default for Capture<'_, T> {
    fn default() -> Self {
        Capture::Borrowed(&[])
    }
}

impl<'a, T> Capture<'a, T> {
    /// Borrows when `sequence` lies in one segment, keeps it segmented
    /// otherwise.
    #[must_use]
    pub fn from_sequence(sequence: Sequence<'a, T>) -> Self {
        if sequence.is_single_segment() {
            Capture::Borrowed(sequence.first_span())
        } else {
            Capture::Segmented(sequence)
        }
    }

    /// Number of elements captured.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Capture::Borrowed(span) => span.len(),
            Capture::Segmented(sequence) => sequence.len(),
        }
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for the cross-segment representation.
    #[must_use]
    pub fn is_segmented(&self) -> bool {
        matches!(self, Capture::Segmented(_))
    }

    /// The content as one slice, if that is possible without copying.
    #[must_use]
    pub fn as_slice(&self) -> Option<&'a [T]> {
        match *self {
            Capture::Borrowed(span) => Some(span),
            Capture::Segmented(sequence) if sequence.is_single_segment() => {
                Some(sequence.first_span())
            }
            Capture::Segmented(_) => None,
        }
    }

    /// The content as one slice, copying only when it straddles segments.
    #[must_use]
    pub fn to_cow(&self) -> Cow<'a, [T]>
    where
        T: Clone,
    {
        if let Some(span) = self.as_slice() {
            return Cow::Borrowed(span);
        }
        Cow::Owned(match self {
            Capture::Borrowed(span) => span.to_vec(),
            Capture::Segmented(sequence) => sequence.to_vec(),
        })
    }

    /// Copies the content into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.to_cow().into_owned()
    }

    /// Iterates over the captured elements.
    pub fn iter(&self) -> impl Iterator<Item = T> + use<'a, T>
    where
        T: Copy,
    {
        let (span, sequence) = match *self {
            Capture::Borrowed(span) => (span, Sequence::default()),
            Capture::Segmented(sequence) => (&[][..], sequence),
        };
        span.iter().copied().chain(sequence.iter())
    }
}

impl<T: Copy + PartialEq> PartialEq for Capture<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Copy + PartialEq> PartialEq<[T]> for Capture<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter().copied())
    }
}

impl<T: Copy + PartialEq, const N: usize> PartialEq<[T; N]> for Capture<'_, T> {
    fn eq(&self, other: &[T; N]) -> bool {
        *self == other[..]
    }
}

impl<T: fmt::Debug> fmt::Debug for Capture<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capture::Borrowed(span) => f.debug_tuple("Borrowed").field(span).finish(),
            Capture::Segmented(sequence) => f.debug_tuple("Segmented").field(sequence).finish(),
        }
    }
}
