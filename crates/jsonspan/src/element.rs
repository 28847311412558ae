//! Search primitives for the element types a [`Cursor`](crate::Cursor) can scan.
//!
//! Every method has a portable default built on slice iteration. `u8`
//! overrides them with the vectorized `memchr` family, which is what the JSON
//! reader runs on.

use core::fmt;

/// A fixed-width, equality-comparable element stored in a segment.
pub trait Element: Copy + Eq + fmt::Debug {
    /// Index of the first `needle` in `haystack`.
    #[inline]
    fn find(haystack: &[Self], needle: Self) -> Option<usize> {
        haystack.iter().position(|&e| e == needle)
    }

    /// Index of the first element equal to `a` or `b`.
    #[inline]
    fn find2(haystack: &[Self], a: Self, b: Self) -> Option<usize> {
        haystack.iter().position(|&e| e == a || e == b)
    }

    /// Index of the first element equal to `a`, `b` or `c`.
    #[inline]
    fn find3(haystack: &[Self], a: Self, b: Self, c: Self) -> Option<usize> {
        haystack.iter().position(|&e| e == a || e == b || e == c)
    }

    /// Index of the first element contained in `needles`.
    #[inline]
    fn find_any(haystack: &[Self], needles: &[Self]) -> Option<usize> {
        haystack.iter().position(|e| needles.contains(e))
    }
}

impl Element for u8 {
    #[inline]
    fn find(haystack: &[Self], needle: Self) -> Option<usize> {
        memchr::memchr(needle, haystack)
    }

    #[inline]
    fn find2(haystack: &[Self], a: Self, b: Self) -> Option<usize> {
        memchr::memchr2(a, b, haystack)
    }

    #[inline]
    fn find3(haystack: &[Self], a: Self, b: Self, c: Self) -> Option<usize> {
        memchr::memchr3(a, b, c, haystack)
    }

    #[inline]
    fn find_any(haystack: &[Self], needles: &[Self]) -> Option<usize> {
        match *needles {
            [] => None,
            [a] => memchr::memchr(a, haystack),
            [a, b] => memchr::memchr2(a, b, haystack),
            [a, b, c] => memchr::memchr3(a, b, c, haystack),
            _ => haystack.iter().position(|e| needles.contains(e)),
        }
    }
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(impl Element for $ty {})*
    };
}

impl_element!(i8, u16, i16, u32, i32, u64, i64, char);

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn byte_search_matches_portable_search() {
        let haystack = b"abc\"def\\ghi";
        assert_eq!(u8::find(haystack, b'"'), Some(3));
        assert_eq!(u8::find2(haystack, b'\\', b'"'), Some(3));
        assert_eq!(u8::find3(haystack, b'x', b'y', b'i'), Some(10));
        assert_eq!(u8::find_any(haystack, b"hg"), Some(8));
        assert_eq!(u8::find_any(haystack, b""), None);
    }

    #[test]
    fn wide_elements_use_defaults() {
        let haystack: &[u16] = &[1, 2, 3, 4];
        assert_eq!(u16::find(haystack, 3), Some(2));
        assert_eq!(u16::find2(haystack, 9, 4), Some(3));
        assert_eq!(u16::find_any(haystack, &[7, 8, 2, 9]), Some(1));
        assert_eq!(char::find(&['a', 'b'], 'c'), None);
    }
}
