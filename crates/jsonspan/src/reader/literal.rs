use super::token::ValueKind;

/// One of the three JSON keyword literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    /// The literal starting with `first`, if any.
    pub(crate) fn from_first_byte(first: u8) -> Option<Self> {
        match first {
            b't' => Some(Literal::True),
            b'f' => Some(Literal::False),
            b'n' => Some(Literal::Null),
            _ => None,
        }
    }

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Literal::True => "true",
            Literal::False => "false",
            Literal::Null => "null",
        }
    }

    pub(crate) const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    pub(crate) const fn kind(self) -> ValueKind {
        match self {
            Literal::True => ValueKind::True,
            Literal::False => ValueKind::False,
            Literal::Null => ValueKind::Null,
        }
    }

    /// Index of the first byte of `found` that differs from the literal.
    ///
    /// Equals `found.len()` when `found` is a (possibly truncated) prefix.
    pub(crate) fn divergence(self, found: &[u8]) -> usize {
        self.as_bytes()
            .iter()
            .zip(found)
            .take_while(|(expected, found)| expected == found)
            .count()
    }
}
