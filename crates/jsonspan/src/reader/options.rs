use super::error::ConfigError;

/// Maximum nesting depth used by [`ReaderOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration options for the JSON reader.
///
/// # Default
///
/// A maximum depth of [`DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReaderOptions {
    /// Sets the maximum number of nested objects and arrays.
    ///
    /// A document nested exactly `max_depth` levels deep is accepted; opening
    /// one more container is a syntax error raised at its opening byte.
    ///
    /// ```rust
    /// use jsonspan::{ConfigError, ReaderOptions};
    ///
    /// let options = ReaderOptions::default().with_max_depth(2)?;
    /// assert_eq!(options.max_depth(), 2);
    /// assert_eq!(
    ///     ReaderOptions::default().with_max_depth(0),
    ///     Err(ConfigError::InvalidMaxDepth(0))
    /// );
    /// # Ok::<(), ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxDepth`] if `max_depth` is zero.
    ///
    /// # Default
    ///
    /// `64`
    pub fn with_max_depth(self, max_depth: usize) -> Result<Self, ConfigError> {
        if max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(max_depth));
        }
        Ok(Self { max_depth })
    }

    /// The configured maximum nesting depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
