//! Configuration options for LTSV parsing.
//!
//! [`ParserOptions`] selects the two delimiters and whether the label/value
//! grammar is enforced. Options are plain `Copy` data; build them once and
//! share them across as many lines, readers or threads as needed.
//!
//! ## Examples
//!
//! ```rust
//! use ltsv::{Parser, ParserOptions};
//!
//! // Canonical LTSV: tab between fields, colon between label and value, strict.
//! let options = ParserOptions::new();
//! assert_eq!(options.field_delimiter, b'\t');
//! assert!(options.strict);
//!
//! // Pipe-separated, lenient variant
//! let options = ParserOptions::lenient().with_field_delimiter(b'|');
//! let map = Parser::new(options).parse_line_as_map(b"a:1|b:2", None).unwrap();
//! assert_eq!(map["b"], "2");
//! ```

/// Default byte between two fields.
pub const DEFAULT_FIELD_DELIMITER: u8 = b'\t';

/// Default byte between a label and its value.
pub const DEFAULT_VALUE_DELIMITER: u8 = b':';

/// Configuration options for an LTSV [`Parser`](crate::Parser).
///
/// # Examples
///
/// ```rust
/// use ltsv::ParserOptions;
///
/// let options = ParserOptions::new()
///     .with_value_delimiter(b'=')
///     .with_strict(false);
/// assert_eq!(options.value_delimiter, b'=');
/// assert!(!options.strict);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    pub field_delimiter: u8,
    pub value_delimiter: u8,
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            value_delimiter: DEFAULT_VALUE_DELIMITER,
            strict: true,
        }
    }
}

impl ParserOptions {
    /// Creates the canonical options (tab, colon, strict).
    #[must_use]
    pub const fn new() -> Self {
        ParserOptions {
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            value_delimiter: DEFAULT_VALUE_DELIMITER,
            strict: true,
        }
    }

    /// Same as [`ParserOptions::new`], spelled out.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new()
    }

    /// Canonical delimiters with grammar checks turned off.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::ParserOptions;
    ///
    /// assert!(!ParserOptions::lenient().strict);
    /// ```
    #[must_use]
    pub const fn lenient() -> Self {
        ParserOptions {
            strict: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn with_field_delimiter(mut self, delimiter: u8) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn with_value_delimiter(mut self, delimiter: u8) -> Self {
        self.value_delimiter = delimiter;
        self
    }

    /// Enables or disables label/value grammar enforcement.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
