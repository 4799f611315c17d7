//! The LTSV field and line tokenizer.
//!
//! A line is split on the field delimiter; empty segments (from leading,
//! trailing or doubled delimiters) are skipped. Every remaining segment is
//! split at its *first* value delimiter into a label and a value, and in
//! strict mode both halves are checked against the [grammar](crate::grammar),
//! label first.
//!
//! The tokenizer never copies: labels and values are sub-slices of the input
//! line. Deciding whether to copy is left to the record builders in
//! [`record`](crate::record).
//!
//! ## Usage
//!
//! ```rust
//! use ltsv::Parser;
//! use std::ops::ControlFlow;
//!
//! let parser = Parser::default();
//! let mut labels = Vec::new();
//! parser
//!     .parse_line(b"host:127.0.0.1\tuser:frank", |label, _value| {
//!         labels.push(label);
//!         ControlFlow::Continue(())
//!     })
//!     .unwrap();
//! assert_eq!(labels, vec![&b"host"[..], &b"user"[..]]);
//! ```

use crate::error::{FieldError, LineError};
use crate::grammar::{first_invalid_label_byte, first_invalid_value_byte};
use crate::record::Field;
use crate::ParserOptions;
use std::iter::FusedIterator;
use std::ops::ControlFlow;

/// Parser with the canonical configuration (tab, colon, strict).
pub const DEFAULT_PARSER: Parser = Parser::new(ParserOptions::new());

/// An LTSV tokenizer bound to one immutable [`ParserOptions`].
///
/// `Parser` holds no per-call state, so a single value can be shared freely,
/// including across threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    #[must_use]
    pub const fn new(options: ParserOptions) -> Self {
        Parser { options }
    }

    /// Canonical delimiters, grammar checks off.
    #[must_use]
    pub const fn lenient() -> Self {
        Parser::new(ParserOptions::lenient())
    }

    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.options.strict
    }

    /// Splits one field at its first value delimiter.
    ///
    /// The returned label and value borrow from `field`. The value may be
    /// empty; the label never is.
    ///
    /// # Errors
    ///
    /// - [`FieldError::MissingLabel`] if there is no value delimiter
    /// - [`FieldError::EmptyLabel`] if the delimiter is the first byte
    /// - [`FieldError::InvalidLabel`] / [`FieldError::InvalidValue`] in strict
    ///   mode, for the first offending byte (label checked before value)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::{FieldError, Parser};
    ///
    /// let field = Parser::default().parse_field(b"time:[10/Oct/2000:13:55:36 -0700]").unwrap();
    /// assert_eq!(field.label, b"time");
    /// assert_eq!(field.value, b"[10/Oct/2000:13:55:36 -0700]");
    ///
    /// let err = Parser::default().parse_field(b":value").unwrap_err();
    /// assert!(matches!(err, FieldError::EmptyLabel { .. }));
    /// ```
    pub fn parse_field<'a>(&self, field: &'a [u8]) -> Result<Field<'a>, FieldError> {
        let delimiter = self.options.value_delimiter;
        let Some(pos) = field.iter().position(|&b| b == delimiter) else {
            return Err(FieldError::MissingLabel {
                field: field.to_vec(),
            });
        };
        if pos == 0 {
            return Err(FieldError::EmptyLabel {
                field: field.to_vec(),
            });
        }

        let label = &field[..pos];
        let value = &field[pos + 1..];

        if self.options.strict {
            if let Some(byte) = first_invalid_label_byte(label) {
                return Err(FieldError::InvalidLabel {
                    byte,
                    field: field.to_vec(),
                });
            }
            if let Some(byte) = first_invalid_value_byte(value) {
                return Err(FieldError::InvalidValue {
                    byte,
                    field: field.to_vec(),
                });
            }
        }

        Ok(Field::new(label, value))
    }

    /// Parses one line, handing each field to `on_field` in order.
    ///
    /// Returning [`ControlFlow::Break`] from the callback stops the parse
    /// immediately; the rest of the line is not examined and no error is
    /// reported. A line with no non-empty segments calls `on_field` zero
    /// times and succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] wrapping the first [`FieldError`]. Fields
    /// before the failing one have already been passed to `on_field`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Parser;
    /// use std::ops::ControlFlow;
    ///
    /// // Stop at the first field
    /// let mut seen = 0;
    /// Parser::default()
    ///     .parse_line(b"a:1\tb:2\tc:3", |_, _| {
    ///         seen += 1;
    ///         ControlFlow::Break(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(seen, 1);
    /// ```
    pub fn parse_line<'a, F>(&self, line: &'a [u8], mut on_field: F) -> Result<(), LineError>
    where
        F: FnMut(&'a [u8], &'a [u8]) -> ControlFlow<()>,
    {
        for field in self.fields(line) {
            let field = field?;
            if on_field(field.label, field.value).is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Returns an iterator over the fields of `line`.
    ///
    /// The iterator yields at most one error and is fused afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Parser;
    ///
    /// let labels: Vec<_> = Parser::default()
    ///     .fields(b"\ta:1\t\tb:2\t")
    ///     .map(|f| f.unwrap().label)
    ///     .collect();
    /// assert_eq!(labels, vec![&b"a"[..], &b"b"[..]]);
    /// ```
    #[must_use]
    pub fn fields<'a>(&self, line: &'a [u8]) -> Fields<'a> {
        Fields {
            parser: *self,
            line,
            rest: Some(line),
        }
    }
}

/// Iterator over the fields of one line, created by [`Parser::fields`].
#[derive(Clone, Debug)]
pub struct Fields<'a> {
    parser: Parser,
    line: &'a [u8],
    rest: Option<&'a [u8]>,
}

impl<'a> Fields<'a> {
    fn next_segment(&mut self) -> Option<&'a [u8]> {
        let delimiter = self.parser.options.field_delimiter;
        loop {
            let rest = self.rest?;
            let segment = match rest.iter().position(|&b| b == delimiter) {
                Some(i) => {
                    self.rest = Some(&rest[i + 1..]);
                    &rest[..i]
                }
                None => {
                    self.rest = None;
                    rest
                }
            };
            if !segment.is_empty() {
                return Some(segment);
            }
        }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = Result<Field<'a>, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.next_segment()?;
        match self.parser.parse_field(segment) {
            Ok(field) => Some(Ok(field)),
            Err(err) => {
                self.rest = None;
                Some(Err(LineError::new(self.line, err)))
            }
        }
    }
}

impl FusedIterator for Fields<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldErrorKind;

    fn collect(parser: &Parser, line: &[u8]) -> Result<Vec<(String, String)>, LineError> {
        let mut out = Vec::new();
        parser.parse_line(line, |label, value| {
            out.push((
                String::from_utf8_lossy(label).into_owned(),
                String::from_utf8_lossy(value).into_owned(),
            ));
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }

    #[test]
    fn test_parse_field_cases() {
        let parser = Parser::default();
        let cases: &[(&[u8], &[u8], &[u8])] = &[
            (b"abc:123", b"abc", b"123"),
            (b"a:1", b"a", b"1"),
            (b"abc:", b"abc", b""),
            (b"time:13:55:36", b"time", b"13:55:36"),
        ];
        for (input, label, value) in cases {
            let field = parser.parse_field(input).unwrap();
            assert_eq!(field.label, *label);
            assert_eq!(field.value, *value);
        }
    }

    #[test]
    fn test_parse_field_errors() {
        let parser = Parser::default();
        let cases: &[(&[u8], FieldErrorKind)] = &[
            (b"", FieldErrorKind::MissingLabel),
            (b"abc", FieldErrorKind::MissingLabel),
            (b":123", FieldErrorKind::EmptyLabel),
            (b"a c:123", FieldErrorKind::InvalidLabel),
            (b"a:1\r", FieldErrorKind::InvalidValue),
        ];
        for (input, kind) in cases {
            let err = parser.parse_field(input).unwrap_err();
            assert_eq!(err.kind(), *kind, "input {:?}", input);
            assert_eq!(err.field(), *input);
        }
    }

    #[test]
    fn test_label_checked_before_value() {
        let err = Parser::default().parse_field(b"a b:c\rd").unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidLabel {
                byte: b' ',
                field: b"a b:c\rd".to_vec()
            }
        );
    }

    #[test]
    fn test_lenient_skips_charset_checks() {
        let parser = Parser::lenient();
        let field = parser.parse_field(b"la bel:va\rlue").unwrap();
        assert_eq!(field.label, b"la bel");
        assert_eq!(field.value, b"va\rlue");

        // Structural errors are still reported
        assert_eq!(
            parser.parse_field(b"novalue").unwrap_err().kind(),
            FieldErrorKind::MissingLabel
        );
        assert_eq!(
            parser.parse_field(b":x").unwrap_err().kind(),
            FieldErrorKind::EmptyLabel
        );
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let parser = Parser::default();
        assert_eq!(collect(&parser, b"").unwrap(), vec![]);
        assert_eq!(collect(&parser, b"\t\t\t").unwrap(), vec![]);
        assert_eq!(
            collect(&parser, b"\ta:1\t\tb:2\t\t").unwrap(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_line_error_wraps_field_and_line() {
        let parser = Parser::default();
        let err = collect(&parser, b"a\tc:123").unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::MissingLabel);
        assert_eq!(err.field_error().field(), b"a");
        assert_eq!(err.line(), b"a\tc:123");
    }

    #[test]
    fn test_fields_before_failure_are_delivered() {
        let mut seen = Vec::new();
        let err = Parser::default()
            .parse_line(b"a:1\tb:2\tbad\tc:3", |label, _| {
                seen.push(label.to_vec());
                ControlFlow::Continue(())
            })
            .unwrap_err();
        assert_eq!(seen, vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(err.field_error().field(), b"bad");
    }

    #[test]
    fn test_break_stops_without_error() {
        let mut seen = 0;
        // The segment after the first one is malformed but never examined
        Parser::default()
            .parse_line(b"a:1\tbroken\tc:3", |_, _| {
                seen += 1;
                ControlFlow::Break(())
            })
            .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_custom_delimiters() {
        let parser = Parser::new(
            ParserOptions::new()
                .with_field_delimiter(b',')
                .with_value_delimiter(b'='),
        );
        assert_eq!(
            collect(&parser, b"a=1,,b=x:y").unwrap(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x:y".to_string())
            ]
        );
        // Tab is no longer a separator, so strict mode rejects it inside a value
        let err = collect(&parser, b"a=1\t2").unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::InvalidValue);
    }

    #[test]
    fn test_fields_iterator_is_fused_after_error() {
        let mut fields = Parser::default().fields(b"a:1\tbad\tc:3");
        assert!(fields.next().unwrap().is_ok());
        assert!(fields.next().unwrap().is_err());
        assert!(fields.next().is_none());
        assert!(fields.next().is_none());
    }

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parser>();
    }
}
