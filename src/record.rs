//! Record builders layered on the tokenizer.
//!
//! Two shapes are offered, both thin adapters over [`Parser::parse_line`]:
//!
//! - [`Mapping`]: label → value, one entry per label. A repeated label
//!   overwrites the earlier value (last write wins). Labels and values are
//!   **copied** into owned `String`s, so the record outlives the line buffer.
//! - `Vec<Field<'a>>`: every field in input order, duplicates kept. Fields
//!   **borrow** from the line, so the line must outlive the record. Use
//!   [`Field::to_owned_field`] to detach one.
//!
//! ## Buffer reuse
//!
//! Both builders accept a caller-owned buffer to avoid an allocation per
//! line, with deliberately different semantics:
//!
//! - [`Parser::parse_line_as_map`] does **not** clear the map. Entries from an
//!   earlier line survive unless the new line overwrites them. Use
//!   [`Parser::parse_line_as_map_cleared`] when stale labels must not leak
//!   from one record into the next.
//! - [`Parser::parse_line_as_fields`] always truncates the vector first
//!   (capacity is kept).
//!
//! ```rust
//! use ltsv::Parser;
//!
//! let parser = Parser::default();
//! let map = parser.parse_line_as_map(b"a:1\tb:2", None).unwrap();
//! let map = parser.parse_line_as_map(b"a:3", Some(map)).unwrap();
//! assert_eq!(map["a"], "3");
//! assert_eq!(map["b"], "2"); // left over from the previous line
//! ```
//!
//! Label and value bytes are decoded with [`String::from_utf8_lossy`] when a
//! `Mapping` is built; ASCII and UTF-8 input passes through unchanged.

use crate::error::LineError;
use crate::Parser;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;

/// An LTSV record keyed by label. Iteration follows first-insertion order,
/// which carries no meaning beyond making output deterministic.
pub type Mapping = IndexMap<String, String>;

/// One `label:value` pair borrowed from a line.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field<'a> {
    pub label: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> Field<'a> {
    #[must_use]
    pub const fn new(label: &'a [u8], value: &'a [u8]) -> Self {
        Field { label, value }
    }

    /// The label as `&str`, if it is valid UTF-8 (always true in strict mode).
    #[must_use]
    pub fn label_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.label).ok()
    }

    #[must_use]
    pub fn value_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.value).ok()
    }

    /// Copies both halves into an [`OwnedField`].
    #[must_use]
    pub fn to_owned_field(&self) -> OwnedField {
        OwnedField {
            label: String::from_utf8_lossy(self.label).into_owned(),
            value: String::from_utf8_lossy(self.value).into_owned(),
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("label", &String::from_utf8_lossy(self.label))
            .field("value", &String::from_utf8_lossy(self.value))
            .finish()
    }
}

/// A `label:value` pair detached from its line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedField {
    pub label: String,
    pub value: String,
}

impl OwnedField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        OwnedField {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<Field<'_>> for OwnedField {
    fn from(field: Field<'_>) -> Self {
        field.to_owned_field()
    }
}

impl Parser {
    /// Parses a line into a [`Mapping`].
    ///
    /// With `record = None` a fresh map is returned. With `Some(map)` the
    /// fields are written into `map` **without clearing it first** and the
    /// same map is handed back.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] for the first malformed field; the supplied
    /// map is dropped. Use [`Parser::fill_map`] to keep it on failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Parser;
    ///
    /// let map = Parser::default()
    ///     .parse_line_as_map(b"host:127.0.0.1\tuser:frank", None)
    ///     .unwrap();
    /// assert_eq!(map["host"], "127.0.0.1");
    /// assert_eq!(map["user"], "frank");
    /// ```
    pub fn parse_line_as_map(
        &self,
        line: &[u8],
        record: Option<Mapping>,
    ) -> Result<Mapping, LineError> {
        let mut map = record.unwrap_or_default();
        self.fill_map(line, &mut map)?;
        Ok(map)
    }

    /// Parses a line into `record`, keeping entries the line does not
    /// overwrite. This is the in-place form of [`Parser::parse_line_as_map`].
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] for the first malformed field.
    pub fn fill_map(&self, line: &[u8], record: &mut Mapping) -> Result<(), LineError> {
        self.parse_line(line, |label, value| {
            record.insert(
                String::from_utf8_lossy(label).into_owned(),
                String::from_utf8_lossy(value).into_owned(),
            );
            ControlFlow::Continue(())
        })
    }

    /// Clears `record`, then parses `line` into it.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] for the first malformed field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Parser;
    ///
    /// let parser = Parser::default();
    /// let mut map = parser.parse_line_as_map(b"a:1\tb:2", None).unwrap();
    /// parser.parse_line_as_map_cleared(b"a:3", &mut map).unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn parse_line_as_map_cleared(
        &self,
        line: &[u8],
        record: &mut Mapping,
    ) -> Result<(), LineError> {
        record.clear();
        self.fill_map(line, record)
    }

    /// Parses a line into its fields, in order, duplicates included.
    ///
    /// A supplied vector is truncated to empty before use; its capacity is
    /// kept. The fields borrow from `line`.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] for the first malformed field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Parser;
    ///
    /// let fields = Parser::default().parse_line_as_fields(b"a:1\ta:2", None).unwrap();
    /// assert_eq!(fields.len(), 2);
    /// assert_eq!(fields[1].value, b"2");
    /// ```
    pub fn parse_line_as_fields<'a>(
        &self,
        line: &'a [u8],
        record: Option<Vec<Field<'a>>>,
    ) -> Result<Vec<Field<'a>>, LineError> {
        let mut fields = record.unwrap_or_default();
        fields.clear();
        self.parse_line(line, |label, value| {
            fields.push(Field::new(label, value));
            ControlFlow::Continue(())
        })?;
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldErrorKind, ParserOptions};

    #[test]
    fn test_map_last_write_wins() {
        let map = Parser::default()
            .parse_line_as_map(b"a:1\tb:2\ta:3", None)
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "3");
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_map_reuse_keeps_stale_entries() {
        let parser = Parser::default();
        let mut map = Mapping::new();
        map.insert("stale".to_string(), "x".to_string());
        let map = parser.parse_line_as_map(b"a:1", Some(map)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["stale"], "x");
        assert_eq!(map["a"], "1");
    }

    #[test]
    fn test_fill_map_partial_on_error() {
        let mut map = Mapping::new();
        let err = Parser::default()
            .fill_map(b"a:1\tb\tc:3", &mut map)
            .unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::MissingLabel);
        assert_eq!(map.len(), 1);
        assert!(map.get("c").is_none());
    }

    #[test]
    fn test_cleared_variant() {
        let parser = Parser::default();
        let mut map = parser.parse_line_as_map(b"a:1\tb:2", None).unwrap();
        parser.parse_line_as_map_cleared(b"c:3", &mut map).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_fields_keep_duplicates_and_order() {
        let fields = Parser::default()
            .parse_line_as_fields(b"b:2\ta:1\tb:3", None)
            .unwrap();
        let pairs: Vec<(&[u8], &[u8])> = fields.iter().map(|f| (f.label, f.value)).collect();
        assert_eq!(
            pairs,
            vec![
                (&b"b"[..], &b"2"[..]),
                (&b"a"[..], &b"1"[..]),
                (&b"b"[..], &b"3"[..])
            ]
        );
    }

    #[test]
    fn test_fields_buffer_is_truncated_but_keeps_capacity() {
        let parser = Parser::default();
        let first = parser
            .parse_line_as_fields(b"a:1\tb:2\tc:3\td:4", None)
            .unwrap();
        let capacity = first.capacity();
        let second = parser.parse_line_as_fields(b"e:5", Some(first)).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].label, b"e");
        assert!(second.capacity() >= capacity);
    }

    #[test]
    fn test_lenient_map_decodes_lossily() {
        let parser = Parser::new(ParserOptions::lenient());
        let map = parser.parse_line_as_map(b"k:\xff\rv", None).unwrap();
        assert_eq!(map["k"], "\u{fffd}\rv");
    }

    #[test]
    fn test_field_conversions() {
        let field = Field::new(b"ua", "Mozilla/4.08 \u{3042}".as_bytes());
        assert_eq!(field.label_str(), Some("ua"));
        assert_eq!(field.value_str(), Some("Mozilla/4.08 \u{3042}"));
        assert_eq!(
            OwnedField::from(field),
            OwnedField::new("ua", "Mozilla/4.08 \u{3042}")
        );
        assert_eq!(Field::new(b"x", b"\xff").value_str(), None);
        assert!(format!("{:?}", field).contains("label: \"ua\""));
    }
}
