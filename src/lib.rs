//! # ltsv
//!
//! A parser, reader and writer for LTSV (Labeled Tab-Separated Values), with
//! Serde support.
//!
//! ## What is LTSV?
//!
//! LTSV is a line-oriented log format: each line is a record made of
//! `label:value` fields separated by tabs.
//!
//! ```text
//! host:127.0.0.1	user:frank	status:200	size:2326
//! ```
//!
//! See [`format`] for the full grammar.
//!
//! ## Key Features
//!
//! - **Zero-copy tokenizer**: [`Parser::parse_line`] hands out slices of the
//!   input line to a per-field callback, which may stop early
//! - **Strict or lenient**: enforce the label/value charset, or split purely
//!   on delimiters
//! - **Two record shapes**: label → value [`Mapping`] (last write wins) or an
//!   ordered field list (duplicates kept)
//! - **Streaming**: [`Reader`] reads one record per line and tags errors
//!   with the line number
//! - **Serde**: [`from_line`] / [`to_string`] map records to and from structs
//!
//! ## Quick Start
//!
//! ```rust
//! use ltsv::{parse_line_as_map, FieldErrorKind};
//!
//! let record = parse_line_as_map(b"host:127.0.0.1\tuser:frank", None).unwrap();
//! assert_eq!(record["host"], "127.0.0.1");
//! assert_eq!(record["user"], "frank");
//!
//! let err = parse_line_as_map(b"abc", None).unwrap_err();
//! assert_eq!(err.kind(), FieldErrorKind::MissingLabel);
//! ```
//!
//! ### Reading a stream
//!
//! ```rust
//! use ltsv::Reader;
//! use std::io::BufReader;
//!
//! let log = "host:127.0.0.1\tstatus:200\nhost:10.0.0.7\tstatus:500\n";
//! let records = Reader::new(BufReader::new(log.as_bytes())).read_all().unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1]["status"], "500");
//! ```
//!
//! ### Typed records
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Access {
//!     host: String,
//!     status: u16,
//! }
//!
//! let access: Access = ltsv::from_line(b"host:127.0.0.1\tstatus:200").unwrap();
//! assert_eq!(access.status, 200);
//! assert_eq!(ltsv::to_string(&access).unwrap(), "host:127.0.0.1\tstatus:200");
//! ```
//!
//! ## Buffer reuse
//!
//! [`parse_line_as_map`] writes into a caller-supplied map **without clearing
//! it**; see [`record`] for the exact contract and the clearing variant.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Errors are structured values; the root cause stays inspectable through
//!   every layer of wrapping
//! - Parsers are immutable and may be shared across threads; a [`Reader`]
//!   or reused buffer belongs to one caller at a time

pub mod de;
pub mod error;
pub mod format;
pub mod grammar;
pub mod macros;
pub mod options;
pub mod parser;
pub mod reader;
pub mod record;
pub mod ser;
pub mod writer;

pub use de::{from_line, from_line_with, from_str};
pub use error::{Error, FieldError, FieldErrorKind, LineError, ReadAllError, Result};
pub use options::ParserOptions;
pub use parser::{Fields, Parser, DEFAULT_PARSER};
pub use reader::{BufLines, LineSource, Reader, ReaderState};
pub use record::{Field, Mapping, OwnedField};
pub use ser::{to_string, to_string_with_options, Serializer};
pub use writer::Writer;

use std::ops::ControlFlow;

/// Splits one field with the canonical strict parser.
///
/// # Errors
///
/// See [`Parser::parse_field`].
pub fn parse_field(field: &[u8]) -> std::result::Result<Field<'_>, FieldError> {
    DEFAULT_PARSER.parse_field(field)
}

/// Parses one line with the canonical strict parser, calling `on_field` for
/// each field.
///
/// # Errors
///
/// See [`Parser::parse_line`].
pub fn parse_line<'a, F>(line: &'a [u8], on_field: F) -> std::result::Result<(), LineError>
where
    F: FnMut(&'a [u8], &'a [u8]) -> ControlFlow<()>,
{
    DEFAULT_PARSER.parse_line(line, on_field)
}

/// Parses one line into a [`Mapping`] with the canonical strict parser.
///
/// A supplied map is reused **without being cleared**.
///
/// # Errors
///
/// See [`Parser::parse_line_as_map`].
pub fn parse_line_as_map(
    line: &[u8],
    record: Option<Mapping>,
) -> std::result::Result<Mapping, LineError> {
    DEFAULT_PARSER.parse_line_as_map(line, record)
}

/// Parses one line into an ordered field list with the canonical strict
/// parser. A supplied vector is truncated first.
///
/// # Errors
///
/// See [`Parser::parse_line_as_fields`].
pub fn parse_line_as_fields<'a>(
    line: &'a [u8],
    record: Option<Vec<Field<'a>>>,
) -> std::result::Result<Vec<Field<'a>>, LineError> {
    DEFAULT_PARSER.parse_line_as_fields(line, record)
}
