//! Error types for LTSV parsing, reading and writing.
//!
//! Errors are layered the same way the input is:
//!
//! - [`FieldError`]: one `label:value` field is malformed (carries the raw field)
//! - [`LineError`]: wraps a [`FieldError`] with the raw line it came from
//! - [`Error`]: crate-level error; reader failures add the 1-based line number
//!
//! Each layer keeps the one below it as its [`source`](std::error::Error::source),
//! and typed accessors let callers test the root cause without string matching.
//!
//! ## Examples
//!
//! ```rust
//! use ltsv::{FieldErrorKind, Reader};
//!
//! let mut reader = Reader::new("a:1\nnot a field\n".as_bytes());
//! assert!(reader.read().unwrap().is_some());
//!
//! let err = reader.read().unwrap_err();
//! assert_eq!(err.line_number(), Some(2));
//! assert_eq!(err.kind(), Some(FieldErrorKind::MissingLabel));
//! ```

use crate::Mapping;
use std::borrow::Cow;
use std::{fmt, io};
use thiserror::Error;

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// The root-cause category of a [`FieldError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    MissingLabel,
    EmptyLabel,
    InvalidLabel,
    InvalidValue,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldErrorKind::MissingLabel => "missing label",
            FieldErrorKind::EmptyLabel => "empty label",
            FieldErrorKind::InvalidLabel => "invalid label",
            FieldErrorKind::InvalidValue => "invalid value",
        })
    }
}

/// A single field failed to parse.
///
/// `field` holds the raw bytes of the offending field (not the whole line).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field contains no value delimiter.
    #[error("missing label: no value delimiter in field {:?}", lossy(.field))]
    MissingLabel { field: Vec<u8> },

    /// The value delimiter is the first byte of the field.
    #[error("empty label in field {:?}", lossy(.field))]
    EmptyLabel { field: Vec<u8> },

    /// Strict mode: the label contains a byte outside `[0-9A-Za-z_.-]`.
    #[error("invalid byte {byte:#04x} in label of field {:?}", lossy(.field))]
    InvalidLabel { byte: u8, field: Vec<u8> },

    /// Strict mode: the value contains backspace, tab, CR or LF.
    #[error("invalid byte {byte:#04x} in value of field {:?}", lossy(.field))]
    InvalidValue { byte: u8, field: Vec<u8> },
}

impl FieldError {
    #[must_use]
    pub fn kind(&self) -> FieldErrorKind {
        match self {
            FieldError::MissingLabel { .. } => FieldErrorKind::MissingLabel,
            FieldError::EmptyLabel { .. } => FieldErrorKind::EmptyLabel,
            FieldError::InvalidLabel { .. } => FieldErrorKind::InvalidLabel,
            FieldError::InvalidValue { .. } => FieldErrorKind::InvalidValue,
        }
    }

    /// Raw bytes of the field that failed.
    #[must_use]
    pub fn field(&self) -> &[u8] {
        match self {
            FieldError::MissingLabel { field }
            | FieldError::EmptyLabel { field }
            | FieldError::InvalidLabel { field, .. }
            | FieldError::InvalidValue { field, .. } => field,
        }
    }

    /// The byte that violated the grammar, for the two strict-mode kinds.
    #[must_use]
    pub fn byte(&self) -> Option<u8> {
        match self {
            FieldError::InvalidLabel { byte, .. } | FieldError::InvalidValue { byte, .. } => {
                Some(*byte)
            }
            _ => None,
        }
    }
}

/// A line failed to parse because one of its fields did.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bad syntax in line {:?}: {source}", lossy(.line))]
pub struct LineError {
    line: Vec<u8>,
    #[source]
    source: FieldError,
}

impl LineError {
    pub(crate) fn new(line: &[u8], source: FieldError) -> Self {
        LineError {
            line: line.to_vec(),
            source,
        }
    }

    /// Raw bytes of the whole line.
    #[must_use]
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    #[must_use]
    pub fn field_error(&self) -> &FieldError {
        &self.source
    }

    #[must_use]
    pub fn kind(&self) -> FieldErrorKind {
        self.source.kind()
    }

    #[must_use]
    pub fn into_field_error(self) -> FieldError {
        self.source
    }
}

/// Represents all errors surfaced by this crate outside the tokenizer.
#[derive(Debug, Error)]
pub enum Error {
    /// The line source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line read from a stream failed to parse.
    #[error("bad syntax at line {line_no}: {source}")]
    Syntax {
        line_no: usize,
        #[source]
        source: LineError,
    },

    /// A line read from a stream parsed but did not fit the target type.
    #[error("cannot deserialize line {line_no}: {source}")]
    Deserialize {
        line_no: usize,
        #[source]
        source: Box<Error>,
    },

    /// A line failed to parse outside of a reader.
    #[error(transparent)]
    Line(#[from] LineError),

    /// A label or value was rejected while writing.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A read was attempted after the line source had already failed.
    #[error("reader is unusable after an earlier I/O error")]
    ReaderFailed,

    /// A label or value is not UTF-8 where a `str` was required.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The serializer was handed a shape that has no LTSV form.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn syntax(line_no: usize, source: LineError) -> Self {
        Error::Syntax { line_no, source }
    }

    pub(crate) fn deserialize(line_no: usize, source: Error) -> Self {
        Error::Deserialize {
            line_no,
            source: Box::new(source),
        }
    }

    pub(crate) fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Walks the cause chain down to the field-level error, if there is one.
    #[must_use]
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            Error::Syntax { source, .. } | Error::Line(source) => Some(source.field_error()),
            Error::Field(err) => Some(err),
            Error::Deserialize { source, .. } => source.field_error(),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<FieldErrorKind> {
        self.field_error().map(FieldError::kind)
    }

    #[must_use]
    pub fn line_error(&self) -> Option<&LineError> {
        match self {
            Error::Syntax { source, .. } | Error::Line(source) => Some(source),
            Error::Deserialize { source, .. } => source.line_error(),
            _ => None,
        }
    }

    /// The 1-based line number, for errors raised by a [`Reader`](crate::Reader).
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Error::Syntax { line_no, .. } | Error::Deserialize { line_no, .. } => Some(*line_no),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

/// [`Reader::read_all`](crate::Reader::read_all) stopped early.
///
/// The records parsed before the failure are kept, not discarded.
#[derive(Debug, Error)]
#[error("stopped after {} records: {source}", .records.len())]
pub struct ReadAllError {
    records: Vec<Mapping>,
    #[source]
    source: Error,
}

impl ReadAllError {
    pub(crate) fn new(records: Vec<Mapping>, source: Error) -> Self {
        ReadAllError { records, source }
    }

    /// Records successfully parsed before the failure, in input order.
    #[must_use]
    pub fn records(&self) -> &[Mapping] {
        &self.records
    }

    #[must_use]
    pub fn error(&self) -> &Error {
        &self.source
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Mapping>, Error) {
        (self.records, self.source)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
