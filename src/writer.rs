//! LTSV output.
//!
//! [`Writer`] emits one record per line: `label:value` pairs joined by the
//! field delimiter and terminated by `\n`. Every field is checked before
//! anything is written, so a rejected record leaves no partial line behind.
//!
//! In strict mode labels and values must satisfy the [grammar](crate::grammar).
//! In lenient mode only the structure is protected: labels must be non-empty
//! and free of both delimiters, values free of the field delimiter and of
//! `\r` (a trailing one would read back as a CRLF ending), and neither may
//! contain `\n`.
//!
//! ```rust
//! use ltsv::{ltsv, Writer};
//!
//! let mut writer = Writer::new(Vec::new());
//! writer.write_map(&ltsv! { "host" => "127.0.0.1", "status" => "200" }).unwrap();
//! assert_eq!(writer.into_inner(), b"host:127.0.0.1\tstatus:200\n");
//! ```

use crate::error::{FieldError, Result};
use crate::grammar::{first_invalid_label_byte, first_invalid_value_byte};
use crate::record::{Field, OwnedField};
use crate::{ser, Mapping, ParserOptions};
use serde::Serialize;
use std::io;

/// Checks that `label` and `value` would parse back as the same field.
pub(crate) fn check_field(
    options: &ParserOptions,
    label: &[u8],
    value: &[u8],
) -> std::result::Result<(), FieldError> {
    let field = || {
        let mut field = Vec::with_capacity(label.len() + value.len() + 1);
        field.extend_from_slice(label);
        field.push(options.value_delimiter);
        field.extend_from_slice(value);
        field
    };

    if label.is_empty() {
        return Err(FieldError::EmptyLabel { field: field() });
    }

    let strict_label = if options.strict {
        first_invalid_label_byte(label)
    } else {
        None
    };
    let bad_label = strict_label.or_else(|| {
        label
            .iter()
            .copied()
            .find(|&b| b == options.value_delimiter || b == options.field_delimiter || b == b'\n')
    });
    if let Some(byte) = bad_label {
        return Err(FieldError::InvalidLabel {
            byte,
            field: field(),
        });
    }

    let strict_value = if options.strict {
        first_invalid_value_byte(value)
    } else {
        None
    };
    let bad_value = strict_value.or_else(|| {
        value
            .iter()
            .copied()
            .find(|&b| b == options.field_delimiter || b == b'\n' || b == b'\r')
    });
    if let Some(byte) = bad_value {
        return Err(FieldError::InvalidValue {
            byte,
            field: field(),
        });
    }

    Ok(())
}

/// Writes LTSV records to an [`io::Write`].
#[derive(Debug)]
pub struct Writer<W> {
    inner: W,
    options: ParserOptions,
    line: Vec<u8>,
}

impl<W: io::Write> Writer<W> {
    /// Creates a strict writer with the canonical delimiters.
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, ParserOptions::default())
    }

    pub fn with_options(inner: W, options: ParserOptions) -> Self {
        Writer {
            inner,
            options,
            line: Vec::with_capacity(256),
        }
    }

    /// Writes one line from `(label, value)` pairs, in iteration order.
    ///
    /// An empty iterator writes an empty line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Field`](crate::Error::Field) for a field that would
    /// not parse back, or [`Error::Io`](crate::Error::Io) if writing fails.
    pub fn write_fields<I, L, V>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (L, V)>,
        L: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.line.clear();
        for (i, (label, value)) in fields.into_iter().enumerate() {
            let (label, value) = (label.as_ref(), value.as_ref());
            check_field(&self.options, label, value)?;
            if i > 0 {
                self.line.push(self.options.field_delimiter);
            }
            self.line.extend_from_slice(label);
            self.line.push(self.options.value_delimiter);
            self.line.extend_from_slice(value);
        }
        self.line.push(b'\n');
        self.inner.write_all(&self.line)?;
        Ok(())
    }

    /// Writes a [`Mapping`] in its iteration order.
    ///
    /// # Errors
    ///
    /// See [`Writer::write_fields`].
    pub fn write_map(&mut self, record: &Mapping) -> Result<()> {
        self.write_fields(record.iter())
    }

    /// Writes borrowed fields, duplicates included.
    ///
    /// # Errors
    ///
    /// See [`Writer::write_fields`].
    pub fn write_record(&mut self, record: &[Field<'_>]) -> Result<()> {
        self.write_fields(record.iter().map(|f| (f.label, f.value)))
    }

    /// Writes owned fields, duplicates included.
    ///
    /// # Errors
    ///
    /// See [`Writer::write_fields`].
    pub fn write_owned_record(&mut self, record: &[OwnedField]) -> Result<()> {
        self.write_fields(record.iter().map(|f| (&f.label, &f.value)))
    }

    /// Serializes a struct or map of scalars as one line.
    ///
    /// # Errors
    ///
    /// See [`ser::to_string_with_options`] and [`Writer::write_fields`].
    pub fn serialize<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut line = ser::to_string_with_options(value, self.options)?;
        line.push('\n');
        self.inner.write_all(line.as_bytes())?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the inner writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FieldErrorKind, Parser, Reader};

    #[test]
    fn test_write_and_read_back() {
        let mut record = Mapping::new();
        record.insert("time".to_string(), "[10/Oct/2000:13:55:36 -0700]".to_string());
        record.insert("req".to_string(), "GET / HTTP/1.0".to_string());
        record.insert("empty".to_string(), String::new());

        let mut writer = Writer::new(Vec::new());
        writer.write_map(&record).unwrap();
        writer.write_map(&record).unwrap();
        let out = writer.into_inner();

        let records = Reader::new(&out[..]).read_all().unwrap();
        assert_eq!(records, vec![record.clone(), record]);
    }

    #[test]
    fn test_duplicates_are_written_in_order() {
        let fields = Parser::default()
            .parse_line_as_fields(b"a:1\tb:2\ta:3", None)
            .unwrap();
        let mut writer = Writer::new(Vec::new());
        writer.write_record(&fields).unwrap();
        writer
            .write_owned_record(&[OwnedField::new("x", "y")])
            .unwrap();
        assert_eq!(writer.get_ref(), b"a:1\tb:2\ta:3\nx:y\n");
    }

    #[test]
    fn test_strict_rejects_before_writing() {
        let mut writer = Writer::new(Vec::new());
        let err = writer
            .write_fields([("ok", "1"), ("bad label", "2")])
            .unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::InvalidLabel));
        assert!(matches!(err, Error::Field(_)));

        let err = writer.write_fields([("a", "x\ny")]).unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::InvalidValue));

        let err = writer.write_fields([("", "x")]).unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::EmptyLabel));

        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn test_lenient_only_protects_structure() {
        let mut writer = Writer::with_options(Vec::new(), ParserOptions::lenient());
        writer.write_fields([("la bel", "x\x08y")]).unwrap();
        assert_eq!(writer.get_ref(), b"la bel:x\x08y\n");

        let err = writer.write_fields([("a:b", "1")]).unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::InvalidLabel));
        let err = writer.write_fields([("a", "1\t2")]).unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::InvalidValue));
        let err = writer.write_fields([("a", "x\r")]).unwrap_err();
        assert_eq!(err.field_error().and_then(FieldError::byte), Some(b'\r'));
        assert_eq!(writer.get_ref(), b"la bel:x\x08y\n");
    }

    #[test]
    fn test_lenient_output_reads_back() {
        let options = ParserOptions::lenient();
        let mut writer = Writer::with_options(Vec::new(), options);
        writer.write_fields([("a", "x\x08"), ("b", "")]).unwrap();
        assert!(writer.write_fields([("a", "x\r")]).is_err());
        let out = writer.into_inner();

        let mut reader = Reader::with_options(&out[..], options);
        let record = reader.read().unwrap().unwrap();
        assert_eq!(record["a"], "x\x08");
        assert_eq!(record["b"], "");
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_custom_delimiters() {
        let options = ParserOptions::new()
            .with_field_delimiter(b'|')
            .with_value_delimiter(b'=');
        let mut writer = Writer::with_options(Vec::new(), options);
        writer.write_fields([("a", "1"), ("b", "x:y")]).unwrap();
        assert_eq!(writer.get_ref(), b"a=1|b=x:y\n");
    }
}
