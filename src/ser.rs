//! LTSV serialization.
//!
//! Writes a struct or map whose values are scalars as a single LTSV line
//! (without the trailing newline). Fields appear in declaration / iteration
//! order.
//!
//! - numbers, `bool` and `char` use their `Display` form
//! - `None` and `()` become the empty value
//! - unit enum variants are written by name
//! - sequences, nested maps and structs have no LTSV form and are rejected
//!
//! ```rust
//! use ltsv::to_string;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Access { host: &'static str, status: u16, size: Option<u64> }
//!
//! let line = to_string(&Access { host: "127.0.0.1", status: 200, size: None }).unwrap();
//! assert_eq!(line, "host:127.0.0.1\tstatus:200\tsize:");
//! ```

use crate::writer::check_field;
use crate::{Error, ParserOptions, Result};
use serde::ser::{self, Impossible, Serialize};

/// Serializes `value` as one line with the canonical strict options.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for shapes that are not a flat record,
/// and [`Error::Field`] for a label or value the grammar rejects.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, ParserOptions::default())
}

/// Serializes `value` as one line with custom delimiters / strictness.
///
/// Output is a `String`, so both delimiters must be ASCII.
///
/// # Errors
///
/// See [`to_string`]. Non-ASCII delimiters yield [`Error::Message`].
pub fn to_string_with_options<T>(value: &T, options: ParserOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    if !options.field_delimiter.is_ascii() || !options.value_delimiter.is_ascii() {
        return Err(Error::Message(
            "delimiters must be ASCII to serialize into a string".to_string(),
        ));
    }
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serializes a flat record into one LTSV line.
pub struct Serializer {
    output: String,
    options: ParserOptions,
    fields: usize,
}

impl Serializer {
    pub fn new(options: ParserOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            fields: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn push_field(&mut self, label: &str, value: &str) -> Result<()> {
        check_field(&self.options, label.as_bytes(), value.as_bytes())?;
        if self.fields > 0 {
            self.output.push(char::from(self.options.field_delimiter));
        }
        self.output.push_str(label);
        self.output.push(char::from(self.options.value_delimiter));
        self.output.push_str(value);
        self.fields += 1;
        Ok(())
    }
}

fn top_level(what: &str) -> Error {
    Error::unsupported_type(&format!("{} at top level, expected a struct or map", what))
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = RecordSerializer<'a>;
    type SerializeStruct = RecordSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(top_level("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(top_level("integer"))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(top_level("integer"))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(top_level("float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(top_level("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(top_level("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(top_level("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(top_level("enum"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(top_level("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(top_level("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(top_level("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(top_level("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(top_level("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(RecordSerializer {
            ser: self,
            label: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(RecordSerializer {
            ser: self,
            label: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(top_level("enum"))
    }
}

/// Collects the fields of one struct or map.
pub struct RecordSerializer<'a> {
    ser: &'a mut Serializer,
    label: Option<String>,
}

impl<'a> ser::SerializeMap for RecordSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.label = Some(key.serialize(ScalarSerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let label = self
            .label
            .take()
            .ok_or_else(|| Error::Message("map value serialized before its key".to_string()))?;
        let value = value.serialize(ScalarSerializer)?;
        self.ser.push_field(&label, &value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for RecordSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(ScalarSerializer)?;
        self.ser.push_field(key, &value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Renders one label or value as text.
struct ScalarSerializer;

fn nested(what: &str) -> Error {
    Error::unsupported_type(&format!("{} as LTSV value", what))
}

impl ser::Serializer for ScalarSerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        Ok(std::str::from_utf8(v)?.to_string())
    }

    fn serialize_none(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(nested("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(nested("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(nested("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(nested("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(nested("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(nested("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(nested("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(nested("struct variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_str, FieldErrorKind, Mapping};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Level {
        Info,
        Warn,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Event {
        level: Level,
        code: i32,
        ratio: f64,
        ok: bool,
        note: Option<String>,
    }

    #[test]
    fn test_struct_to_line() {
        let event = Event {
            level: Level::Warn,
            code: -3,
            ratio: 1.5,
            ok: false,
            note: Some("disk 91%".to_string()),
        };
        let line = to_string(&event).unwrap();
        assert_eq!(line, "level:warn\tcode:-3\tratio:1.5\tok:false\tnote:disk 91%");
        let back: Event = from_str(&line).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_none_becomes_empty_value() {
        let event = Event {
            level: Level::Info,
            code: 0,
            ratio: 0.0,
            ok: true,
            note: None,
        };
        let line = to_string(&event).unwrap();
        assert!(line.ends_with("\tnote:"), "{}", line);
        let back: Event = from_str(&line).unwrap();
        assert_eq!(back.note, None);
    }

    #[test]
    fn test_maps_keep_their_order() {
        let mut map = BTreeMap::new();
        map.insert(2, "two");
        map.insert(1, "one");
        assert_eq!(to_string(&map).unwrap(), "1:one\t2:two");

        let mut mapping = Mapping::new();
        mapping.insert("z".to_string(), "1".to_string());
        mapping.insert("a".to_string(), "2".to_string());
        assert_eq!(to_string(&mapping).unwrap(), "z:1\ta:2");
    }

    #[test]
    fn test_unsupported_shapes() {
        assert!(matches!(to_string(&42), Err(Error::UnsupportedType(_))));
        assert!(matches!(
            to_string(&vec![1, 2]),
            Err(Error::UnsupportedType(_))
        ));

        #[derive(Serialize)]
        struct Nested {
            tags: Vec<String>,
        }
        let err = to_string(&Nested { tags: vec![] }).unwrap_err();
        assert!(err.to_string().contains("sequence"), "{}", err);
    }

    #[test]
    fn test_grammar_is_enforced() {
        let mut map = BTreeMap::new();
        map.insert("msg", "line1\nline2");
        let err = to_string(&map).unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::InvalidValue));

        let options = ParserOptions::lenient().with_field_delimiter(b'|');
        let mut map = BTreeMap::new();
        map.insert("msg", "a\tb");
        assert_eq!(to_string_with_options(&map, options).unwrap(), "msg:a\tb");
    }

    #[test]
    fn test_unit_top_level_is_empty_line() {
        assert_eq!(to_string(&()).unwrap(), "");
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let options = ParserOptions::new().with_field_delimiter(0xA6);
        let mut map = BTreeMap::new();
        map.insert("a", "1");
        assert!(matches!(
            to_string_with_options(&map, options),
            Err(Error::Message(_))
        ));
    }
}
