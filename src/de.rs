//! LTSV deserialization.
//!
//! Turns one LTSV line into any `T: Deserialize` whose shape is a flat map:
//! structs with scalar fields, `HashMap<String, _>`, `IndexMap`, and so on.
//!
//! ## Value conversion
//!
//! Every LTSV value is text. Scalars are parsed on demand:
//!
//! - integers and floats via [`str::parse`]
//! - `bool` from `true` / `false`
//! - `Option<T>`: the empty value is `None`, anything else is `Some`
//! - unit enum variants by name
//! - `&str` / `&[u8]` borrow straight from the line
//!
//! A repeated label keeps its last value. Nested sequences and maps have no
//! LTSV form and are rejected.
//!
//! ```rust
//! use ltsv::from_line;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Access<'a> {
//!     host: &'a str,
//!     status: u16,
//!     size: Option<u64>,
//! }
//!
//! let access: Access = from_line(b"host:127.0.0.1\tstatus:200\tsize:").unwrap();
//! assert_eq!(access, Access { host: "127.0.0.1", status: 200, size: None });
//! ```

use crate::{Error, Parser, Result, DEFAULT_PARSER};
use indexmap::IndexMap;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde::forward_to_deserialize_any;
use std::fmt::Display;
use std::ops::ControlFlow;
use std::str::FromStr;

/// Deserializes one line with the canonical strict parser.
///
/// # Errors
///
/// Returns [`Error::Line`] if the line is malformed, or a deserialization
/// error if a value does not fit the target type.
pub fn from_line<'de, T>(line: &'de [u8]) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    from_line_with(&DEFAULT_PARSER, line)
}

/// Deserializes one line given as `&str`.
///
/// # Errors
///
/// See [`from_line`].
pub fn from_str<'de, T>(line: &'de str) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    from_line(line.as_bytes())
}

/// Deserializes one line with a caller-supplied parser.
///
/// # Errors
///
/// See [`from_line`].
pub fn from_line_with<'de, T>(parser: &Parser, line: &'de [u8]) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    let mut fields = IndexMap::new();
    parser.parse_line(line, |label, value| {
        fields.insert(label, value);
        ControlFlow::Continue(())
    })?;
    T::deserialize(RecordDeserializer { fields })
}

/// Deserializer over the fields of one parsed line.
struct RecordDeserializer<'de> {
    fields: IndexMap<&'de [u8], &'de [u8]>,
}

impl<'de> de::Deserializer<'de> for RecordDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(RecordAccess {
            fields: self.fields.into_iter(),
            value: None,
        })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct RecordAccess<'de> {
    fields: indexmap::map::IntoIter<&'de [u8], &'de [u8]>,
    value: Option<&'de [u8]>,
}

impl<'de> MapAccess<'de> for RecordAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((label, value)) = self.fields.next() else {
            return Ok(None);
        };
        self.value = Some(value);
        let label = std::str::from_utf8(label)?;
        seed.deserialize(BorrowedStrDeserializer::new(label)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::Message("value requested before label".to_string()))?;
        seed.deserialize(ValueDeserializer { value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Deserializer for a single LTSV value.
struct ValueDeserializer<'de> {
    value: &'de [u8],
}

impl<'de> ValueDeserializer<'de> {
    fn as_str(&self) -> Result<&'de str> {
        Ok(std::str::from_utf8(self.value)?)
    }

    fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let s = self.as_str()?;
        s.parse()
            .map_err(|e| Error::Message(format!("invalid value {:?}: {}", s, e)))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match std::str::from_utf8(self.value) {
            Ok(s) => visitor.visit_borrowed_str(s),
            Err(_) => visitor.visit_borrowed_bytes(self.value),
        }
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
        deserialize_char => visit_char,
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.as_str()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.value)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::Message(format!(
                "expected empty value for unit, found {:?}",
                String::from_utf8_lossy(self.value)
            )))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let s = self.as_str()?;
        visitor.visit_enum(IntoDeserializer::<Error>::into_deserializer(s))
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("sequence as LTSV value"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple as LTSV value"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple struct as LTSV value"))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("map as LTSV value"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("struct as LTSV value"))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldErrorKind, ParserOptions};
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Access {
        host: String,
        status: u16,
        size: u64,
        #[serde(default)]
        referer: Option<String>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "UPPERCASE")]
    enum Method {
        Get,
        Post,
    }

    #[test]
    fn test_struct_from_line() {
        let access: Access = from_line(b"host:127.0.0.1\tstatus:404\tsize:2326").unwrap();
        assert_eq!(
            access,
            Access {
                host: "127.0.0.1".to_string(),
                status: 404,
                size: 2326,
                referer: None,
            }
        );
    }

    #[test]
    fn test_unknown_labels_are_ignored() {
        let access: Access =
            from_str("ident:-\thost:h\tstatus:200\tsize:0\treferer:http://x/").unwrap();
        assert_eq!(access.referer.as_deref(), Some("http://x/"));
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let access: Access = from_str("host:a\tstatus:1\tsize:2\thost:b").unwrap();
        assert_eq!(access.host, "b");
    }

    #[test]
    fn test_scalars_and_enums() {
        #[derive(Deserialize)]
        struct Row {
            ok: bool,
            ratio: f64,
            method: Method,
            grade: char,
        }
        let row: Row = from_str("ok:true\tratio:0.25\tmethod:POST\tgrade:A").unwrap();
        assert!(row.ok);
        assert_eq!(row.ratio, 0.25);
        assert_eq!(row.method, Method::Post);
        assert_eq!(row.grade, 'A');

        let method: HashMap<String, Method> = from_str("m:GET").unwrap();
        assert_eq!(method["m"], Method::Get);
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = from_str::<Access>("host:h\tstatus:abc\tsize:1").unwrap_err();
        assert!(matches!(err, Error::Message(_)));
        assert!(err.to_string().contains("\"abc\""), "{}", err);
    }

    #[test]
    fn test_malformed_line_keeps_kind() {
        let err = from_str::<HashMap<String, String>>("a:1\t:2").unwrap_err();
        assert_eq!(err.kind(), Some(FieldErrorKind::EmptyLabel));
        assert!(matches!(err, Error::Line(_)));
    }

    #[test]
    fn test_lenient_parser_and_bytes() {
        #[derive(Deserialize)]
        struct Raw<'a> {
            #[serde(borrow)]
            blob: &'a [u8],
        }

        let parser = Parser::new(ParserOptions::lenient());
        let raw: Raw = from_line_with(&parser, b"blob:\xff\x08").unwrap();
        assert_eq!(raw.blob, b"\xff\x08");
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = from_str::<HashMap<String, Vec<u8>>>("a:1").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }
}
