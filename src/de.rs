//! Rebinding parsed documents onto Rust types.
//!
//! Decoding happens in two steps. The parser produces a [`Value`] tree in
//! which every scalar is a string; [`ValueDeserializer`] then drives the
//! target's `Deserialize` impl over that tree, converting strings to the
//! numbers and booleans the target asks for.
//!
//! ## Coercions
//!
//! | Target asks for | Accepted |
//! |-----------------|----------|
//! | integers | integer numbers, or strings that parse as one |
//! | floats | numbers, or strings that parse as one |
//! | `bool` | booleans, or `true/false/1/0/on/off/yes/no` (any case) |
//! | strings | strings, booleans and numbers |
//! | sequences | string arrays (`key[] = ...`) and integer arrays |
//! | maps, structs | sections |
//! | enums | a string naming a unit variant, or a one-entry section |
//!
//! Errors carry the dotted path of the field that failed:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_ini_codec::from_str;
//!
//! #[derive(Deserialize, Debug)]
//! struct Config { server: Server }
//!
//! #[derive(Deserialize, Debug)]
//! struct Server { port: u16 }
//!
//! let err = from_str::<Config>("[server]\nport = eighty\n").unwrap_err();
//! assert_eq!(err.path(), Some("server.port"));
//! ```

use std::fmt;

use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;

use crate::{Error, IniMap, Number, Result, Value};

/// Outcome of running a target's `Deserialize` impl against [`TargetProbe`].
#[derive(Debug)]
enum Probe {
    /// The target asked for a map-like shape.
    Accepts,
    /// The target asked for a shape a document can never provide.
    Rejects(&'static str),
    /// The target's impl failed on its own terms; let the real decode decide.
    Inconclusive,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Accepts => f.write_str("target accepts a document"),
            Probe::Rejects(kind) => write!(f, "target requires {}", kind),
            Probe::Inconclusive => f.write_str("target shape unknown"),
        }
    }
}

impl std::error::Error for Probe {}

impl de::Error for Probe {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        Probe::Inconclusive
    }
}

/// A deserializer with no data that only records which shape the target
/// requests first.
struct TargetProbe;

macro_rules! reject {
    ($($method:ident => $kind:literal),* $(,)?) => {
        $(
            fn $method<V>(self, _visitor: V) -> std::result::Result<V::Value, Probe>
            where
                V: de::Visitor<'de>,
            {
                Err(Probe::Rejects($kind))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for TargetProbe {
    type Error = Probe;

    fn deserialize_any<V>(self, _visitor: V) -> std::result::Result<V::Value, Probe>
    where
        V: de::Visitor<'de>,
    {
        Err(Probe::Accepts)
    }

    reject! {
        deserialize_bool => "a boolean",
        deserialize_i8 => "an integer",
        deserialize_i16 => "an integer",
        deserialize_i32 => "an integer",
        deserialize_i64 => "an integer",
        deserialize_i128 => "an integer",
        deserialize_u8 => "an integer",
        deserialize_u16 => "an integer",
        deserialize_u32 => "an integer",
        deserialize_u64 => "an integer",
        deserialize_u128 => "an integer",
        deserialize_f32 => "a float",
        deserialize_f64 => "a float",
        deserialize_char => "a character",
        deserialize_str => "a string",
        deserialize_string => "a string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "a unit",
        deserialize_seq => "a sequence",
        deserialize_identifier => "an identifier",
    }

    fn deserialize_option<V>(self, visitor: V) -> std::result::Result<V::Value, Probe>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        _visitor: V,
    ) -> std::result::Result<V::Value, Probe>
    where
        V: de::Visitor<'de>,
    {
        Err(Probe::Rejects("a unit"))
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, Probe>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> std::result::Result<V::Value, Probe>
    where
        V: de::Visitor<'de>,
    {
        Err(Probe::Rejects("a sequence"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> std::result::Result<V::Value, Probe>
    where
        V: de::Visitor<'de>,
    {
        Err(Probe::Rejects("a sequence"))
    }

    forward_to_deserialize_any! {
        map struct enum ignored_any
    }
}

/// Checks, without touching any input, that `T` can receive a document.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] when `T` deserializes from a scalar,
/// sequence or unit.
pub(crate) fn check_target<T: DeserializeOwned>() -> Result<()> {
    match T::deserialize(TargetProbe) {
        Err(Probe::Rejects(requested)) => Err(Error::InvalidTarget {
            target: std::any::type_name::<T>(),
            requested,
        }),
        Ok(_) | Err(Probe::Accepts | Probe::Inconclusive) => Ok(()),
    }
}

/// Rebinds a [`Value`] onto any type implementing `Deserialize`.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the path of the offending field when the
/// value does not fit `T`.
///
/// ```rust
/// use serde_ini_codec::{from_value, ini};
/// use std::collections::BTreeMap;
///
/// let ports: BTreeMap<String, u16> = from_value(ini!({ "http": "80", "https": "443" })).unwrap();
/// assert_eq!(ports["https"], 443);
/// ```
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value))
}

fn unexpected(value: &Value, expected: &str) -> Error {
    Error::decode(format_args!("expected {}, found {}", expected, value.kind()))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Deserializer over an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }

    fn into_i64(self) -> Result<i64> {
        match self.value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| Error::decode(format_args!("expected integer, found {}", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|e| Error::decode(format_args!("invalid integer {:?}: {}", s, e))),
            other => Err(unexpected(&other, "integer")),
        }
    }

    fn into_u64(self) -> Result<u64> {
        match self.value {
            Value::Number(Number::Integer(i)) => u64::try_from(i)
                .map_err(|_| Error::decode(format_args!("expected unsigned integer, found {}", i))),
            Value::Number(Number::Unsigned(u)) => Ok(u),
            Value::Number(Number::Float(f)) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
                Ok(f as u64)
            }
            Value::Number(n) => Err(Error::decode(format_args!("expected unsigned integer, found {}", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|e| Error::decode(format_args!("invalid unsigned integer {:?}: {}", s, e))),
            other => Err(unexpected(&other, "unsigned integer")),
        }
    }

    fn into_f64(self) -> Result<f64> {
        match self.value {
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|e| Error::decode(format_args!("invalid float {:?}: {}", s, e))),
            other => Err(unexpected(&other, "float")),
        }
    }

    fn into_string(self) -> Result<String> {
        match self.value {
            Value::String(s) => Ok(s),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(unexpected(&other, "string")),
        }
    }
}

macro_rules! deserialize_signed {
    ($($method:ident),*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.visit_i64(self.into_i64()?)
            }
        )*
    };
}

macro_rules! deserialize_unsigned {
    ($($method:ident),*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.visit_u64(self.into_u64()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Unsigned(u)) => visitor.visit_u64(u),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Strings(items) => {
                visitor.visit_seq(SeqDeserializer::new(items.into_iter().map(Value::String).collect()))
            }
            Value::Integers(items) => visitor.visit_seq(SeqDeserializer::new(
                items.into_iter().map(|i| Value::Number(Number::Integer(i))).collect(),
            )),
            Value::Section(map) => visitor.visit_map(MapDeserializer::new(map)),
            Value::Unsupported(_) => visitor.visit_unit(),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::String(ref s) => match parse_bool(s) {
                Some(b) => visitor.visit_bool(b),
                None => Err(Error::decode(format_args!("invalid boolean {:?}", s))),
            },
            Value::Number(Number::Integer(i @ (0 | 1))) => visitor.visit_bool(i == 1),
            other => Err(unexpected(&other, "boolean")),
        }
    }

    deserialize_signed!(deserialize_i8, deserialize_i16, deserialize_i32, deserialize_i64);
    deserialize_unsigned!(deserialize_u8, deserialize_u16, deserialize_u32, deserialize_u64);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.into_f64()?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.into_f64()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let s = self.into_string()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::decode(format_args!("expected a single character, found {:?}", s))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.into_string()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.into_string()?)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            _ => self.deserialize_seq(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Unsupported(_) => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Unsupported(_) => visitor.visit_unit(),
            Value::String(ref s) if s.is_empty() => visitor.visit_unit(),
            other => Err(unexpected(&other, "unit")),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Strings(items) => {
                visitor.visit_seq(SeqDeserializer::new(items.into_iter().map(Value::String).collect()))
            }
            Value::Integers(items) => visitor.visit_seq(SeqDeserializer::new(
                items.into_iter().map(|i| Value::Number(Number::Integer(i))).collect(),
            )),
            other => Err(unexpected(&other, "array")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Section(map) => visitor.visit_map(MapDeserializer::new(map)),
            other => Err(unexpected(&other, "section")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Section(map) if map.len() == 1 => match map.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer::new(variant, value)),
                None => Err(Error::decode("expected enum variant")),
            },
            other => Err(unexpected(&other, "enum variant")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i128 u128
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
    index: usize,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
            index: 0,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => {
                let index = self.index;
                self.index += 1;
                seed.deserialize(ValueDeserializer::new(value))
                    .map(Some)
                    .map_err(|e| e.within(&format!("[{}]", index)))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    pending: Option<(String, Value)>,
}

impl MapDeserializer {
    fn new(map: IniMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                let result = seed
                    .deserialize(ValueDeserializer::new(Value::String(key.clone())))
                    .map(Some)
                    .map_err(|e| e.within(&key));
                self.pending = Some((key, value));
                result
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some((key, value)) => seed
                .deserialize(ValueDeserializer::new(value))
                .map_err(|e| e.within(&key)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant.clone())))?;
        Ok((
            variant,
            VariantDeserializer {
                name: self.variant,
                value: self.value,
            },
        ))
    }
}

struct VariantDeserializer {
    name: String,
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Unsupported(_) => Ok(()),
            Value::String(ref s) if s.is_empty() => Ok(()),
            other => Err(unexpected(&other, "unit variant").within(&self.name)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
            .map_err(|e| e.within(&self.name))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(ValueDeserializer::new(self.value), visitor)
            .map_err(|e| e.within(&self.name))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(ValueDeserializer::new(self.value), visitor)
            .map_err(|e| e.within(&self.name))
    }
}
