//! Dynamic value representation for INI data.
//!
//! This module provides the [`Value`] enum, the tagged shape every document
//! is reduced to before encoding and every parsed file is read into before
//! decoding.
//!
//! ## Core Types
//!
//! - [`Value`]: scalar, string array, integer array, nested section, or an
//!   unsupported shape
//! - [`Number`]: integer or floating-point numbers
//! - [`Scalar`]: a borrowed view of the scalar variants, rendered by `Display`
//!
//! ## Shapes and Encoding
//!
//! | Variant | Written as |
//! |---------|------------|
//! | `Bool`, `Number`, `String` | `key = value` |
//! | `Strings` | one `key[] = value` line per element |
//! | `Integers` | nothing (recognized but not encoded) |
//! | `Section` | `[key]` header plus its entries |
//! | `Unsupported` | nothing |
//!
//! ```rust
//! use serde_ini_codec::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Server { host: String, ports: Vec<u16> }
//!
//! let value = to_value(&Server { host: "db".into(), ports: vec![5432] }).unwrap();
//! let section = value.as_section().unwrap();
//! assert_eq!(section.get("host"), Some(&Value::from("db")));
//! assert_eq!(section.get("ports"), Some(&Value::Integers(vec![5432])));
//! ```

use crate::IniMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed INI value.
///
/// # Examples
///
/// ```rust
/// use serde_ini_codec::{Number, Value};
///
/// let text = Value::from("hello");
/// let num = Value::Number(Number::Integer(42));
/// let tags = Value::Strings(vec!["a".into(), "b".into()]);
///
/// assert!(text.is_scalar());
/// assert!(num.is_scalar());
/// assert!(!tags.is_scalar());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(Number),
    String(String),
    /// Array of strings; each element becomes its own `key[] = ...` line.
    Strings(Vec<String>),
    /// Array of integers. Recognized, but the encoder writes nothing for it.
    Integers(Vec<i64>),
    /// A nested mapping: a named section at the top level of a document.
    Section(IniMap),
    /// Any shape INI cannot express, tagged with what it was.
    Unsupported(&'static str),
}

/// A numeric value.
///
/// # Examples
///
/// ```rust
/// use serde_ini_codec::Number;
///
/// assert_eq!(Number::Integer(42).to_string(), "42");
/// assert_eq!(Number::Float(2.5).to_string(), "2.5");
/// assert_eq!(Number::Float(3.0).to_string(), "3");
/// assert_eq!(Number::Float(1e300).to_string(), "1e+300");
/// assert_eq!(Number::from(u64::MAX).to_string(), "18446744073709551615");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    /// Only holds values above `i64::MAX`; smaller ones are `Integer`.
    Unsigned(u64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Unsigned(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it has no fractional part.
    ///
    /// ```rust
    /// use serde_ini_codec::Number;
    ///
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Integer(i) => Some(i),
            Number::Unsigned(u) => i64::try_from(u).ok(),
            Number::Float(f) => {
                // i64::MAX as f64 rounds up to 2^63, which is out of range.
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Unsigned(u) => u as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Unsigned(u) => write!(f, "{}", u),
            Number::Float(fl) => write_float(f, *fl),
        }
    }
}

/// Shortest round-trip decimal, switching to exponent notation when the
/// decimal exponent is below -4 or at least 21.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "+Inf" } else { "-Inf" });
    }

    let sci = format!("{:e}", value);
    let exponent = sci
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa, exp)));
    match exponent {
        Some((mantissa, exp)) if !(-4..21).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
        }
        _ => write!(f, "{}", value),
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        // Widen through the shortest f32 decimal so 0.1f32 stays "0.1".
        Number::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Number::Unsigned(value), Number::Integer)
    }
}

/// A borrowed scalar, rendered exactly as it appears after `key = `.
///
/// No quoting or escaping is applied.
///
/// ```rust
/// use serde_ini_codec::Value;
///
/// let value = Value::from(true);
/// assert_eq!(value.as_scalar().unwrap().to_string(), "true");
/// assert!(Value::Integers(vec![1]).as_scalar().is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Number(Number),
    String(&'a str),
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl Value {
    /// Builds a value from array elements, choosing the array shape.
    ///
    /// All strings become [`Value::Strings`], all integers become
    /// [`Value::Integers`], an empty list becomes an empty `Strings`.
    /// Anything else is [`Value::Unsupported`].
    #[must_use]
    pub fn from_elements(elements: Vec<Value>) -> Value {
        if elements.iter().all(|v| matches!(v, Value::String(_))) {
            let strings = elements
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            return Value::Strings(strings);
        }

        if elements
            .iter()
            .all(|v| matches!(v, Value::Number(Number::Integer(_))))
        {
            let integers = elements
                .into_iter()
                .filter_map(|v| match v {
                    Value::Number(Number::Integer(i)) => Some(i),
                    _ => None,
                })
                .collect();
            return Value::Integers(integers);
        }

        Value::Unsupported("array")
    }

    /// Short name of the shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(Number::Integer(_) | Number::Unsigned(_)) => "integer",
            Value::Number(Number::Float(_)) => "float",
            Value::String(_) => "string",
            Value::Strings(_) => "string array",
            Value::Integers(_) => "integer array",
            Value::Section(_) => "section",
            Value::Unsupported(kind) => *kind,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_section(&self) -> bool {
        matches!(self, Value::Section(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Value::Unsupported(_))
    }

    /// Returns the scalar view of this value, or `None` for arrays,
    /// sections and unsupported shapes.
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<Scalar<'_>> {
        match self {
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => Some(Scalar::Number(*n)),
            Value::String(s) => Some(Scalar::String(s)),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Value::Strings(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_section(&self) -> Option<&IniMap> {
        match self {
            Value::Section(map) => Some(map),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Unsigned(u)) => serializer.serialize_u64(*u),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Strings(items) => items.serialize(serializer),
            Value::Integers(items) => items.serialize(serializer),
            Value::Section(map) => map.serialize(serializer),
            Value::Unsupported(_) => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any INI value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Unsupported("null"))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Unsupported("null"))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut elements = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    elements.push(elem);
                }
                Ok(Value::from_elements(elements))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = IniMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Section(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Strings(value)
    }
}

impl From<Vec<i64>> for Value {
    fn from(value: Vec<i64>) -> Self {
        Value::Integers(value)
    }
}

impl From<IniMap> for Value {
    fn from(value: IniMap) -> Self {
        Value::Section(value)
    }
}
