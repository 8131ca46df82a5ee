//! # serde_ini_codec
//!
//! A Serde-compatible codec between INI text and structured data.
//!
//! ## Key Features
//!
//! - **Deterministic output**: section names are always sorted, so the same
//!   document always encodes to the same bytes
//! - **Two encoders**: a full mode for heterogeneous documents (scalars,
//!   string arrays, nested sections) and a simple mode for flat
//!   string-to-string sections, picked automatically from the input's shape
//! - **Default section**: one section can be written without a header, ahead
//!   of all others
//! - **Serde compatible**: decode into any `#[derive(Deserialize)]` type, with
//!   string values coerced to the numbers and booleans the type asks for
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_ini_codec::{decode, encode};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Config {
//!     name: String,
//!     server: Server,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let config = Config {
//!     name: "demo".to_string(),
//!     server: Server { host: "localhost".to_string(), port: 8080 },
//! };
//!
//! let ini = encode(&config, None).unwrap();
//! assert_eq!(
//!     String::from_utf8(ini.clone()).unwrap(),
//!     "name = demo\n[server]\nhost = localhost\nport = 8080\n"
//! );
//!
//! let back: Config = decode(&ini).unwrap();
//! assert_eq!(back, config);
//! ```
//!
//! ## What Gets Written
//!
//! Scalars become `key = value`, string arrays become one `key[] = value` line
//! per element, and nested maps become `[name]` sections. Integer arrays,
//! `None` and any other shape INI cannot express are skipped without error.
//! Nothing is quoted or escaped. See the [`format`] module for the full
//! dialect.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for mode selection and decode
//! entry, `trace` for skipped values). No subscriber is installed.

pub mod de;
pub mod encode;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod ser;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use encode::{encode_full_to, encode_simple_to, encode_to};
pub use error::{Error, Result};
pub use map::{IniMap, SimpleMap};
pub use options::{EncodeOptions, ParseMode, ParseOptions, DEFAULT_SECTION};
pub use parser::{parse, Parsed};
pub use ser::{to_value, ValueSerializer};
pub use value::{Number, Scalar, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use tracing::debug;

/// Encodes any map- or struct-shaped value as INI.
///
/// Top-level scalars and string arrays, together with the entries of the
/// section named by `default_section`, are written first without a header.
/// Every other section follows in sorted order.
///
/// The layout is chosen from the captured content, not from the type of
/// `value`. A document whose top-level values are all sections of strings
/// is written in simple mode, with sorted keys and a blank line after each
/// section, even when it is an [`IniMap`] or [`Value`]. Call
/// [`encode_full`] to always get the full-mode layout.
///
/// # Examples
///
/// ```rust
/// use serde_ini_codec::encode;
/// use std::collections::BTreeMap;
///
/// let mut doc = BTreeMap::new();
/// doc.insert("S", BTreeMap::from([("b", "2"), ("a", "1")]));
///
/// let ini = encode(&doc, None).unwrap();
/// assert_eq!(ini, b"[S]\na = 1\nb = 2\n\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidInputKind`] if `value` is not a map or struct,
/// with no output produced.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode<T>(value: &T, default_section: Option<&str>) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    encode_with_options(value, &EncodeOptions::from_default_section(default_section))
}

/// Encodes a value with explicit [`EncodeOptions`].
///
/// # Errors
///
/// Same as [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options<T>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::with_capacity(256);
    encode_to(&mut out, value, options)?;
    Ok(out)
}

/// Encodes a full-mode document directly.
///
/// # Errors
///
/// Encoding into memory does not fail in practice; the `Result` mirrors
/// [`encode_full_to`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_full(doc: &IniMap, default_section: Option<&str>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    encode_full_to(&mut out, doc, &EncodeOptions::from_default_section(default_section))?;
    Ok(out)
}

/// Encodes flat string sections directly.
///
/// ```rust
/// use serde_ini_codec::{encode_simple, SimpleMap};
///
/// let mut doc = SimpleMap::new();
/// doc.entry("main".into()).or_default().insert("k".into(), "v".into());
/// doc.entry("db".into()).or_default().insert("host".into(), "h".into());
///
/// let ini = encode_simple(&doc, Some("main")).unwrap();
/// assert_eq!(ini, b"k = v\n\n[db]\nhost = h\n\n");
/// ```
///
/// # Errors
///
/// Mirrors [`encode_simple_to`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_simple(doc: &SimpleMap, default_section: Option<&str>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    encode_simple_to(&mut out, doc, &EncodeOptions::from_default_section(default_section))?;
    Ok(out)
}

/// Encodes a value as an INI string.
///
/// # Errors
///
/// Same as [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let bytes = encode(value, None)?;
    String::from_utf8(bytes).map_err(Error::custom)
}

/// Encodes a value into a writer.
///
/// # Errors
///
/// Returns [`Error::Write`] if the writer fails, in addition to the errors of
/// [`encode`]. Output already written is not rolled back.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T, options: &EncodeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    encode_to(&mut writer, value, options)
}

/// Decodes INI bytes into `T`.
///
/// Invalid UTF-8 is replaced rather than rejected. The target is checked
/// before parsing: a type that cannot hold a document (an integer, a
/// string, a `Vec`) fails with [`Error::InvalidTarget`] and the input is
/// never read.
///
/// # Examples
///
/// ```rust
/// use serde_ini_codec::{decode, Error};
/// use std::collections::HashMap;
///
/// let doc: HashMap<String, HashMap<String, String>> =
///     decode(b"[db]\nhost = localhost\n").unwrap();
/// assert_eq!(doc["db"]["host"], "localhost");
///
/// let err = decode::<Vec<i32>>(b"not ini at all").unwrap_err();
/// assert!(matches!(err, Error::InvalidTarget { .. }));
/// ```
///
/// # Errors
///
/// - [`Error::InvalidTarget`] if `T` cannot receive a document
/// - [`Error::Syntax`] if the text is not valid INI
/// - [`Error::Decode`] if the document does not fit `T`
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    de::check_target::<T>()?;
    debug!(len = bytes.len(), target = std::any::type_name::<T>(), "decoding ini document");
    let text = String::from_utf8_lossy(bytes);
    let doc = parser::parse_full(&text, None)?;
    from_value(Value::Section(doc))
}

/// Decodes INI bytes into an existing value.
///
/// `target` is replaced only when decoding succeeds; on any error it is left
/// exactly as it was.
///
/// ```rust
/// use serde_ini_codec::decode_into;
/// use std::collections::BTreeMap;
///
/// let mut doc: BTreeMap<String, BTreeMap<String, String>> =
///     BTreeMap::from([("old".to_string(), BTreeMap::new())]);
/// assert!(decode_into(b"[broken", &mut doc).is_err());
/// assert!(doc.contains_key("old"));
///
/// decode_into(b"[new]\nk = v\n", &mut doc).unwrap();
/// assert_eq!(doc["new"]["k"], "v");
/// assert!(!doc.contains_key("old"));
/// ```
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_into<T>(bytes: &[u8], target: &mut T) -> Result<()>
where
    T: DeserializeOwned,
{
    *target = decode(bytes)?;
    Ok(())
}

/// Decodes INI text into `T`.
///
/// # Errors
///
/// Same as [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
#[allow(clippy::should_implement_trait)]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    decode(s.as_bytes())
}

/// Decodes INI read from an I/O stream.
///
/// ```rust
/// use serde_ini_codec::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x = 1\ny = 2\n")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise the errors of [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_point_round_trip() {
        let point = Point { x: 1, y: -2 };
        let ini = to_string(&point).unwrap();
        assert_eq!(ini, "x = 1\ny = -2\n");
        let back: Point = from_str(&ini).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_user_round_trip_with_string_array() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let ini = to_string(&user).unwrap();
        assert_eq!(
            ini,
            "active = true\nid = 123\nname = Alice\ntags[] = admin\ntags[] = user\n"
        );
        let back: User = from_str(&ini).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_encode_rejects_non_documents() {
        assert!(matches!(
            encode(&42, None),
            Err(Error::InvalidInputKind { found: "integer" })
        ));
        assert!(matches!(
            encode("text", None),
            Err(Error::InvalidInputKind { found: "string" })
        ));
    }

    #[test]
    fn test_to_writer_streams_into_sink() {
        let mut out = Vec::new();
        to_writer(&mut out, &Point { x: 3, y: 4 }, &EncodeOptions::new()).unwrap();
        assert_eq!(out, b"x = 3\ny = 4\n");
    }

    #[test]
    fn test_encode_full_accepts_default_section() {
        let mut main = IniMap::new();
        main.insert("name".into(), Value::from("app"));
        let mut doc = IniMap::new();
        doc.insert("main".into(), Value::Section(main));

        assert_eq!(encode_full(&doc, Some("main")).unwrap(), b"name = app\n");
        assert_eq!(encode_full(&doc, None).unwrap(), b"[main]\nname = app\n");
    }

    #[test]
    fn test_decode_rejects_scalar_targets_before_parsing() {
        let err = decode::<u32>(b"[unterminated").unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { .. }));
    }

    #[test]
    fn test_decode_into_keeps_target_on_rebind_failure() {
        let mut point = Point { x: 7, y: 8 };
        let err = decode_into(b"x = one\ny = 2\n", &mut point).unwrap_err();
        assert_eq!(err.path(), Some("x"));
        assert_eq!(point, Point { x: 7, y: 8 });
    }

    #[test]
    fn test_from_reader_reports_read_failures() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "unplugged"))
            }
        }

        let err = from_reader::<_, BTreeMap<String, String>>(Broken).unwrap_err();
        assert!(matches!(err, Error::Io(ref msg) if msg.contains("unplugged")));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let doc: BTreeMap<String, String> = decode(b"k = a\xffb\n").unwrap();
        assert_eq!(doc["k"], "a\u{fffd}b");
    }
}
