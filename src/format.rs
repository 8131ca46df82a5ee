//! The INI dialect read and written by this crate.
//!
//! # Lines
//!
//! Text is line-oriented. Lines end in `\n`; the parser also accepts `\r\n`
//! and ignores a leading byte order mark.
//!
//! ```text
//! ; comment
//! # also a comment
//! name = demo
//! tags[] = web
//! tags[] = api
//!
//! [server]
//! host = localhost
//! port = 8080
//! ```
//!
//! | Line | Meaning |
//! |------|---------|
//! | blank, `;...`, `#...` | ignored |
//! | `[name]` | opens section `name` (name is trimmed, must not be empty) |
//! | `key = value` | scalar entry; key and value are trimmed |
//! | `key[] = value` | appends `value` to the string array `key` |
//!
//! Entries before the first header belong to the document root. Comments
//! must start the line; a `;` after a value is part of the value.
//!
//! # Values
//!
//! Every parsed value is a string. A value wrapped in one pair of matching
//! `"` or `'` quotes has them removed; there are no escape sequences and no
//! multi-line values. Types come from the decode target: `"8080"` becomes a
//! `u16` when the target field is a `u16`, and `on`, `yes` or `1` become
//! `true` when it is a `bool`.
//!
//! When the same key appears twice in a section the last line wins. A
//! section opened twice collects the entries of both. A section header that
//! reuses the name of a top-level key is a syntax error.
//!
//! # Output
//!
//! The encoder writes:
//!
//! - scalars as `key = value`, with floats in their shortest round-trip form
//!   (`0.5`, `3`), in exponent form outside `1e-4..1e21` (`1e+300`), and
//!   as `+Inf`, `-Inf` or `NaN` when not finite
//! - string arrays as one `key[] = element` line per element
//! - nested maps as `[name]` followed by their entries
//!
//! Nothing is quoted or escaped, so a string containing a newline, `=` or
//! brackets will not read back as written. Integer arrays, `None`, floats
//! and booleans inside arrays, and maps nested deeper than one level are
//! skipped.
//!
//! ```rust
//! use serde_ini_codec::{encode, parser::parse_full, Value};
//! use std::collections::BTreeMap;
//!
//! let doc = BTreeMap::from([("greeting", "a = b")]);
//! let ini = encode(&doc, None).unwrap();
//! assert_eq!(ini, b"greeting = a = b\n");
//!
//! let parsed = parse_full(std::str::from_utf8(&ini).unwrap(), None).unwrap();
//! assert_eq!(parsed.get("greeting"), Some(&Value::from("a = b")));
//! ```
//!
//! # Section Order
//!
//! Section names are always written in ascending byte order, regardless of
//! input order, and headerless entries come first. In simple mode (every
//! top-level value is a section of strings) keys are sorted too and each
//! section is followed by a blank line. In full mode, keys inside a section
//! keep the order the data produced them in unless
//! [`EncodeOptions::sort_keys`](crate::EncodeOptions::sort_keys) is set.
