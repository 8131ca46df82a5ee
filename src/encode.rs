//! INI encoding engine.
//!
//! Two encoders share the same line format:
//!
//! - **Full mode** ([`encode_full_to`]): heterogeneous documents. Top-level
//!   scalars and string arrays, plus the entries of the default section, go
//!   to a headerless region written first; every other section follows under
//!   its `[name]` header.
//! - **Simple mode** ([`encode_simple_to`]): flat string-to-string sections.
//!   The default section leads, other section names and all keys are sorted,
//!   and each section is followed by a blank line.
//!
//! Named sections are always written in ascending byte order after the
//! headerless region. Nothing is quoted or escaped.
//!
//! ```rust
//! use serde_ini_codec::{encode_full, ini};
//!
//! let doc = ini!({
//!     "name": "demo",
//!     "server": { "host": "localhost", "port": 8080 },
//!     "cache": { "enabled": true }
//! });
//!
//! let out = encode_full(doc.as_section().unwrap(), None).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "name = demo\n[cache]\nenabled = true\n[server]\nhost = localhost\nport = 8080\n"
//! );
//! ```

use std::io::Write;

use tracing::{debug, trace};

use crate::ser::to_value;
use crate::{EncodeOptions, Error, IniMap, Result, SimpleMap, Value};
use serde::Serialize;

/// Writes `key = value` for scalars and `key[] = element` per string array
/// element. Returns `false` when the value has no line form.
fn write_entry<W: Write>(out: &mut W, key: &str, value: &Value) -> Result<bool> {
    if let Some(scalar) = value.as_scalar() {
        writeln!(out, "{} = {}", key, scalar)?;
        return Ok(true);
    }

    match value {
        Value::Strings(items) => {
            for item in items {
                writeln!(out, "{}[] = {}", key, item)?;
            }
            Ok(true)
        }
        // Integer arrays are recognized but have no INI form.
        Value::Integers(_) => Ok(false),
        _ => Ok(false),
    }
}

/// Writes one line per entry of a section.
///
/// Nested sections, integer arrays and unsupported shapes are skipped
/// without error.
pub(crate) fn write_section<W: Write>(out: &mut W, entries: &IniMap, sort_keys: bool) -> Result<()> {
    let write = |out: &mut W, key: &String, value: &Value| -> Result<()> {
        if !write_entry(out, key, value)? {
            trace!(key = %key, kind = value.kind(), "skipping section entry with no ini form");
        }
        Ok(())
    };

    if sort_keys {
        for (key, value) in entries.sorted_entries() {
            write(out, key, value)?;
        }
    } else {
        for (key, value) in entries {
            write(out, key, value)?;
        }
    }

    Ok(())
}

/// Encodes a full-mode document into `writer`.
///
/// The headerless region (top-level scalars and arrays, then the default
/// section's entries, in sorted key order) is written before the named
/// sections. No blank line separates sections.
///
/// # Errors
///
/// Returns [`Error::Write`] if the writer fails. Output already written is
/// not rolled back.
pub fn encode_full_to<W: Write>(writer: &mut W, doc: &IniMap, options: &EncodeOptions) -> Result<()> {
    if doc.is_empty() {
        return Ok(());
    }

    let mut defaults = Vec::with_capacity(256);
    let mut sections = Vec::with_capacity(256);

    for (key, value) in doc.sorted_entries() {
        match value {
            Value::Section(entries) if options.is_default_section(key) => {
                write_section(&mut defaults, entries, options.sort_keys)?;
            }
            Value::Section(entries) => {
                writeln!(sections, "[{}]", key)?;
                write_section(&mut sections, entries, options.sort_keys)?;
            }
            other => {
                if !write_entry(&mut defaults, key, other)? {
                    trace!(key = %key, kind = other.kind(), "skipping top-level value with no ini form");
                }
            }
        }
    }

    writer.write_all(&defaults)?;
    writer.write_all(&sections)?;
    Ok(())
}

/// Encodes a simple-mode document into `writer`.
///
/// Output is byte-for-byte deterministic: the default section comes first
/// without a header, the other sections and all keys are sorted, and every
/// section, including the last, ends with a blank line.
/// [`EncodeOptions::sort_keys`] has no effect here.
///
/// # Errors
///
/// Returns [`Error::Write`] if the writer fails.
pub fn encode_simple_to<W: Write>(
    writer: &mut W,
    doc: &SimpleMap,
    options: &EncodeOptions,
) -> Result<()> {
    // Default section first, then byte order.
    let mut names: Vec<&String> = doc.keys().collect();
    names.sort_unstable_by_key(|name| (!options.is_default_section(name), *name));

    for name in names {
        if !options.is_default_section(name) {
            writeln!(writer, "[{}]", name)?;
        }

        let items = &doc[name];
        let mut keys: Vec<&String> = items.keys().collect();
        keys.sort_unstable();
        for key in keys {
            writeln!(writer, "{} = {}", key, items[key])?;
        }

        writeln!(writer)?;
    }

    Ok(())
}

/// Returns the document as a simple-mode map when every top-level value is
/// a section holding only strings.
fn as_simple(doc: &IniMap) -> Option<SimpleMap> {
    if doc.is_empty() {
        return None;
    }

    doc.iter()
        .map(|(name, value)| {
            let section = value.as_section()?;
            let items = section
                .iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect::<Option<_>>()?;
            Some((name.clone(), items))
        })
        .collect()
}

/// Captures the shape of `value` and dispatches to the matching encoder.
///
/// Dispatch looks at the captured tree only, so any input whose top-level
/// values are all string-only sections takes the simple-mode path.
///
/// # Errors
///
/// - [`Error::InvalidInputKind`] if `value` is not a map or struct
/// - [`Error::Custom`] if serializing `value` fails
/// - [`Error::Write`] if the writer fails
pub fn encode_to<W, T>(writer: &mut W, value: &T, options: &EncodeOptions) -> Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    let doc = match to_value(value)? {
        Value::Section(doc) => doc,
        other => {
            return Err(Error::InvalidInputKind {
                found: other.kind(),
            })
        }
    };

    match as_simple(&doc) {
        Some(simple) => {
            debug!(sections = simple.len(), "encoding ini document in simple mode");
            encode_simple_to(writer, &simple, options)
        }
        None => {
            debug!(entries = doc.len(), "encoding ini document in full mode");
            encode_full_to(writer, &doc, options)
        }
    }
}
