//! Configuration options for INI encoding and parsing.
//!
//! - [`EncodeOptions`]: default section name and in-section key ordering
//! - [`ParseOptions`]: parser mode and default section handling
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_codec::{encode_with_options, EncodeOptions};
//! use std::collections::BTreeMap;
//!
//! let mut doc = BTreeMap::new();
//! doc.insert("main", BTreeMap::from([("name", "demo")]));
//! doc.insert("db", BTreeMap::from([("host", "localhost")]));
//!
//! let options = EncodeOptions::new().with_default_section("main");
//! let ini = encode_with_options(&doc, &options).unwrap();
//! assert_eq!(String::from_utf8(ini).unwrap(), "name = demo\n\n[db]\nhost = localhost\n\n");
//! ```

/// Section name the parser uses for top-level entries in simple mode when
/// no other default section is configured.
pub const DEFAULT_SECTION: &str = "__default";

/// Configuration for the encoders.
///
/// # Examples
///
/// ```rust
/// use serde_ini_codec::EncodeOptions;
///
/// let options = EncodeOptions::new()
///     .with_default_section("general")
///     .with_sorted_keys(true);
/// assert_eq!(options.default_section.as_deref(), Some("general"));
/// assert!(options.sort_keys);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Section written without a `[name]` header, ahead of all others.
    pub default_section: Option<String>,
    /// Sort keys inside full-mode sections. Simple mode always sorts.
    pub sort_keys: bool,
}

impl EncodeOptions {
    /// Creates default options: no default section, entries in map order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_sorted_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub(crate) fn from_default_section(name: Option<&str>) -> Self {
        EncodeOptions {
            default_section: name.map(str::to_string),
            sort_keys: false,
        }
    }

    pub(crate) fn is_default_section(&self, name: &str) -> bool {
        self.default_section.as_deref() == Some(name)
    }
}

/// Shape of the parser's output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Sections, scalars and `key[]` arrays as a [`Value`](crate::Value) tree.
    #[default]
    Full,
    /// Flat string-to-string sections.
    Simple,
}

/// Configuration for [`parse`](crate::parser::parse).
///
/// The default is full mode without a default section, which is what
/// [`decode`](crate::decode) uses.
///
/// # Examples
///
/// ```rust
/// use serde_ini_codec::{ParseMode, ParseOptions};
///
/// let options = ParseOptions::simple().with_default_section("main");
/// assert_eq!(options.mode, ParseMode::Simple);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: ParseMode,
    /// Where top-level entries are collected. `None` keeps them at the
    /// document root in full mode and uses [`DEFAULT_SECTION`] in simple mode.
    pub default_section: Option<String>,
}

impl ParseOptions {
    #[must_use]
    pub fn full() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn simple() -> Self {
        ParseOptions {
            mode: ParseMode::Simple,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_section_match_is_exact() {
        let options = EncodeOptions::new().with_default_section("main");
        assert!(options.is_default_section("main"));
        assert!(!options.is_default_section("Main"));
        assert!(!EncodeOptions::new().is_default_section(""));
    }

    #[test]
    fn test_from_default_section_keeps_map_order() {
        let options = EncodeOptions::from_default_section(Some("x"));
        assert_eq!(options.default_section.as_deref(), Some("x"));
        assert!(!options.sort_keys);
    }
}
