//! INI text parser.
//!
//! Produces the structured representation the decode bridge rebinds from.
//! The accepted dialect is deliberately small; see the [`format`](crate::format)
//! module for the full grammar.
//!
//! ```rust
//! use serde_ini_codec::parser::parse_full;
//! use serde_ini_codec::Value;
//!
//! let doc = parse_full("name = demo\n[server]\nport = 8080\n", None).unwrap();
//! assert_eq!(doc.get("name"), Some(&Value::from("demo")));
//! assert!(doc.get("server").is_some_and(Value::is_section));
//! ```

use indexmap::IndexMap;

use crate::options::DEFAULT_SECTION;
use crate::{Error, IniMap, ParseMode, ParseOptions, Result, SimpleMap, Value};

/// Byte Order Mark as it appears at the start of a decoded UTF-8 string.
const BOM: char = '\u{feff}';

/// Output of [`parse`], shaped by [`ParseMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Full(IniMap),
    Simple(SimpleMap),
}

/// One classified line of input.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Section(&'a str),
    Entry {
        key: &'a str,
        value: &'a str,
        is_array: bool,
    },
}

/// Parses `text` according to `options`.
///
/// # Errors
///
/// Returns [`Error::Syntax`] with the 1-based line and column of the first
/// malformed line.
pub fn parse(text: &str, options: &ParseOptions) -> Result<Parsed> {
    let default_section = options.default_section.as_deref();
    match options.mode {
        ParseMode::Full => parse_full(text, default_section).map(Parsed::Full),
        ParseMode::Simple => parse_simple(text, default_section).map(Parsed::Simple),
    }
}

/// Parses `text` into a full-mode document.
///
/// Top-level entries stay at the document root unless `default_section`
/// names a section to collect them into. Sections come after root entries,
/// in order of first appearance.
///
/// # Errors
///
/// Returns [`Error::Syntax`] on malformed input, or when a section header
/// reuses the name of a top-level key.
pub fn parse_full(text: &str, default_section: Option<&str>) -> Result<IniMap> {
    let mut root = IniMap::new();
    let mut sections: IndexMap<String, IniMap> = IndexMap::new();
    let mut current: Option<String> = default_section.map(str::to_string);

    for_each_line(text, |line, number, raw| {
        match line {
            Line::Blank => {}
            Line::Section(name) => {
                if root.contains_key(name) {
                    return Err(Error::syntax(
                        number,
                        indent_column(raw),
                        "section name is already used by a top-level key",
                        raw,
                    ));
                }
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
            }
            Line::Entry {
                key,
                value,
                is_array,
            } => {
                let target = match &current {
                    Some(name) => sections.entry(name.clone()).or_default(),
                    None => &mut root,
                };
                collect_full(target, key, value, is_array);
            }
        }
        Ok(())
    })?;

    for (name, entries) in sections {
        root.insert(name, Value::Section(entries));
    }
    Ok(root)
}

/// Parses `text` into flat string sections.
///
/// Top-level entries go into `default_section`, or [`DEFAULT_SECTION`] when
/// none is given. A `key[]` line stores its value under `key`, so the last
/// element wins.
///
/// # Errors
///
/// Returns [`Error::Syntax`] on malformed input.
pub fn parse_simple(text: &str, default_section: Option<&str>) -> Result<SimpleMap> {
    let mut doc = SimpleMap::new();
    let mut current = default_section.unwrap_or(DEFAULT_SECTION).to_string();

    for_each_line(text, |line, _, _| {
        match line {
            Line::Blank => {}
            Line::Section(name) => {
                doc.entry(name.to_string()).or_default();
                current = name.to_string();
            }
            Line::Entry { key, value, .. } => {
                doc.entry(current.clone())
                    .or_default()
                    .insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    })?;

    Ok(doc)
}

fn collect_full(target: &mut IniMap, key: &str, value: &str, is_array: bool) {
    if !is_array {
        target.insert(key.to_string(), Value::String(value.to_string()));
        return;
    }

    match target.get_mut(key) {
        Some(Value::Strings(items)) => items.push(value.to_string()),
        _ => {
            target.insert(key.to_string(), Value::Strings(vec![value.to_string()]));
        }
    }
}

fn for_each_line<'a, F>(text: &'a str, mut handle: F) -> Result<()>
where
    F: FnMut(Line<'a>, usize, &'a str) -> Result<()>,
{
    let text = text.strip_prefix(BOM).unwrap_or(text);
    for (index, raw) in text.lines().enumerate() {
        handle(classify(raw, index + 1)?, index + 1, raw)?;
    }
    Ok(())
}

/// Column (1-based, in characters) of the first non-blank character.
fn indent_column(raw: &str) -> usize {
    raw.chars().take_while(|c| c.is_whitespace()).count() + 1
}

fn classify(raw: &str, line: usize) -> Result<Line<'_>> {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
        return Ok(Line::Blank);
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let name = rest.strip_suffix(']').ok_or_else(|| {
            Error::syntax(
                line,
                indent_column(raw) + trimmed.chars().count(),
                "expected ']' to close section header",
                raw,
            )
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::syntax(line, indent_column(raw), "section name cannot be empty", raw));
        }
        return Ok(Line::Section(name));
    }

    let (key, value) = trimmed.split_once('=').ok_or_else(|| {
        Error::syntax(line, indent_column(raw), "expected '=' after key", raw)
    })?;

    let key = key.trim();
    let (key, is_array) = match key.strip_suffix("[]") {
        Some(stripped) => (stripped.trim_end(), true),
        None => (key, false),
    };
    if key.is_empty() {
        return Err(Error::syntax(line, indent_column(raw), "missing key before '='", raw));
    }

    Ok(Line::Entry {
        key,
        value: unquote(value.trim()),
        is_array,
    })
}

/// Strips one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_root_entries_sections_and_arrays() {
        let text = "
; leading comment
name = app
# another comment
tags[] = a
tags[] = b

[server]
host = localhost
port = 8080
";
        let doc = parse_full(text, None).unwrap();

        assert_eq!(doc.get("name"), Some(&Value::from("app")));
        assert_eq!(
            doc.get("tags"),
            Some(&Value::Strings(vec!["a".into(), "b".into()]))
        );
        let server = doc.get("server").and_then(Value::as_section).unwrap();
        assert_eq!(server.get("host"), Some(&Value::from("localhost")));
        assert_eq!(server.get("port"), Some(&Value::from("8080")));
    }

    #[test]
    fn test_root_entries_come_before_sections() {
        let doc = parse_full("[s]\na = 1\n", None).unwrap();
        let keys: Vec<_> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["s"]);

        let doc = parse_full("top = 1\n[s]\na = 1\n", None).unwrap();
        let keys: Vec<_> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["top", "s"]);
    }

    #[test]
    fn test_default_section_collects_top_level_entries() {
        let doc = parse_full("name = app\n[main]\nmode = dev\n", Some("main")).unwrap();
        let main = doc.get("main").and_then(Value::as_section).unwrap();
        assert_eq!(main.get("name"), Some(&Value::from("app")));
        assert_eq!(main.get("mode"), Some(&Value::from("dev")));
        assert!(!doc.contains_key("name"));
    }

    #[test]
    fn test_reopened_sections_merge_and_last_value_wins() {
        let doc = parse_full("[s]\na = 1\n[t]\nb = 2\n[s]\na = 3\nc = 4\n", None).unwrap();
        let s = doc.get("s").and_then(Value::as_section).unwrap();
        assert_eq!(s.get("a"), Some(&Value::from("3")));
        assert_eq!(s.get("c"), Some(&Value::from("4")));
    }

    #[test]
    fn test_quotes_are_stripped_and_inner_equals_kept() {
        let doc = parse_full("a = \"x = y\"\nb = 'z'\nc = \"\nd = k=v\n", None).unwrap();
        assert_eq!(doc.get("a"), Some(&Value::from("x = y")));
        assert_eq!(doc.get("b"), Some(&Value::from("z")));
        assert_eq!(doc.get("c"), Some(&Value::from("\"")));
        assert_eq!(doc.get("d"), Some(&Value::from("k=v")));
    }

    #[test]
    fn test_empty_values_are_allowed() {
        let doc = parse_full("a =\n", None).unwrap();
        assert_eq!(doc.get("a"), Some(&Value::from("")));
    }

    #[test]
    fn test_crlf_and_bom_are_handled() {
        let doc = parse_full("\u{feff}[s]\r\na = 1\r\n", None).unwrap();
        let s = doc.get("s").and_then(Value::as_section).unwrap();
        assert_eq!(s.get("a"), Some(&Value::from("1")));
    }

    #[test]
    fn test_missing_equals_reports_position() {
        let err = parse_full("a = 1\n  oops\n", None).unwrap_err();
        match err {
            Error::Syntax { line, col, context, .. } => {
                assert_eq!(line, 2);
                assert_eq!(col, 3);
                assert_eq!(context, "  oops");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_and_empty_headers_fail() {
        assert!(matches!(
            parse_full("[server\n", None),
            Err(Error::Syntax { line: 1, col: 8, .. })
        ));
        assert!(matches!(
            parse_full("\n[  ]\n", None),
            Err(Error::Syntax { line: 2, .. })
        ));
    }

    #[test]
    fn test_section_named_like_root_key_fails() {
        let err = parse_full("s = 1\n\n  [s]\nk = v\n", None).unwrap_err();
        match err {
            Error::Syntax { line, col, context, .. } => {
                assert_eq!(line, 3);
                assert_eq!(col, 3);
                assert_eq!(context, "  [s]");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }

        // Collected into a named default section, the same keys do not collide.
        let doc = parse_full("s = 1\n[s]\nk = v\n", Some("main")).unwrap();
        assert!(doc.get("main").and_then(Value::as_section).is_some());
        assert!(doc.get("s").and_then(Value::as_section).is_some());
    }

    #[test]
    fn test_empty_key_fails() {
        assert!(matches!(parse_full("= v\n", None), Err(Error::Syntax { .. })));
        assert!(matches!(parse_full("[] = v\n", None), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_simple_mode_uses_default_section_name() {
        let doc = parse_simple("a = 1\n[s]\nb = 2\n", None).unwrap();
        assert_eq!(doc[DEFAULT_SECTION]["a"], "1");
        assert_eq!(doc["s"]["b"], "2");

        let doc = parse_simple("a = 1\n", Some("main")).unwrap();
        assert_eq!(doc["main"]["a"], "1");
    }

    #[test]
    fn test_simple_mode_keeps_last_array_element() {
        let doc = parse_simple("[s]\nk[] = a\nk[] = b\n", None).unwrap();
        assert_eq!(doc["s"]["k"], "b");
    }

    #[test]
    fn test_parse_dispatches_on_mode() {
        let parsed = parse("a = 1\n", &ParseOptions::simple()).unwrap();
        assert!(matches!(parsed, Parsed::Simple(_)));

        let parsed = parse("a = 1\n", &ParseOptions::full()).unwrap();
        assert!(matches!(parsed, Parsed::Full(_)));
    }
}
