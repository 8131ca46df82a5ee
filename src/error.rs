//! Error types for INI encoding and decoding.
//!
//! ## Error Categories
//!
//! - **Invalid input**: the value given to [`encode`](crate::encode) is not a
//!   document (a map or struct at the top level)
//! - **Invalid target**: the type given to [`decode`](crate::decode) cannot
//!   receive a document; detected before any parsing
//! - **Syntax errors**: malformed INI text, with line/column information
//! - **Decode errors**: the parsed document does not fit the target type,
//!   with the path of the offending field
//! - **Write errors**: the output sink rejected a write
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_codec::{decode, Error};
//! use std::collections::HashMap;
//!
//! let result: Result<HashMap<String, String>, Error> = decode(b"[broken");
//! assert!(matches!(result, Err(Error::Syntax { line: 1, .. })));
//! ```

use std::{fmt, io};
use thiserror::Error;

/// Represents all possible errors that can occur during INI encoding/decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The value to encode is not shaped like an INI document.
    #[error("ini: invalid data to encode as ini: expected a map or struct, found {found}")]
    InvalidInputKind { found: &'static str },

    /// The decode target cannot receive a document.
    #[error("ini: cannot decode into {target}: it deserializes from {requested}, not a map")]
    InvalidTarget {
        target: &'static str,
        requested: &'static str,
    },

    /// Malformed INI text.
    #[error("ini: syntax error at line {line}, column {col}: {msg}\n{context}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// The parsed document does not fit the target shape.
    #[error("ini: cannot decode {}: {msg}", path_or_root(.path))]
    Decode { path: String, msg: String },

    /// The output sink rejected a write.
    #[error("ini: write failed: {0}")]
    Write(String),

    /// Reading the input failed.
    #[error("ini: read failed: {0}")]
    Io(String),

    /// Custom serialization error.
    #[error("ini: {0}")]
    Custom(String),
}

fn path_or_root(path: &str) -> &str {
    if path.is_empty() {
        "document"
    } else {
        path
    }
}

impl Error {
    /// Creates a syntax error for the given 1-based position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_codec::Error;
    ///
    /// let err = Error::syntax(3, 1, "expected '='", "oops");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode {
            path: String::new(),
            msg: msg.to_string(),
        }
    }

    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Prefixes the path of a decode error with the field it occurred in.
    ///
    /// Other errors pass through unchanged.
    ///
    /// ```rust
    /// use serde_ini_codec::Error;
    ///
    /// let err = Error::decode("invalid digit").within("port").within("server");
    /// assert!(err.to_string().contains("server.port"));
    /// ```
    #[must_use]
    pub fn within(self, segment: &str) -> Self {
        match self {
            Error::Decode { path, msg } => {
                let path = if path.is_empty() {
                    segment.to_string()
                } else if path.starts_with('[') {
                    format!("{}{}", segment, path)
                } else {
                    format!("{}.{}", segment, path)
                };
                Error::Decode { path, msg }
            }
            other => other,
        }
    }

    /// Returns the field path of a decode error.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Decode { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Write(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::decode(msg)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
