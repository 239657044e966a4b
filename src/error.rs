//! Error types for keyfile serialization and deserialization.
//!
//! Every failure is surfaced to the caller; the codec never tries to recover.
//!
//! ## Error Categories
//!
//! - **Parameter errors**: the record is not a struct or map
//! - **Syntax errors**: malformed document lines, with line number and line text
//! - **Type errors**: a group, field or map key bound to a kind the format cannot express
//! - **Tag errors**: a malformed directive tag on a field
//! - **Conversion errors**: a raw value that cannot be parsed at the field's type,
//!   attributed to the key and field it came from
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_keyfile::{from_str, Error, SyntaxErrorKind};
//!
//! #[derive(Deserialize, Debug)]
//! struct Config {}
//!
//! let result: Result<Config, Error> = from_str("key = 1");
//! match result {
//!     Err(Error::Syntax { line, kind, .. }) => {
//!         assert_eq!(line, 1);
//!         assert_eq!(kind, SyntaxErrorKind::KeyOutsideGroup);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// The kind of structural problem found while scanning a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `[ ]` header whose trimmed name is empty.
    EmptyGroupName,
    /// A key-value line before any group header.
    KeyOutsideGroup,
    /// A line that is neither a header, a comment, nor contains `=`.
    MissingEquals,
    /// A key-value line whose key is empty.
    EmptyKey,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SyntaxErrorKind::EmptyGroupName => "group name must not be empty",
            SyntaxErrorKind::KeyOutsideGroup => "key-value pair must be in a group",
            SyntaxErrorKind::MissingEquals => "expected `key = value` or `[group]`",
            SyntaxErrorKind::EmptyKey => "key name must not be empty",
        };
        f.write_str(msg)
    }
}

/// Represents all possible errors that can occur during keyfile serialization/deserialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The value passed to encode/decode is not a struct or map
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Structural error in the document text
    #[error("Syntax error at line {line}: {kind}\n{context}")]
    Syntax {
        line: usize,
        kind: SyntaxErrorKind,
        context: String,
    },

    /// A top-level field bound to something other than a struct or map
    #[error("Invalid group type: group `{group}` must be a struct or map, found {found}")]
    InvalidGroupType { group: String, found: String },

    /// A value kind outside the supported type matrix
    #[error("Unsupported value type: field `{field}` has unsupported type {kind}")]
    UnsupportedType { field: String, kind: String },

    /// A map whose keys are not strings
    #[error("Invalid map key type: keys of `{map}` must be strings")]
    MapKeyNotString { map: String },

    /// A group name, key or subkey that cannot be written as a keyfile line
    #[error("Invalid name `{name}`: {reason}")]
    InvalidName { name: String, reason: String },

    /// A directive tag that does not follow the tag grammar
    #[error("Invalid tag `{tag}`: {reason}")]
    InvalidTag { tag: String, reason: String },

    /// A raw value that cannot be converted to the field's type
    #[error(
        "Conversion error at line {line}: cannot parse key `{key}` into field `{field}` of type {target}: {reason}"
    )]
    Conversion {
        line: usize,
        key: String,
        field: String,
        target: String,
        reason: String,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error for the given 1-based line and its text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_keyfile::{Error, SyntaxErrorKind};
    ///
    /// let err = Error::syntax(3, SyntaxErrorKind::EmptyKey, " = value");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, kind: SyntaxErrorKind, context: &str) -> Self {
        Error::Syntax {
            line,
            kind,
            context: context.to_string(),
        }
    }

    /// Creates a parameter error for a record that is not a struct or map.
    pub fn invalid_parameter(found: &str) -> Self {
        Error::InvalidParameter(format!("expected a struct or map, found {}", found))
    }

    /// Creates a group type error.
    pub fn invalid_group_type(group: &str, found: &str) -> Self {
        Error::InvalidGroupType {
            group: group.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for a field.
    pub fn unsupported_type(field: &str, kind: &str) -> Self {
        Error::UnsupportedType {
            field: field.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Creates a map key error.
    pub fn map_key_not_string(map: &str) -> Self {
        Error::MapKeyNotString {
            map: map.to_string(),
        }
    }

    /// Creates a tag error.
    pub fn invalid_tag(tag: &str, reason: &str) -> Self {
        Error::InvalidTag {
            tag: tag.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_keyfile::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an error for a group name, key or subkey the line grammar cannot hold.
    pub fn invalid_name(name: &str, reason: &str) -> Self {
        Error::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Attributes a serde-originated message to the field it came from.
    pub(crate) fn for_field(self, line: usize, key: &str, field: &str, target: &str) -> Self {
        match self {
            Error::Custom(reason) => Error::Conversion {
                line,
                key: key.to_string(),
                field: field.to_string(),
                target: target.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// The source line this error refers to, when it has one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } => Some(*line),
            Error::Conversion { line, .. } if *line > 0 => Some(*line),
            _ => None,
        }
    }
}

/// A readable name for `T` to report as a conversion target.
///
/// Module paths are dropped (`alloc::vec::Vec<i8>` becomes `Vec<i8>`), and the
/// wrappers serde generates for `with` attributes are reported as a custom type.
pub(crate) fn type_label<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    if full
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|ident| ident.starts_with("__"))
    {
        return "custom type".to_string();
    }

    let mut label = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            label.push_str(last_segment(&path));
            path.clear();
            label.push(c);
        }
    }
    label.push_str(last_segment(&path));
    label
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
