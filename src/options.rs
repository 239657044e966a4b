//! Configuration options for keyfile encoding and decoding.
//!
//! - [`KeyFileOptions`]: default list separator and output layout
//!
//! ## Examples
//!
//! ```rust
//! use serde_keyfile::{to_string_with_options, KeyFileOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Entry { name: String, tags: Vec<String> }
//!
//! #[derive(Serialize)]
//! struct File {
//!     #[serde(rename = "Desktop Entry")]
//!     entry: Entry,
//! }
//!
//! let file = File {
//!     entry: Entry { name: "Editor".to_string(), tags: vec!["a".to_string(), "b".to_string()] },
//! };
//!
//! let options = KeyFileOptions::pretty().with_separator(",");
//! let text = to_string_with_options(&file, &options).unwrap();
//! assert_eq!(text, "[Desktop Entry]\nname = Editor\ntags = a,b\n");
//! ```

pub(crate) const DEFAULT_SEPARATOR: &str = ";";

/// Configuration options for keyfile encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::KeyFileOptions;
///
/// // Default compact options: `key=value`, `;` separated lists
/// let options = KeyFileOptions::new();
/// assert_eq!(options.separator, ";");
/// assert!(!options.pretty);
///
/// // `key = value`, `|` separated lists
/// let options = KeyFileOptions::pretty().with_separator("|");
/// assert!(options.pretty);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFileOptions {
    /// Separator for list fields without a `sep` directive.
    pub separator: String,
    /// Write `key = value` instead of `key=value`.
    pub pretty: bool,
}

impl Default for KeyFileOptions {
    fn default() -> Self {
        KeyFileOptions {
            separator: DEFAULT_SEPARATOR.to_string(),
            pretty: false,
        }
    }
}

impl KeyFileOptions {
    /// Creates default options (compact lines, `;` separator).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for output with spaces around `=`.
    #[must_use]
    pub fn pretty() -> Self {
        KeyFileOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the default list separator.
    ///
    /// An empty separator falls back to `;`.
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = if separator.is_empty() {
            DEFAULT_SEPARATOR.to_string()
        } else {
            separator.to_string()
        };
        self
    }

    /// Sets whether `=` is surrounded by spaces in output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
