//! # serde_keyfile
//!
//! A Serde-compatible codec for keyfiles: the grouped `key=value` text format used
//! by desktop entries and many application settings files.
//!
//! ## What is a keyfile?
//!
//! An INI dialect with a few extras:
//!
//! ```text
//! # comment
//! [Desktop Entry]
//! Name = Editor
//! Name[de] = Bearbeiter
//! Keywords = text;edit;
//! Comment = \sleading space kept
//! ```
//!
//! Values are escaped (`\s`, `\n`, `\t`, `\r`), lists are separated by `;` (or a
//! per-field separator) and keys may carry locale/variant subkeys in brackets. The
//! full grammar is described in [`format`].
//!
//! ## Key Features
//!
//! - **Typed binding**: groups map to structs, keys map to fields, via
//!   `#[derive(Serialize, Deserialize)]`
//! - **Full scalar matrix**: integers of every width, floats, complex numbers,
//!   booleans, chars, strings and unit enums
//! - **Lists, locale maps and options**: `Vec<T>`, `HashMap<String, T>`, `Option<T>`
//! - **Field directives**: rename, ignore, `omitempty` and custom list separators,
//!   written in the serde field name (see [`tag`])
//! - **Polymorphic values**: [`Value`] infers integer, float, bool, complex or string
//! - **User hooks**: [`hook::TextCodec`] for types with their own text form
//! - **Deterministic output**: groups, keys and subkeys are written sorted
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_keyfile = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use std::collections::BTreeMap;
//! use serde_keyfile::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct DesktopEntry {
//!     #[serde(rename = "Name")]
//!     name: BTreeMap<String, String>,
//!     #[serde(rename = "Keywords,omitempty")]
//!     keywords: Vec<String>,
//!     #[serde(rename = "Terminal")]
//!     terminal: bool,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct File {
//!     #[serde(rename = "Desktop Entry")]
//!     entry: DesktopEntry,
//! }
//!
//! let text = "[Desktop Entry]\nName = Editor\nName[de] = Bearbeiter\nKeywords = text;edit\nTerminal = false\n";
//! let file: File = from_str(text).unwrap();
//! assert_eq!(file.entry.name["de"], "Bearbeiter");
//! assert_eq!(file.entry.keywords, vec!["text", "edit"]);
//!
//! let written = to_string(&file).unwrap();
//! assert_eq!(
//!     written,
//!     "[Desktop Entry]\nKeywords=text;edit\nName=Editor\nName[de]=Bearbeiter\nTerminal=false\n"
//! );
//! assert_eq!(from_str::<File>(&written).unwrap(), file);
//! ```
//!
//! ### Working with the Document Directly
//!
//! ```rust
//! use serde_keyfile::Document;
//!
//! let doc = Document::parse("[a]\nx = 1\nx[fr] = un").unwrap();
//! for entry in doc.entries() {
//!     println!("[{}] {}[{}] = {}", entry.group, entry.key, entry.subkey, entry.value);
//! }
//! ```
//!
//! ## Behaviour Notes
//!
//! - Groups and keys absent from the input decode to the zero value of their type
//!   (`0`, `""`, `false`, empty list, `None`, first enum variant)
//! - Unknown groups and keys are ignored
//! - An empty value decodes as `None` for `Option` fields, so `Some("")` does not
//!   survive a round trip
//! - Floats are written in their shortest round-trip form (`7.0` for integral
//!   values), complex numbers as `(a+bi)`
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: `debug!` for each parsed or written
//! document and `trace!` for group and list binding. Install any logger to see it.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`desktop_entry.rs`** - reading and writing a desktop entry file
//!
//! Run it with: `cargo run --example desktop_entry`

pub mod de;
pub mod document;
pub mod error;
pub mod escape;
pub mod format;
pub mod hook;
pub mod options;
pub mod ser;
pub mod tag;
pub mod value;

pub use de::Deserializer;
pub use document::{Document, Entry, EntryRef, Group, RawValue};
pub use error::{Error, Result, SyntaxErrorKind};
pub use hook::TextCodec;
pub use options::KeyFileOptions;
pub use ser::Serializer;
pub use tag::Directives;
pub use value::Value;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` into a [`Document`].
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map of groups, or holds a value the
/// format cannot express.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    to_document_with_options(value, &KeyFileOptions::default())
}

/// Serialize any `T: Serialize` into a [`Document`] with custom options.
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map of groups, or holds a value the
/// format cannot express.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_document_with_options<T>(value: &T, options: &KeyFileOptions) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options.clone());
    value.serialize(&mut serializer)?;
    let document = serializer.into_document();
    debug!("encoded keyfile document with {} groups", document.len());
    Ok(document)
}

/// Serialize any `T: Serialize` to keyfile text.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Window { width: u32, height: u32 }
///
/// #[derive(Serialize)]
/// struct Settings { window: Window }
///
/// let settings = Settings { window: Window { width: 800, height: 600 } };
/// assert_eq!(to_string(&settings).unwrap(), "[window]\nheight=600\nwidth=800\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized (e.g., unsupported types).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &KeyFileOptions::default())
}

/// Serialize any `T: Serialize` to keyfile text with spaces around `=`.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::to_string_pretty;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Window { title: String }
///
/// #[derive(Serialize)]
/// struct Settings { window: Window }
///
/// let settings = Settings { window: Window { title: "Main".to_string() } };
/// assert_eq!(to_string_pretty(&settings).unwrap(), "[window]\ntitle = Main\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &KeyFileOptions::pretty())
}

/// Serialize any `T: Serialize` to keyfile text with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &KeyFileOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let document = to_document_with_options(value, options)?;
    Ok(document.to_string_with_options(options))
}

/// Serialize any `T: Serialize` to a writer as keyfile text.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Window { width: u32 }
///
/// #[derive(Serialize)]
/// struct Settings { window: Window }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Settings { window: Window { width: 1 } }).unwrap();
/// assert_eq!(buffer, b"[window]\nwidth=1\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a parsed [`Document`].
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map of groups, or a value cannot be
/// converted to its field's type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document<T>(document: &Document) -> Result<T>
where
    T: DeserializeOwned,
{
    from_document_with_options(document, &KeyFileOptions::default())
}

/// Deserialize an instance of type `T` from a parsed [`Document`] with custom options.
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map of groups, or a value cannot be
/// converted to its field's type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document_with_options<T>(document: &Document, options: &KeyFileOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::new(document, options))
}

/// Deserialize an instance of type `T` from keyfile text.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Window { width: u32, height: u32 }
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Settings { window: Window }
///
/// let settings: Settings = from_str("[window]\nwidth = 800\nheight = 600").unwrap();
/// assert_eq!(settings.window, Window { width: 800, height: 600 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not a valid keyfile or cannot be bound to
/// type `T`. Syntax and conversion errors carry the line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &KeyFileOptions::default())
}

/// Deserialize an instance of type `T` from keyfile text with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::{from_str_with_options, KeyFileOptions};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Paths { search: Vec<String> }
///
/// #[derive(Deserialize)]
/// struct Settings { paths: Paths }
///
/// let options = KeyFileOptions::new().with_separator(":");
/// let settings: Settings = from_str_with_options("[paths]\nsearch = /bin:/usr/bin", &options).unwrap();
/// assert_eq!(settings.paths.search, vec!["/bin", "/usr/bin"]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is not a valid keyfile or cannot be bound to
/// type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &KeyFileOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let document = Document::parse(s)?;
    from_document_with_options(&document, options)
}

/// Deserialize an instance of type `T` from an I/O stream of keyfile text.
///
/// # Examples
///
/// ```rust
/// use serde_keyfile::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Window { width: u32 }
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Settings { window: Window }
///
/// let cursor = Cursor::new(b"[window]\nwidth = 3");
/// let settings: Settings = from_reader(cursor).unwrap();
/// assert_eq!(settings.window.width, 3);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not a valid
/// keyfile, or the data cannot be bound to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of keyfile text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a valid keyfile, or
/// cannot be bound to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Window {
        width: u32,
        height: u32,
        title: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Settings {
        window: Window,
        user: User,
    }

    fn settings() -> Settings {
        Settings {
            window: Window {
                width: 800,
                height: 600,
                title: "Main window".to_string(),
            },
            user: User {
                id: 123,
                name: "Alice".to_string(),
                active: true,
                tags: vec!["admin".to_string(), "user".to_string()],
            },
        }
    }

    #[test]
    fn test_serialize_deserialize_settings() {
        let text = to_string(&settings()).unwrap();
        assert_eq!(
            text,
            "[user]\nactive=true\nid=123\nname=Alice\ntags=admin;user\n\n\
             [window]\nheight=600\ntitle=Main window\nwidth=800\n"
        );
        let back: Settings = from_str(&text).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_pretty_printing() {
        let text = to_string_pretty(&settings()).unwrap();
        assert!(text.contains("title = Main window\n"));
        let back: Settings = from_str(&text).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_custom_separator() {
        let options = KeyFileOptions::new().with_separator("|");
        let text = to_string_with_options(&settings(), &options).unwrap();
        assert!(text.contains("tags=admin|user\n"));
        let back: Settings = from_str_with_options(&text, &options).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_document_roundtrip() {
        let document = to_document(&settings()).unwrap();
        assert_eq!(document.get("window", "width", ""), Some("800"));
        let back: Settings = from_document(&document).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_reader_and_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &settings()).unwrap();
        let back: Settings = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back, settings());
        let back: Settings = from_slice(&buffer).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            from_slice::<Settings>(&[0xff, 0xfe]),
            Err(Error::Custom(_))
        ));
    }

    #[test]
    fn test_non_aggregate_targets() {
        assert!(matches!(to_string(&vec![1, 2]), Err(Error::InvalidParameter(_))));
        assert!(matches!(from_str::<String>("[g]"), Err(Error::InvalidParameter(_))));
    }
}
