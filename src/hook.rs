//! User-defined text conversion for types outside the built-in value matrix.
//!
//! Implement [`TextCodec`] and mark the field with
//! `#[serde(with = "serde_keyfile::hook")]`. The codec then hands the field's raw
//! (unescaped) bytes to [`TextCodec::decode_text`] and writes whatever
//! [`TextCodec::encode_text`] returns; none of the built-in conversion rules apply.
//!
//! A key the document lacks is not decoded at all: the field keeps
//! `T::default()`, like every other absent key. A key that is present with an
//! empty value still reaches `decode_text` with empty input.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_keyfile::{from_str, to_string, hook::TextCodec};
//!
//! #[derive(Debug, PartialEq, Default)]
//! struct Rgb(u8, u8, u8);
//!
//! impl TextCodec for Rgb {
//!     type Error = String;
//!
//!     fn decode_text(raw: &[u8]) -> Result<Self, String> {
//!         let text = std::str::from_utf8(raw).map_err(|e| e.to_string())?;
//!         let hex = text.strip_prefix('#').ok_or("missing `#`")?;
//!         let channel = |i: usize| {
//!             hex.get(i..i + 2)
//!                 .and_then(|h| u8::from_str_radix(h, 16).ok())
//!                 .ok_or_else(|| format!("bad colour `{}`", text))
//!         };
//!         Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
//!     }
//!
//!     fn encode_text(&self) -> Result<Vec<u8>, String> {
//!         Ok(format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2).into_bytes())
//!     }
//! }
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Theme {
//!     #[serde(with = "serde_keyfile::hook")]
//!     accent: Rgb,
//! }
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct File { theme: Theme }
//!
//! let file: File = from_str("[theme]\naccent = #ff8000").unwrap();
//! assert_eq!(file.theme.accent, Rgb(255, 128, 0));
//! assert_eq!(to_string(&file).unwrap(), "[theme]\naccent=#ff8000\n");
//!
//! let file: File = from_str("[theme]").unwrap();
//! assert_eq!(file.theme.accent, Rgb::default());
//! ```

use serde::de::{self, Visitor};
use serde::{ser, Deserializer, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Byte-oriented conversion that replaces the built-in rules for a type.
///
/// `Default` supplies the value of a key the document does not contain.
pub trait TextCodec: Sized + Default {
    type Error: fmt::Display;

    /// Builds a value from the raw bytes of a document value.
    fn decode_text(raw: &[u8]) -> Result<Self, Self::Error>;

    /// Renders the value as document text; the bytes must be UTF-8.
    fn encode_text(&self) -> Result<Vec<u8>, Self::Error>;
}

/// Serializes a [`TextCodec`] value as raw bytes.
///
/// # Errors
///
/// Propagates the codec's error as a serializer error.
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: TextCodec,
    S: Serializer,
{
    let bytes = value.encode_text().map_err(ser::Error::custom)?;
    serializer.serialize_bytes(&bytes)
}

/// Deserializes a [`TextCodec`] value from raw bytes, or `T::default()` when
/// the key is absent.
///
/// # Errors
///
/// Propagates the codec's error as a deserializer error.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: TextCodec,
    D: Deserializer<'de>,
{
    deserializer.deserialize_byte_buf(TextVisitor(PhantomData))
}

struct TextVisitor<T>(PhantomData<T>);

impl<'de, T: TextCodec> Visitor<'de> for TextVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("raw text")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<T, E> {
        T::decode_text(v).map_err(E::custom)
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<T, E> {
        self.visit_bytes(&v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        self.visit_bytes(v.as_bytes())
    }

    // Absent keys arrive as unit.
    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::default())
    }
}
