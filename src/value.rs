//! The polymorphic value type and complex-number text forms.
//!
//! A field typed [`Value`] accepts whatever a keyfile value can hold. Decoding tries,
//! in order: a signed 64-bit integer, a float, a boolean, a complex number, and
//! finally keeps the text as a string.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_keyfile::{from_str, Value};
//!
//! #[derive(Deserialize)]
//! struct File { settings: Settings }
//!
//! #[derive(Deserialize)]
//! struct Settings { a: Value, b: Value, c: Value, d: Value, e: Value }
//!
//! let file: File = from_str("[settings]\na = 42\nb = 42.5\nc = TRUE\nd = 10+11i\ne = value").unwrap();
//! let s = file.settings;
//! assert_eq!(s.a, Value::Integer(42));
//! assert_eq!(s.b, Value::Float(42.5));
//! assert_eq!(s.c, Value::Bool(true));
//! assert!(s.d.is_complex());
//! assert_eq!(s.e.as_str(), Some("value"));
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed keyfile value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Complex(Complex64),
    String(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl Value {
    /// Classifies raw text using the integer, float, bool, complex, string order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_keyfile::Value;
    ///
    /// assert_eq!(Value::infer("7"), Value::Integer(7));
    /// assert_eq!(Value::infer("7.0"), Value::Float(7.0));
    /// assert_eq!(Value::infer("False"), Value::Bool(false));
    /// assert_eq!(Value::infer("seven"), Value::String("seven".to_string()));
    /// ```
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            Value::Integer(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            Value::Float(f)
        } else if let Some(b) = parse_bool(raw) {
            Value::Bool(b)
        } else if let Some(c) = parse_complex(raw) {
            Value::Complex(c)
        } else {
            Value::String(raw.to_string())
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_complex(&self) -> bool {
        matches!(self, Value::Complex(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64` for integers and floats.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Value::Complex(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Complex(c) => f.write_str(&format_complex(&c.re.to_string(), &c.im.to_string())),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Complex(c) => c.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer, float, boolean, complex number or string")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Integer(i)),
                    Err(_) => Ok(Value::Float(value as f64)),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let re: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let im: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                Ok(Value::Complex(Complex64::new(re, im)))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Complex64> for Value {
    fn from(value: Complex64) -> Self {
        Value::Complex(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// ASCII case-insensitive `true` / `false`.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses `a+bi`, `a-bi`, `bi` or `a`, optionally parenthesized.
pub(crate) fn parse_complex(raw: &str) -> Option<Complex64> {
    let mut text = raw.trim();
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        text = inner.trim();
    }
    if text.is_empty() {
        return None;
    }

    let Some(body) = text.strip_suffix('i') else {
        return text.parse::<f64>().ok().map(|re| Complex64::new(re, 0.0));
    };

    // The imaginary part starts at the last sign that is not an exponent sign.
    let bytes = body.as_bytes();
    let split = (1..bytes.len()).rev().find(|&idx| {
        matches!(bytes[idx], b'+' | b'-') && !matches!(bytes[idx - 1], b'e' | b'E')
    });

    let (re, im) = match split {
        Some(idx) => (body[..idx].parse::<f64>().ok()?, parse_imaginary(&body[idx..])?),
        None => (0.0, parse_imaginary(body)?),
    };
    Some(Complex64::new(re, im))
}

fn parse_imaginary(text: &str) -> Option<f64> {
    match text {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => text.parse::<f64>().ok(),
    }
}

/// Renders `(re+imi)` from already formatted components.
pub(crate) fn format_complex(re: &str, im: &str) -> String {
    if im.starts_with('-') {
        format!("({}{}i)", re, im)
    } else {
        format!("({}+{}i)", re, im)
    }
}
