//! Keyfile serialization.
//!
//! This module provides the [`Serializer`] that assembles a [`Document`] from a
//! Rust value implementing `Serialize`.
//!
//! ## Overview
//!
//! The record mirrors the decode side:
//!
//! - **Root**: a struct whose fields are groups, or a map from group names to groups
//! - **Group**: a struct whose fields are keys, or a map from keys to fields;
//!   `None` renders as an empty group header
//! - **Field**: one `key=value` line, or one `key[subkey]=value` line per entry of
//!   a locale map
//!
//! Fields tagged `omitempty` are skipped when they hold their zero value; a group
//! is zero when all of its fields are.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_keyfile::{to_string, to_string_pretty};
//!
//! #[derive(Serialize)]
//! struct Server { host: String, ports: Vec<u16> }
//!
//! #[derive(Serialize)]
//! struct Config { server: Server }
//!
//! let config = Config {
//!     server: Server { host: "localhost".to_string(), ports: vec![80, 443] },
//! };
//!
//! assert_eq!(to_string(&config).unwrap(), "[server]\nhost=localhost\nports=80;443\n");
//! assert_eq!(
//!     to_string_pretty(&config).unwrap(),
//!     "[server]\nhost = localhost\nports = 80;443\n"
//! );
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_keyfile::{KeyFileOptions, Serializer};
//!
//! #[derive(Serialize)]
//! struct Entry { name: String }
//!
//! #[derive(Serialize)]
//! struct File { entry: Entry }
//!
//! let mut serializer = Serializer::new(KeyFileOptions::new());
//! File { entry: Entry { name: "x".to_string() } }
//!     .serialize(&mut serializer)
//!     .unwrap();
//!
//! let document = serializer.into_document();
//! assert_eq!(document.get("entry", "name", ""), Some("x"));
//! ```

use crate::document::{check_group_name, check_key, check_subkey, Entry, Group};
use crate::error::type_label;
use crate::escape::join;
use crate::tag::{BoundField, Directives};
use crate::value::format_complex;
use crate::{Document, Error, KeyFileOptions, Result};
use indexmap::IndexMap;
use log::trace;
use serde::ser::{self, Impossible, Serialize};

/// Generates serializer methods that fail with `self.reject(kind)`.
macro_rules! reject_values {
    ($($method:ident($ty:ty) => $kind:expr),* $(,)?) => {
        $(
            fn $method(self, _value: $ty) -> Result<Self::Ok> {
                Err(self.reject($kind))
            }
        )*
    };
}

/// Generates the compound-type methods shared by every level that is not a value.
macro_rules! reject_compounds {
    () => {
        fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
            Err(self.reject("sequence"))
        }

        fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
            Err(self.reject("tuple"))
        }

        fn serialize_tuple_struct(
            self,
            _name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleStruct> {
            Err(self.reject("tuple struct"))
        }

        fn serialize_tuple_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleVariant> {
            Err(self.reject("enum"))
        }

        fn serialize_struct_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStructVariant> {
            Err(self.reject("enum"))
        }

        fn serialize_unit(self) -> Result<Self::Ok> {
            Err(self.reject("unit"))
        }

        fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
            Err(self.reject("unit struct"))
        }

        fn serialize_unit_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
        ) -> Result<Self::Ok> {
            Err(self.reject("enum"))
        }

        fn serialize_newtype_variant<T>(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _value: &T,
        ) -> Result<Self::Ok>
        where
            T: ?Sized + Serialize,
        {
            Err(self.reject("enum"))
        }
    };
}

/// The keyfile serializer.
///
/// Collects groups into a [`Document`]; take it with [`Serializer::into_document`].
pub struct Serializer {
    document: Document,
    options: KeyFileOptions,
}

impl Serializer {
    #[must_use]
    pub fn new(options: KeyFileOptions) -> Self {
        Serializer {
            document: Document::new(),
            options,
        }
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    fn reject(&self, kind: &str) -> Error {
        Error::invalid_parameter(kind)
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = GroupsSerializer<'a>;
    type SerializeStruct = GroupsSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(GroupsSerializer {
            ser: self,
            pending: None,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(GroupsSerializer {
            ser: self,
            pending: None,
        })
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_none(self) -> Result<()> {
        Err(self.reject("None"))
    }

    reject_values! {
        serialize_bool(bool) => "bool",
        serialize_i8(i8) => "i8",
        serialize_i16(i16) => "i16",
        serialize_i32(i32) => "i32",
        serialize_i64(i64) => "i64",
        serialize_u8(u8) => "u8",
        serialize_u16(u16) => "u16",
        serialize_u32(u32) => "u32",
        serialize_u64(u64) => "u64",
        serialize_f32(f32) => "f32",
        serialize_f64(f64) => "f64",
        serialize_char(char) => "char",
        serialize_str(&str) => "string",
        serialize_bytes(&[u8]) => "bytes",
    }

    reject_compounds!();
}

/// Groups of the root record, from struct fields or map entries.
pub struct GroupsSerializer<'a> {
    ser: &'a mut Serializer,
    pending: Option<String>,
}

impl<'a> GroupsSerializer<'a> {
    fn store<T>(&mut self, name: &str, value: &T, omit_empty: bool) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        check_group_name(name)?;
        let output = value.serialize(GroupSerializer {
            name,
            options: &self.ser.options,
        })?;
        if omit_empty && output.zero {
            trace!("skipping zero group `{}`", name);
            return Ok(());
        }
        trace!("encoded group `{}` with {} keys", name, output.group.len());
        self.ser.document.insert_group(name, output.group);
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for GroupsSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, tag: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let directives = Directives::parse(tag)?;
        if directives.ignore {
            return Ok(());
        }
        let name = directives.key(tag)?;
        self.store(name, value, directives.omit_empty)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> ser::SerializeMap for GroupsSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending = Some(key.serialize(KeySerializer { map: "document" })?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let name = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.store(&name, value, false)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// One encoded group and whether every field in it held its zero value.
struct GroupOutput {
    group: Group,
    zero: bool,
}

/// One group, from a struct, a map, or an option of either.
struct GroupSerializer<'x> {
    name: &'x str,
    options: &'x KeyFileOptions,
}

impl<'x> GroupSerializer<'x> {
    fn reject(&self, kind: &str) -> Error {
        Error::invalid_group_type(self.name, kind)
    }
}

impl<'x> ser::Serializer for GroupSerializer<'x> {
    type Ok = GroupOutput;
    type Error = Error;

    type SerializeSeq = Impossible<GroupOutput, Error>;
    type SerializeTuple = Impossible<GroupOutput, Error>;
    type SerializeTupleStruct = Impossible<GroupOutput, Error>;
    type SerializeTupleVariant = Impossible<GroupOutput, Error>;
    type SerializeMap = FieldsSerializer<'x>;
    type SerializeStruct = FieldsSerializer<'x>;
    type SerializeStructVariant = Impossible<GroupOutput, Error>;

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(FieldsSerializer::new(self.options))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(FieldsSerializer::new(self.options))
    }

    fn serialize_none(self) -> Result<GroupOutput> {
        Ok(GroupOutput {
            group: Group::new(),
            zero: true,
        })
    }

    fn serialize_some<T>(self, value: &T) -> Result<GroupOutput>
    where
        T: ?Sized + Serialize,
    {
        let output = value.serialize(self)?;
        Ok(GroupOutput {
            zero: false,
            ..output
        })
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<GroupOutput>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    reject_values! {
        serialize_bool(bool) => "bool",
        serialize_i8(i8) => "i8",
        serialize_i16(i16) => "i16",
        serialize_i32(i32) => "i32",
        serialize_i64(i64) => "i64",
        serialize_u8(u8) => "u8",
        serialize_u16(u16) => "u16",
        serialize_u32(u32) => "u32",
        serialize_u64(u64) => "u64",
        serialize_f32(f32) => "f32",
        serialize_f64(f64) => "f64",
        serialize_char(char) => "char",
        serialize_str(&str) => "string",
        serialize_bytes(&[u8]) => "bytes",
    }

    reject_compounds!();
}

/// Keys of one group, from struct fields or map entries.
struct FieldsSerializer<'x> {
    options: &'x KeyFileOptions,
    group: Group,
    zero: bool,
    pending: Option<String>,
}

impl<'x> FieldsSerializer<'x> {
    fn new(options: &'x KeyFileOptions) -> Self {
        FieldsSerializer {
            options,
            group: Group::new(),
            zero: true,
            pending: None,
        }
    }

    fn store<T>(&mut self, field: BoundField<'_>, value: &T, omit_empty: bool) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        check_key(field.key)?;
        let rendered = value
            .serialize(ValueSerializer {
                field,
                position: Position::Field,
            })
            .map_err(|err| {
                err.for_field(0, field.key, field.field, &type_label::<T>())
            })?;

        let zero = rendered.is_zero();
        self.zero &= zero;
        if omit_empty && zero {
            return Ok(());
        }

        match rendered {
            Rendered::Scalar { text, .. } => self.group.insert(field.key, "", &text, 0),
            Rendered::Variants(variants) => {
                if variants.is_empty() {
                    return Ok(());
                }
                let mut entry = Entry::new();
                for (subkey, text) in &variants {
                    entry.insert(subkey, text, 0);
                }
                self.group.insert_entry(field.key, entry);
            }
        }
        Ok(())
    }

    fn finish(self) -> GroupOutput {
        GroupOutput {
            group: self.group,
            zero: self.zero,
        }
    }
}

impl<'x> ser::SerializeStruct for FieldsSerializer<'x> {
    type Ok = GroupOutput;
    type Error = Error;

    fn serialize_field<T>(&mut self, tag: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let directives = Directives::parse(tag)?;
        if directives.ignore {
            return Ok(());
        }
        let field = directives.bind(tag, &self.options.separator)?;
        self.store(field, value, directives.omit_empty)
    }

    fn end(self) -> Result<GroupOutput> {
        Ok(self.finish())
    }
}

impl<'x> ser::SerializeMap for FieldsSerializer<'x> {
    type Ok = GroupOutput;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending = Some(key.serialize(KeySerializer { map: "group" })?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        let directives = Directives::for_key(&key);
        let field = directives.bind(&key, &self.options.separator)?;
        self.store(field, value, false)
    }

    fn end(self) -> Result<GroupOutput> {
        Ok(self.finish())
    }
}

/// Text for one field: a single value, or one value per subkey.
enum Rendered {
    Scalar { text: String, zero: bool },
    Variants(IndexMap<String, String>),
}

impl Rendered {
    fn scalar(text: String, zero: bool) -> Self {
        Rendered::Scalar { text, zero }
    }

    fn is_zero(&self) -> bool {
        match self {
            Rendered::Scalar { zero, .. } => *zero,
            Rendered::Variants(variants) => variants.is_empty(),
        }
    }

    fn into_text(self, field: &BoundField<'_>) -> Result<String> {
        match self {
            Rendered::Scalar { text, .. } => Ok(text),
            Rendered::Variants(_) => Err(Error::unsupported_type(field.field, "nested map")),
        }
    }
}

/// Where a value sits, which limits the kinds it may take.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Field,
    MapValue,
    ListElement,
}

macro_rules! render_number {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, value: $ty) -> Result<Rendered> {
                Ok(Rendered::scalar(value.to_string(), value == <$ty>::default()))
            }
        )*
    };
}

macro_rules! render_float {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, value: $ty) -> Result<Rendered> {
                Ok(Rendered::scalar(float_text(value.to_string()), value == 0.0))
            }
        )*
    };
}

/// Integral floats keep a `.0` fraction so they never read back as integers.
fn float_text(mut text: String) -> String {
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        text.push_str(".0");
    }
    text
}

/// Renders one value as text.
struct ValueSerializer<'x> {
    field: BoundField<'x>,
    position: Position,
}

impl<'x> ValueSerializer<'x> {
    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_type(self.field.field, kind)
    }
}

impl<'x> ser::Serializer for ValueSerializer<'x> {
    type Ok = Rendered;
    type Error = Error;

    type SerializeSeq = ListSerializer<'x>;
    type SerializeTuple = ComplexSerializer<'x>;
    type SerializeTupleStruct = Impossible<Rendered, Error>;
    type SerializeTupleVariant = Impossible<Rendered, Error>;
    type SerializeMap = VariantsSerializer<'x>;
    type SerializeStruct = Impossible<Rendered, Error>;
    type SerializeStructVariant = Impossible<Rendered, Error>;

    fn serialize_bool(self, value: bool) -> Result<Rendered> {
        Ok(Rendered::scalar(value.to_string(), !value))
    }

    render_number! {
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
    }

    render_float! {
        serialize_f32(f32),
        serialize_f64(f64),
    }

    fn serialize_char(self, value: char) -> Result<Rendered> {
        Ok(Rendered::scalar(value.to_string(), value == '\0'))
    }

    fn serialize_str(self, value: &str) -> Result<Rendered> {
        Ok(Rendered::scalar(value.to_string(), value.is_empty()))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Rendered> {
        let text = std::str::from_utf8(value)
            .map_err(|err| Error::custom(format!("encoded text is not UTF-8: {}", err)))?;
        Ok(Rendered::scalar(text.to_string(), text.is_empty()))
    }

    fn serialize_none(self) -> Result<Rendered> {
        Ok(Rendered::scalar(String::new(), true))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Rendered>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(self)? {
            Rendered::Scalar { text, .. } => Ok(Rendered::scalar(text, false)),
            variants => Ok(variants),
        }
    }

    fn serialize_unit(self) -> Result<Rendered> {
        Ok(Rendered::scalar(String::new(), true))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Rendered> {
        Ok(Rendered::scalar(String::new(), true))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Rendered> {
        Ok(Rendered::scalar(variant.to_string(), variant_index == 0))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Rendered>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Rendered>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        if self.position == Position::ListElement {
            return Err(self.unsupported("nested list"));
        }
        Ok(ListSerializer {
            field: self.field,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        if len != 2 {
            return Err(self.unsupported(&format!("tuple of {} elements", len)));
        }
        Ok(ComplexSerializer {
            field: self.field,
            parts: Vec::with_capacity(2),
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.unsupported(&format!("tuple struct {}", name)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        if self.position != Position::Field {
            return Err(self.unsupported("nested map"));
        }
        Ok(VariantsSerializer {
            field: self.field,
            variants: IndexMap::new(),
            pending: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.unsupported(&format!("struct {}", name)))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported(&format!("enum variant {}::{}", name, variant)))
    }
}

/// List items, joined with the field's separator.
struct ListSerializer<'x> {
    field: BoundField<'x>,
    items: Vec<String>,
}

impl<'x> ser::SerializeSeq for ListSerializer<'x> {
    type Ok = Rendered;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let item = value.serialize(ValueSerializer {
            field: self.field,
            position: Position::ListElement,
        })?;
        self.items.push(item.into_text(&self.field)?);
        Ok(())
    }

    fn end(self) -> Result<Rendered> {
        Ok(Rendered::scalar(
            join(&self.items, self.field.separator),
            self.items.is_empty(),
        ))
    }
}

/// The real and imaginary parts of a complex number.
struct ComplexSerializer<'x> {
    field: BoundField<'x>,
    parts: Vec<String>,
}

impl<'x> ser::SerializeTuple for ComplexSerializer<'x> {
    type Ok = Rendered;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut part = value
            .serialize(ValueSerializer {
                field: self.field,
                position: Position::ListElement,
            })?
            .into_text(&self.field)?;
        // complex parts are written bare: `(10+11i)`
        if let Some(len) = part.strip_suffix(".0").map(str::len) {
            part.truncate(len);
        }
        if part.parse::<f64>().is_err() {
            return Err(Error::unsupported_type(
                self.field.field,
                "tuple of non-numeric elements",
            ));
        }
        self.parts.push(part);
        Ok(())
    }

    fn end(self) -> Result<Rendered> {
        let [re, im] = self.parts.as_slice() else {
            return Err(Error::unsupported_type(self.field.field, "tuple"));
        };
        let zero = [re, im]
            .iter()
            .all(|part| part.parse::<f64>().map_or(false, |v| v == 0.0));
        Ok(Rendered::scalar(format_complex(re, im), zero))
    }
}

/// Subkey entries of a locale/variant map.
struct VariantsSerializer<'x> {
    field: BoundField<'x>,
    variants: IndexMap<String, String>,
    pending: Option<String>,
}

impl<'x> ser::SerializeMap for VariantsSerializer<'x> {
    type Ok = Rendered;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let subkey = key.serialize(KeySerializer {
            map: self.field.field,
        })?;
        check_subkey(&subkey)?;
        self.pending = Some(subkey);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let subkey = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        let text = value
            .serialize(ValueSerializer {
                field: self.field,
                position: Position::MapValue,
            })?
            .into_text(&self.field)?;
        self.variants.insert(subkey, text);
        Ok(())
    }

    fn end(self) -> Result<Rendered> {
        Ok(Rendered::Variants(self.variants))
    }
}

/// A map key: group name, document key or subkey. Only strings are accepted.
struct KeySerializer<'x> {
    map: &'x str,
}

impl<'x> KeySerializer<'x> {
    fn reject(&self, _kind: &str) -> Error {
        Error::map_key_not_string(self.map)
    }
}

impl<'x> ser::Serializer for KeySerializer<'x> {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_str(self, value: &str) -> Result<String> {
        Ok(value.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(self.reject("None"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.reject("option"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.reject("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.reject("struct"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.reject("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.reject("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.reject("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.reject("enum"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.reject("enum"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(self.reject("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(self.reject("unit struct"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.reject("enum"))
    }

    reject_values! {
        serialize_bool(bool) => "bool",
        serialize_i8(i8) => "i8",
        serialize_i16(i16) => "i16",
        serialize_i32(i32) => "i32",
        serialize_i64(i64) => "i64",
        serialize_u8(u8) => "u8",
        serialize_u16(u16) => "u16",
        serialize_u32(u32) => "u32",
        serialize_u64(u64) => "u64",
        serialize_f32(f32) => "f32",
        serialize_f64(f64) => "f64",
        serialize_char(char) => "char",
        serialize_bytes(&[u8]) => "bytes",
    }
}
