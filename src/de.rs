//! Keyfile deserialization.
//!
//! This module provides the [`Deserializer`] that binds a parsed [`Document`] to a
//! Rust type implementing `Deserialize`.
//!
//! ## Overview
//!
//! Binding happens in three layers, each with its own serde `Deserializer`:
//!
//! - **Document**: the target is a struct whose fields are groups, or a map from
//!   group names to groups
//! - **Group**: a struct whose fields are keys, or a map from keys to fields
//! - **Field**: a scalar, list, complex number, [`Value`](crate::Value), locale
//!   map, option or hook type, converted from the raw text of one key
//!
//! Groups and keys missing from the document take the zero value of their type.
//! Groups and keys the target does not declare are ignored.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_keyfile::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server { host: String, port: u16, verbose: bool }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config { server: Server }
//!
//! let config: Config = from_str("[server]\nhost = localhost\nport = 8080").unwrap();
//! assert_eq!(config.server.host, "localhost");
//! assert_eq!(config.server.port, 8080);
//! assert!(!config.server.verbose);
//! ```

use crate::document::{Entry, Group, RawValue};
use crate::error::type_label;
use crate::escape::split;
use crate::tag::{BoundField, Directives};
use crate::value::{parse_bool, parse_complex, Value};
use crate::{Document, Error, KeyFileOptions, Result};
use log::trace;
use serde::de::value::{SeqDeserializer, StrDeserializer};
use serde::de::{self, Deserializer as _, IntoDeserializer};
use std::fmt;

const NO_FIELDS: &[&str] = &[];

/// Generates deserializer methods that fail with `self.reject(kind)`.
macro_rules! reject_kinds {
    ($($method:ident => $kind:expr),* $(,)?) => {
        $(
            fn $method<V>(self, _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(self.reject($kind))
            }
        )*
    };
}

/// The keyfile deserializer.
///
/// Reads from an already parsed [`Document`]; create one with
/// [`Deserializer::new`] or use [`from_str`](crate::from_str).
#[derive(Clone, Copy)]
pub struct Deserializer<'a> {
    document: &'a Document,
    options: &'a KeyFileOptions,
}

impl<'a> Deserializer<'a> {
    #[must_use]
    pub fn new(document: &'a Document, options: &'a KeyFileOptions) -> Self {
        Deserializer { document, options }
    }

    fn reject(&self, kind: &str) -> Error {
        Error::invalid_parameter(kind)
    }
}

impl<'de, 'a> de::Deserializer<'de> for Deserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(DocumentMapAccess {
            groups: self.document.groups().collect::<Vec<_>>().into_iter(),
            pending: None,
            options: self.options,
            started: false,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(GroupsAccess {
            de: self,
            fields: fields.iter(),
            current: None,
        })
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("unit struct"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("tuple struct"))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("enum"))
    }

    reject_kinds! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_i128 => "i128",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_u128 => "u128",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "string",
        deserialize_string => "string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_identifier => "identifier",
    }
}

/// Struct fields of the root record, each bound to one group.
struct GroupsAccess<'a> {
    de: Deserializer<'a>,
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
}

impl<'de, 'a> de::MapAccess<'de> for GroupsAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&tag) => {
                self.current = Some(tag);
                let key: StrDeserializer<'_, Error> = tag.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let tag = self
            .current
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        let directives = Directives::parse(tag)?;
        if directives.ignore {
            trace!("group field `{}` is ignored", tag);
            return seed.deserialize(ZeroDeserializer::new(tag));
        }

        let name = directives.key(tag)?;
        let group = self.de.document.group(name);
        trace!(
            "binding group `{}` ({})",
            name,
            if group.is_some() { "present" } else { "absent" }
        );
        seed.deserialize(GroupDeserializer {
            name,
            group,
            options: self.de.options,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Every group of the document, for map targets.
struct DocumentMapAccess<'a> {
    groups: std::vec::IntoIter<(&'a String, &'a Group)>,
    pending: Option<(&'a str, &'a Group)>,
    options: &'a KeyFileOptions,
    started: bool,
}

impl<'de, 'a> de::MapAccess<'de> for DocumentMapAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let first = !std::mem::replace(&mut self.started, true);
        match self.groups.next() {
            Some((name, group)) => {
                self.pending = Some((name.as_str(), group));
                seed.deserialize(KeyDeserializer {
                    key: name,
                    map: "document",
                })
                .map(Some)
            }
            None => {
                if first {
                    check_key_type(seed, "document")?;
                }
                Ok(None)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let (name, group) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        trace!("binding group `{}` as map entry", name);
        seed.deserialize(GroupDeserializer {
            name,
            group: Some(group),
            options: self.options,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.groups.len())
    }
}

/// One group, bound to a struct, a map, or an option of either.
struct GroupDeserializer<'x> {
    name: &'x str,
    group: Option<&'x Group>,
    options: &'x KeyFileOptions,
}

impl<'x> GroupDeserializer<'x> {
    fn reject(&self, kind: &str) -> Error {
        Error::invalid_group_type(self.name, kind)
    }
}

impl<'de, 'x> de::Deserializer<'de> for GroupDeserializer<'x> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(FieldsAccess {
            group: self.group,
            options: self.options,
            fields: fields.iter(),
            current: None,
        })
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let entries: Vec<(&str, &Entry)> = self
            .group
            .map(|group| group.iter().map(|(key, entry)| (key.as_str(), entry)).collect())
            .unwrap_or_default();
        visitor.visit_map(KeysAccess {
            entries: entries.into_iter(),
            pending: None,
            options: self.options,
            started: false,
        })
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.group.is_some() {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("unit struct"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("tuple struct"))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("enum"))
    }

    reject_kinds! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_i128 => "i128",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_u128 => "u128",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "string",
        deserialize_string => "string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_identifier => "identifier",
    }
}

/// Wraps visitor-level failures into a conversion error for the field.
fn attribute<T: ?Sized>(err: Error, ctx: &BoundField<'_>, line: usize) -> Error {
    err.for_field(line, ctx.key, ctx.field, &type_label::<T>())
}

fn entry_line(entry: Option<&Entry>) -> usize {
    entry
        .and_then(|entry| entry.bare().or_else(|| entry.iter().next().map(|(_, raw)| raw)))
        .map_or(0, |raw| raw.line)
}

/// Struct fields of one group, each bound to one key.
struct FieldsAccess<'x> {
    group: Option<&'x Group>,
    options: &'x KeyFileOptions,
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
}

impl<'de, 'x> de::MapAccess<'de> for FieldsAccess<'x> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&tag) => {
                self.current = Some(tag);
                let key: StrDeserializer<'_, Error> = tag.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let tag = self
            .current
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        let directives = Directives::parse(tag)?;
        if directives.ignore {
            return seed.deserialize(ZeroDeserializer::new(tag));
        }

        let ctx = directives.bind(tag, &self.options.separator)?;
        let entry = self.group.and_then(|group| group.entry(ctx.key));
        seed.deserialize(FieldDeserializer { ctx, entry })
            .map_err(|err| attribute::<V::Value>(err, &ctx, entry_line(entry)))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Every key of one group, for map targets.
struct KeysAccess<'x> {
    entries: std::vec::IntoIter<(&'x str, &'x Entry)>,
    pending: Option<(&'x str, &'x Entry)>,
    options: &'x KeyFileOptions,
    started: bool,
}

impl<'de, 'x> de::MapAccess<'de> for KeysAccess<'x> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let first = !std::mem::replace(&mut self.started, true);
        match self.entries.next() {
            Some((key, entry)) => {
                self.pending = Some((key, entry));
                seed.deserialize(KeyDeserializer { key, map: "group" })
                    .map(Some)
            }
            None => {
                if first {
                    check_key_type(seed, "group")?;
                }
                Ok(None)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let (key, entry) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        let directives = Directives::for_key(key);
        let ctx = directives.bind(key, &self.options.separator)?;
        seed.deserialize(FieldDeserializer {
            ctx,
            entry: Some(entry),
        })
        .map_err(|err| attribute::<V::Value>(err, &ctx, entry_line(Some(entry))))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Forwards to the bare value when the key has one, and to the zero value otherwise.
macro_rules! forward_to_value {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.bare() {
                    Some(raw) => ValueDeserializer::new(raw, self.ctx).$method(visitor),
                    None => ZeroDeserializer::new(self.ctx.field).$method(visitor),
                }
            }
        )*
    };
}

/// All variants of one key, bound to one struct field.
struct FieldDeserializer<'x> {
    ctx: BoundField<'x>,
    entry: Option<&'x Entry>,
}

impl<'x> FieldDeserializer<'x> {
    fn bare(&self) -> Option<&'x RawValue> {
        self.entry.and_then(|entry| entry.bare())
    }

    fn is_empty(&self) -> bool {
        match self.entry {
            None => true,
            Some(entry) => {
                !entry.has_variants() && entry.bare().map_or(true, |raw| raw.value.is_empty())
            }
        }
    }
}

impl<'de, 'x> de::Deserializer<'de> for FieldDeserializer<'x> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // Self-describing targets read the bare value; subkeys only bind to maps.
        match self.bare() {
            Some(raw) => ValueDeserializer::new(raw, self.ctx).deserialize_any(visitor),
            None => ZeroDeserializer::new(self.ctx.field).deserialize_any(visitor),
        }
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variants: Vec<(&str, &RawValue)> = self
            .entry
            .map(|entry| entry.iter().map(|(subkey, raw)| (subkey.as_str(), raw)).collect())
            .unwrap_or_default();
        visitor.visit_map(VariantsAccess {
            variants: variants.into_iter(),
            pending: None,
            ctx: self.ctx,
            started: false,
        })
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(self.ctx.field, &format!("struct {}", name)))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(self.ctx.field, &format!("tuple struct {}", name)))
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.bare() {
            Some(raw) => ValueDeserializer::new(raw, self.ctx).deserialize_unit_struct(name, visitor),
            None => visitor.visit_unit(),
        }
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.bare() {
            Some(raw) => ValueDeserializer::new(raw, self.ctx).deserialize_tuple(len, visitor),
            None => ZeroDeserializer::new(self.ctx.field).deserialize_tuple(len, visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.bare() {
            Some(raw) => {
                ValueDeserializer::new(raw, self.ctx).deserialize_enum(name, variants, visitor)
            }
            None => ZeroDeserializer::new(self.ctx.field).deserialize_enum(name, variants, visitor),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_value! {
        deserialize_bool, deserialize_i8, deserialize_i16, deserialize_i32, deserialize_i64,
        deserialize_i128, deserialize_u8, deserialize_u16, deserialize_u32, deserialize_u64,
        deserialize_u128, deserialize_f32, deserialize_f64, deserialize_char, deserialize_str,
        deserialize_string, deserialize_bytes, deserialize_byte_buf, deserialize_unit,
        deserialize_seq, deserialize_identifier,
    }
}

/// The subkeys of one key, for locale/variant map fields.
struct VariantsAccess<'x> {
    variants: std::vec::IntoIter<(&'x str, &'x RawValue)>,
    pending: Option<&'x RawValue>,
    ctx: BoundField<'x>,
    started: bool,
}

impl<'de, 'x> de::MapAccess<'de> for VariantsAccess<'x> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let first = !std::mem::replace(&mut self.started, true);
        match self.variants.next() {
            Some((subkey, raw)) => {
                self.pending = Some(raw);
                seed.deserialize(KeyDeserializer {
                    key: subkey,
                    map: self.ctx.field,
                })
                .map(Some)
            }
            None => {
                if first {
                    check_key_type(seed, self.ctx.field)?;
                }
                Ok(None)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let raw = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        seed.deserialize(ValueDeserializer::new(raw, self.ctx))
            .map_err(|err| attribute::<V::Value>(err, &self.ctx, raw.line))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.variants.len())
    }
}

/// A map key: a group name, a document key or a subkey.
///
/// Only string-like targets are accepted.
struct KeyDeserializer<'x> {
    key: &'x str,
    map: &'x str,
}

impl<'x> KeyDeserializer<'x> {
    fn reject(&self, _kind: &str) -> Error {
        Error::map_key_not_string(self.map)
    }
}

impl<'de, 'x> de::Deserializer<'de> for KeyDeserializer<'x> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant: StrDeserializer<'_, Error> = self.key.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("unit struct"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("tuple struct"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.reject("struct"))
    }

    reject_kinds! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_i128 => "i128",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_u128 => "u128",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_option => "option",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_map => "map",
    }
}

/// Runs a key seed against an empty key so that a map without entries still
/// rejects key types that are not strings.
///
/// Only the key-type error is kept; a string-like key type may still refuse the
/// empty key itself (an enum, for instance), which is not an error here.
fn check_key_type<'de, K>(seed: K, map: &str) -> Result<()>
where
    K: de::DeserializeSeed<'de>,
{
    match seed.deserialize(KeyDeserializer { key: "", map }) {
        Err(err @ Error::MapKeyNotString { .. }) => Err(err),
        _ => Ok(()),
    }
}

/// Parses the raw text at the target width, failing with a conversion error.
macro_rules! parse_number {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let parsed = self
                    .raw
                    .parse::<$ty>()
                    .map_err(|err| self.conversion(stringify!($ty), err))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

/// One raw value converted at the type the visitor asks for.
struct ValueDeserializer<'x> {
    raw: &'x str,
    line: usize,
    ctx: BoundField<'x>,
    in_list: bool,
}

impl<'x> ValueDeserializer<'x> {
    fn new(raw: &'x RawValue, ctx: BoundField<'x>) -> Self {
        ValueDeserializer {
            raw: &raw.value,
            line: raw.line,
            ctx,
            in_list: false,
        }
    }

    fn conversion<E: fmt::Display>(&self, target: &str, reason: E) -> Error {
        Error::Conversion {
            line: self.line,
            key: self.ctx.key.to_string(),
            field: self.ctx.field.to_string(),
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_type(self.ctx.field, kind)
    }
}

impl<'de, 'x> de::Deserializer<'de> for ValueDeserializer<'x> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match Value::infer(self.raw) {
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Complex(c) => {
                visitor.visit_seq(SeqDeserializer::<_, Error>::new([c.re, c.im].into_iter()))
            }
            Value::String(s) => visitor.visit_string(s),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match parse_bool(self.raw) {
            Some(b) => visitor.visit_bool(b),
            None => Err(self.conversion("bool", "expected `true` or `false`")),
        }
    }

    parse_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut chars = self.raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.conversion("char", "expected exactly one character")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.raw)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.raw)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.raw)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bytes(self.raw.as_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bytes(self.raw.as_bytes())
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.raw.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.in_list {
            return Err(self.unsupported("nested list"));
        }
        let items = split(self.raw, self.ctx.separator);
        trace!(
            "key `{}`: {} list items split on `{}`",
            self.ctx.key,
            items.len(),
            self.ctx.separator
        );
        visitor.visit_seq(ListAccess {
            items: items.into_iter(),
            line: self.line,
            ctx: self.ctx,
        })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if len != 2 {
            return Err(self.unsupported(&format!("tuple of {} elements", len)));
        }
        let c = parse_complex(self.raw)
            .ok_or_else(|| self.conversion("complex", "expected `a+bi`, `a-bi`, `bi` or `a`"))?;
        visitor.visit_seq(SeqDeserializer::<_, Error>::new([c.re, c.im].into_iter()))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported(&format!("tuple struct {}", name)))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported("nested map"))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported(&format!("struct {}", name)))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant: StrDeserializer<'_, Error> = self.raw.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// The trimmed items of one list value.
struct ListAccess<'x> {
    items: std::vec::IntoIter<String>,
    line: usize,
    ctx: BoundField<'x>,
}

impl<'de, 'x> de::SeqAccess<'de> for ListAccess<'x> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        let Some(item) = self.items.next() else {
            return Ok(None);
        };
        let element = ValueDeserializer {
            raw: item.trim(),
            line: self.line,
            ctx: self.ctx,
            in_list: true,
        };
        seed.deserialize(element)
            .map(Some)
            .map_err(|err| attribute::<T::Value>(err, &self.ctx, self.line))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Produces the zero value of whatever type asks for it.
struct ZeroDeserializer<'x> {
    field: &'x str,
}

impl<'x> ZeroDeserializer<'x> {
    fn new(field: &'x str) -> Self {
        ZeroDeserializer { field }
    }
}

macro_rules! zero_value {
    ($($method:ident => $visit:ident($($value:expr)?)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit($($value)?)
            }
        )*
    };
}

impl<'de, 'x> de::Deserializer<'de> for ZeroDeserializer<'x> {
    type Error = Error;

    zero_value! {
        deserialize_any => visit_str(""),
        deserialize_bool => visit_bool(false),
        deserialize_i8 => visit_i8(0),
        deserialize_i16 => visit_i16(0),
        deserialize_i32 => visit_i32(0),
        deserialize_i64 => visit_i64(0),
        deserialize_i128 => visit_i128(0),
        deserialize_u8 => visit_u8(0),
        deserialize_u16 => visit_u16(0),
        deserialize_u32 => visit_u32(0),
        deserialize_u64 => visit_u64(0),
        deserialize_u128 => visit_u128(0),
        deserialize_f32 => visit_f32(0.0),
        deserialize_f64 => visit_f64(0.0),
        deserialize_char => visit_char('\0'),
        deserialize_str => visit_str(""),
        deserialize_string => visit_str(""),
        deserialize_identifier => visit_str(""),
        deserialize_bytes => visit_bytes(&[]),
        // hook types map unit to their default
        deserialize_byte_buf => visit_unit(),
        deserialize_option => visit_none(),
        deserialize_unit => visit_unit(),
        deserialize_ignored_any => visit_unit(),
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements {
            remaining: 0,
            field: self.field,
        })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements {
            remaining: len,
            field: self.field,
        })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(ZeroFields {
            fields: NO_FIELDS.iter(),
            current: None,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(ZeroFields {
            fields: fields.iter(),
            current: None,
        })
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let first = variants
            .first()
            .ok_or_else(|| Error::unsupported_type(self.field, &format!("empty enum {}", name)))?;
        let variant: StrDeserializer<'_, Error> = (*first).into_deserializer();
        visitor.visit_enum(variant)
    }
}

/// `remaining` zero elements, for empty lists and zero tuples.
struct ZeroElements<'x> {
    remaining: usize,
    field: &'x str,
}

impl<'de, 'x> de::SeqAccess<'de> for ZeroElements<'x> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(ZeroDeserializer::new(self.field)).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Every declared field set to its zero value.
struct ZeroFields {
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
}

impl<'de> de::MapAccess<'de> for ZeroFields {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&field) => {
                self.current = Some(field);
                let key: StrDeserializer<'_, Error> = field.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let field = self.current.take().unwrap_or_default();
        seed.deserialize(ZeroDeserializer::new(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_str, SyntaxErrorKind};
    use serde::Deserialize;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Deserialize, Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Everything {
        flag: bool,
        small: i8,
        big: u64,
        ratio: f32,
        letter: char,
        text: String,
        list: Vec<u16>,
        maybe: Option<i32>,
        level: Level,
        pair: (f64, f64),
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct EverythingFile {
        all: Everything,
    }

    #[test]
    fn test_missing_group_is_zero() {
        let file: EverythingFile = from_str("").unwrap();
        assert_eq!(
            file.all,
            Everything {
                flag: false,
                small: 0,
                big: 0,
                ratio: 0.0,
                letter: '\0',
                text: String::new(),
                list: Vec::new(),
                maybe: None,
                level: Level::Low,
                pair: (0.0, 0.0),
            }
        );
    }

    #[test]
    fn test_all_kinds_present() {
        let input = "[all]\nflag = True\nsmall = -8\nbig = 18446744073709551615\nratio = 0.5\n\
                     letter = x\ntext = hi there\nlist = 1;2; 3\nmaybe = 7\nlevel = High\npair = 1-2i";
        let file: EverythingFile = from_str(input).unwrap();
        assert!(file.all.flag);
        assert_eq!(file.all.small, -8);
        assert_eq!(file.all.big, u64::MAX);
        assert_eq!(file.all.ratio, 0.5);
        assert_eq!(file.all.letter, 'x');
        assert_eq!(file.all.text, "hi there");
        assert_eq!(file.all.list, vec![1, 2, 3]);
        assert_eq!(file.all.maybe, Some(7));
        assert_eq!(file.all.level, Level::High);
        assert_eq!(file.all.pair, (1.0, -2.0));
    }

    #[test]
    fn test_out_of_range_is_conversion_error() {
        let err = from_str::<EverythingFile>("[all]\n\nsmall = 300").unwrap_err();
        match err {
            Error::Conversion {
                line,
                key,
                target,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(key, "small");
                assert_eq!(target, "i8");
            }
            other => panic!("expected conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_variant_is_attributed() {
        let err = from_str::<EverythingFile>("[all]\nlevel = Medium").unwrap_err();
        assert!(matches!(
            err,
            Error::Conversion { ref key, ref target, .. } if key == "level" && target == "Level"
        ));
    }

    #[test]
    fn test_value_field_reads_bare_value_beside_subkeys() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Section {
            greet: Value,
            count: Value,
        }
        #[derive(Deserialize, Debug, PartialEq)]
        struct File {
            section: Section,
        }

        let file: File =
            from_str("[section]\ngreet = hello\ngreet[de] = hallo\ncount[x] = 3").unwrap();
        assert_eq!(file.section.greet, Value::String("hello".to_string()));
        assert_eq!(file.section.count, Value::String(String::new()));
    }

    #[test]
    fn test_nested_struct_field_is_unsupported() {
        #[derive(Deserialize, Debug)]
        struct Inner {
            _x: i32,
        }
        #[derive(Deserialize, Debug)]
        struct Group {
            _inner: Inner,
        }
        #[derive(Deserialize, Debug)]
        struct File {
            _group: Group,
        }

        let err = from_str::<File>("").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { ref field, .. } if field == "_inner"));
    }

    #[test]
    fn test_group_must_be_aggregate() {
        #[derive(Deserialize, Debug)]
        struct File {
            _group: i32,
        }

        let err = from_str::<File>("").unwrap_err();
        assert!(matches!(err, Error::InvalidGroupType { ref group, .. } if group == "_group"));
    }

    #[test]
    fn test_top_level_must_be_aggregate() {
        assert!(matches!(from_str::<i32>("[g]"), Err(Error::InvalidParameter(_))));
        assert!(matches!(from_str::<Vec<String>>("[g]"), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_syntax_error_surfaces() {
        assert!(matches!(
            from_str::<EverythingFile>("[all]\nnonsense"),
            Err(Error::Syntax {
                kind: SyntaxErrorKind::MissingEquals,
                ..
            })
        ));
    }

    #[test]
    fn test_map_mode() {
        let doc: BTreeMap<String, BTreeMap<String, String>> =
            from_str("[a]\nx = 1\ny = 2\n[b]\nz = 3").unwrap();
        assert_eq!(doc["a"]["x"], "1");
        assert_eq!(doc["a"]["y"], "2");
        assert_eq!(doc["b"]["z"], "3");

        let variants: HashMap<String, HashMap<String, HashMap<String, String>>> =
            from_str("[g]\ngreet = hi\ngreet[de] = hallo").unwrap();
        assert_eq!(variants["g"]["greet"][""], "hi");
        assert_eq!(variants["g"]["greet"]["de"], "hallo");
    }

    #[test]
    fn test_map_key_must_be_string() {
        let err = from_str::<BTreeMap<i32, BTreeMap<String, String>>>("[1]\nx = 1").unwrap_err();
        assert_eq!(err, Error::map_key_not_string("document"));
    }

    #[test]
    fn test_empty_maps_still_check_key_type() {
        let err = from_str::<BTreeMap<i32, BTreeMap<String, String>>>("").unwrap_err();
        assert_eq!(err, Error::map_key_not_string("document"));

        let err = from_str::<BTreeMap<String, BTreeMap<i32, String>>>("[empty]").unwrap_err();
        assert_eq!(err, Error::map_key_not_string("group"));

        #[derive(Deserialize, Debug)]
        struct Section {
            _numbers: BTreeMap<i32, String>,
        }
        #[derive(Deserialize, Debug)]
        struct File {
            _section: Section,
        }
        let err = from_str::<File>("[_section]").unwrap_err();
        assert_eq!(err, Error::map_key_not_string("_numbers"));

        #[derive(Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord)]
        enum Lang {
            De,
        }
        let empty: BTreeMap<String, BTreeMap<Lang, String>> = from_str("[g]").unwrap();
        assert!(empty["g"].is_empty());
        let empty: BTreeMap<String, BTreeMap<String, String>> = from_str("").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_optional_group() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Section {
            key: String,
        }
        #[derive(Deserialize, Debug, PartialEq)]
        struct File {
            present: Option<Section>,
            absent: Option<Section>,
        }

        let file: File = from_str("[present]\nkey = v").unwrap();
        assert_eq!(
            file.present,
            Some(Section {
                key: "v".to_string()
            })
        );
        assert_eq!(file.absent, None);
    }

    #[test]
    fn test_ignored_field_keeps_zero() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Section {
            #[serde(rename = "-")]
            secret: String,
            shown: String,
        }
        #[derive(Deserialize, Debug, PartialEq)]
        struct File {
            section: Section,
        }

        let file: File = from_str("[section]\n- = nope\nsecret = nope\nshown = yes").unwrap();
        assert_eq!(file.section.secret, "");
        assert_eq!(file.section.shown, "yes");
    }

    #[test]
    fn test_nested_list_is_unsupported() {
        #[derive(Deserialize, Debug)]
        struct Section {
            _grid: Vec<Vec<i32>>,
        }
        #[derive(Deserialize, Debug)]
        struct File {
            section: Section,
        }

        let err = from_str::<File>("[section]\n_grid = 1;2").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
    }
}
