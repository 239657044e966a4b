//! The grouped document model.
//!
//! A [`Document`] maps group names to [`Group`]s, a group maps keys to
//! [`Entry`]s, and an entry maps subkeys (locale/variant names, `""` for the bare
//! key) to [`RawValue`]s. Raw values are always stored unescaped: [`Document::parse`]
//! unescapes them after scanning a line and the writer escapes them again.
//!
//! Insertion order is kept (via [`IndexMap`]) so a parsed document can be walked in
//! source order; the writer sorts groups, keys and subkeys for deterministic output.
//!
//! ```rust
//! use serde_keyfile::Document;
//!
//! let doc = Document::parse("[Greeting]\ngreet = hello\ngreet[tr] = merhaba\n").unwrap();
//! assert_eq!(doc.get("Greeting", "greet", ""), Some("hello"));
//! assert_eq!(doc.get("Greeting", "greet", "tr"), Some("merhaba"));
//! assert_eq!(doc.to_string(), "[Greeting]\ngreet=hello\ngreet[tr]=merhaba\n");
//! ```

use crate::error::SyntaxErrorKind;
use crate::escape::{escape, unescape};
use crate::{Error, KeyFileOptions, Result};
use indexmap::IndexMap;
use log::{debug, trace};
use std::fmt;
use std::str::FromStr;

/// One unescaped value and the 1-based line it came from (0 when built in memory).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub line: usize,
}

/// All variants of one key, indexed by subkey.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry(IndexMap<String, RawValue>);

impl Entry {
    #[must_use]
    pub fn new() -> Self {
        Entry(IndexMap::new())
    }

    /// The value of the bare key (subkey `""`).
    #[must_use]
    pub fn bare(&self) -> Option<&RawValue> {
        self.0.get("")
    }

    #[must_use]
    pub fn get(&self, subkey: &str) -> Option<&RawValue> {
        self.0.get(subkey)
    }

    /// Sets a variant; a later value for the same subkey replaces the earlier one.
    pub fn insert(&mut self, subkey: &str, value: &str, line: usize) {
        self.0.insert(
            subkey.to_string(),
            RawValue {
                value: value.to_string(),
                line,
            },
        );
    }

    /// Returns `true` if any variant other than the bare key is present.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        self.0.keys().any(|subkey| !subkey.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(subkey, value)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, RawValue> {
        self.0.iter()
    }
}

/// The keys of one `[group]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group(IndexMap<String, Entry>);

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Group(IndexMap::new())
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.0.get(key)
    }

    /// Sets `key[subkey]`; use `""` for the bare key.
    pub fn insert(&mut self, key: &str, subkey: &str, value: &str, line: usize) {
        self.0
            .entry(key.to_string())
            .or_default()
            .insert(subkey, value, line);
    }

    /// Replaces every variant of `key` with `entry`.
    pub fn insert_entry(&mut self, key: &str, entry: Entry) {
        self.0.insert(key.to_string(), entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(key, entry)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Entry> {
        self.0.iter()
    }
}

/// A flattened view of one document line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryRef<'a> {
    pub group: &'a str,
    pub key: &'a str,
    pub subkey: &'a str,
    pub value: &'a str,
    pub line: usize,
}

/// A parsed or assembled keyfile document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document(IndexMap<String, Group>);

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Document(IndexMap::new())
    }

    /// Scans keyfile text into a document.
    ///
    /// Blank lines and lines starting with `#` are skipped. A repeated group
    /// header re-opens the group; a repeated key overwrites the earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for an empty group name, a key-value line before
    /// the first group, a line without `=`, or an empty key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_keyfile::{Document, Error, SyntaxErrorKind};
    ///
    /// let err = Document::parse("# comment\nkey = 1").unwrap_err();
    /// assert!(matches!(
    ///     err,
    ///     Error::Syntax { line: 2, kind: SyntaxErrorKind::KeyOutsideGroup, .. }
    /// ));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let mut document = Document::new();
        let mut current: Option<String> = None;
        let mut line_count = 0;

        for (idx, raw_line) in input.lines().enumerate() {
            let line_number = idx + 1;
            line_count = line_number;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::syntax(
                        line_number,
                        SyntaxErrorKind::EmptyGroupName,
                        line,
                    ));
                }
                trace!("line {}: group `{}`", line_number, name);
                document.0.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let (raw_key, raw_value) = line.split_once('=').ok_or_else(|| {
                Error::syntax(line_number, SyntaxErrorKind::MissingEquals, line)
            })?;

            let (key, subkey) = split_subkey(raw_key.trim());
            if key.is_empty() {
                return Err(Error::syntax(line_number, SyntaxErrorKind::EmptyKey, line));
            }

            let group = match &current {
                Some(group) => group,
                None => {
                    return Err(Error::syntax(
                        line_number,
                        SyntaxErrorKind::KeyOutsideGroup,
                        line,
                    ))
                }
            };

            let value = unescape(raw_value.trim());
            document
                .0
                .entry(group.clone())
                .or_default()
                .insert(key, subkey, &value, line_number);
        }

        debug!(
            "parsed keyfile document: {} groups from {} lines",
            document.len(),
            line_count
        );
        Ok(document)
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.0.get(name)
    }

    /// Looks up one value.
    #[must_use]
    pub fn get(&self, group: &str, key: &str, subkey: &str) -> Option<&str> {
        self.group(group)?
            .entry(key)?
            .get(subkey)
            .map(|raw| raw.value.as_str())
    }

    /// Sets `[group] key[subkey]`, creating the group if needed.
    pub fn insert(&mut self, group: &str, key: &str, subkey: &str, value: &str) {
        self.0
            .entry(group.to_string())
            .or_default()
            .insert(key, subkey, value, 0);
    }

    /// Replaces the whole group `name`.
    pub fn insert_group(&mut self, name: &str, group: Group) {
        self.0.insert(name.to_string(), group);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, group)` pairs in insertion order.
    pub fn groups(&self) -> indexmap::map::Iter<'_, String, Group> {
        self.0.iter()
    }

    /// Iterates every value as a flat `(group, key, subkey, value, line)` record.
    pub fn entries(&self) -> impl Iterator<Item = EntryRef<'_>> {
        self.0.iter().flat_map(|(group, keys)| {
            keys.iter().flat_map(move |(key, entry)| {
                entry.iter().map(move |(subkey, raw)| EntryRef {
                    group,
                    key,
                    subkey,
                    value: &raw.value,
                    line: raw.line,
                })
            })
        })
    }

    /// Renders the document with the given layout options.
    ///
    /// Groups, keys and subkeys are sorted; groups are separated by a blank line.
    #[must_use]
    pub fn to_string_with_options(&self, options: &KeyFileOptions) -> String {
        let mut output = String::with_capacity(256);
        self.write_to(&mut output, options);
        output
    }

    fn write_to(&self, output: &mut String, options: &KeyFileOptions) {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();

        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push('[');
            output.push_str(name);
            output.push_str("]\n");

            let group = &self.0[name];
            let mut keys: Vec<&String> = group.0.keys().collect();
            keys.sort();

            for key in keys {
                let entry = &group.0[key];
                let mut subkeys: Vec<&String> = entry.0.keys().collect();
                subkeys.sort();

                for subkey in subkeys {
                    output.push_str(key);
                    if !subkey.is_empty() {
                        output.push('[');
                        output.push_str(subkey);
                        output.push(']');
                    }

                    let value = escape(&entry.0[subkey].value);
                    match (options.pretty, value.is_empty()) {
                        (true, true) => output.push_str(" ="),
                        (true, false) => output.push_str(" = "),
                        (false, _) => output.push('='),
                    }
                    output.push_str(&value);
                    output.push('\n');
                }
            }
        }
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_options(&KeyFileOptions::default()))
    }
}

/// Splits `key[subkey]` at its last `[`; keys without a trailing `]` have subkey `""`.
fn split_subkey(key: &str) -> (&str, &str) {
    if let Some(inner) = key.strip_suffix(']') {
        if let Some(open) = inner.rfind('[') {
            return (inner[..open].trim_end(), &inner[open + 1..]);
        }
    }
    (key, "")
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Checks that `name` reads back unchanged from a `[name]` header.
pub(crate) fn check_group_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "group names cannot be empty"));
    }
    if name.trim() != name {
        return Err(Error::invalid_name(name, "group names cannot have surrounding whitespace"));
    }
    if name.contains(|c: char| c == '[' || c == ']' || is_line_break(c)) {
        return Err(Error::invalid_name(
            name,
            "group names cannot contain brackets or line breaks",
        ));
    }
    Ok(())
}

/// Checks that `key` reads back unchanged as the key of a `key=value` line.
pub(crate) fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_name(key, "keys cannot be empty"));
    }
    if key.trim() != key {
        return Err(Error::invalid_name(key, "keys cannot have surrounding whitespace"));
    }
    if key.starts_with('#') {
        return Err(Error::invalid_name(key, "keys cannot start with `#`"));
    }
    if key.contains(|c: char| c == '=' || c == '[' || c == ']' || is_line_break(c)) {
        return Err(Error::invalid_name(
            key,
            "keys cannot contain `=`, brackets or line breaks",
        ));
    }
    Ok(())
}

/// Checks that `subkey` reads back unchanged from `key[subkey]`; `""` is the bare key.
pub(crate) fn check_subkey(subkey: &str) -> Result<()> {
    if subkey.contains(|c: char| c == '=' || c == '[' || c == ']' || is_line_break(c)) {
        return Err(Error::invalid_name(
            subkey,
            "subkeys cannot contain `=`, brackets or line breaks",
        ));
    }
    Ok(())
}
