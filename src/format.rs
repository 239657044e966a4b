//! Keyfile Format Reference
//!
//! This module documents the keyfile text format as read by
//! [`Document::parse`](crate::Document::parse) and written by the serializer.
//!
//! # Overview
//!
//! A keyfile is a sequence of lines. Each line is trimmed of surrounding whitespace
//! and then classified:
//!
//! | Line | Meaning |
//! |------|---------|
//! | empty | ignored |
//! | `# ...` | comment, ignored |
//! | `[name]` | opens group `name` (re-opens it if seen before) |
//! | `key = value` | sets `key` in the current group |
//! | `key[subkey] = value` | sets the `subkey` variant of `key` |
//! | anything else | syntax error |
//!
//! ```text
//! # Desktop entry for a text editor
//! [Desktop Entry]
//! Name = Editor
//! Name[de] = Bearbeiter
//! Name[sr@latin] = Urednik
//! Keywords = text;edit;
//! Exec = editor %F
//! ```
//!
//! # Lines
//!
//! ## Groups
//!
//! - The name is everything between `[` and `]`, trimmed; an empty name is an error
//! - Groups do not nest
//! - A group header may repeat; later keys are added to the same group
//!
//! ## Keys
//!
//! - A key-value line is split at its **first** `=`, so values may contain `=`
//! - Key and value are both trimmed
//! - A key ending in `]` is split at its last `[` into key and subkey
//! - A key-value line before the first group header is an error, as is an empty key
//! - A repeated `key[subkey]` in the same group overwrites the earlier value
//!
//! Subkeys conventionally hold locales (`de`, `pt_BR`, `sr@latin`); the empty
//! subkey stands for the bare key.
//!
//! # Escaping
//!
//! | Sequence | Character |
//! |----------|-----------|
//! | `\s` | space |
//! | `\n` | newline |
//! | `\t` | tab |
//! | `\r` | carriage return |
//!
//! Any other backslash sequence is left untouched. On output, newlines, tabs and
//! carriage returns are always escaped, and each leading or trailing whitespace
//! character is written as `\s`, so values keep their surrounding spaces even though
//! lines are trimmed on input.
//!
//! # Value Types
//!
//! | Rust type | Text form | Example |
//! |-----------|-----------|---------|
//! | `bool` | `true` / `false`, any case on input | `Terminal = false` |
//! | integers | base-10, range-checked per width | `Port = 8080` |
//! | `f32`, `f64` | decimal or exponent form; integral values written with `.0` | `Scale = 1.5` |
//! | `Complex32`, `Complex64` | `a+bi`, `a-bi`, `bi`, `a`, optional parentheses | `Z = (1-2i)` |
//! | `char` | exactly one character | `Mnemonic = F` |
//! | `String` | the unescaped text | `Name = Editor` |
//! | unit enum | variant name | `Mode = Dark` |
//! | [`Value`](crate::Value) | first of integer, float, bool, complex, string; bare entry only | `Any = 42` |
//! | `Vec<T>` | items joined by the separator | `Keywords = text;edit` |
//! | `HashMap<String, T>` | one line per subkey | `Name[de] = Bearbeiter` |
//! | `Option<T>` | empty means `None` | `Icon =` |
//!
//! # Lists
//!
//! List items are separated by `;` unless the field declares `sep=...` or the
//! options set another default. A separator preceded by a backslash is part of the
//! item (`a\;b;c` is `["a;b", "c"]`). Items are trimmed. A trailing separator yields
//! a final empty item. Lists do not nest.
//!
//! # Output
//!
//! - Groups, keys and subkeys are written in sorted order
//! - Groups are separated by one blank line
//! - Lines are `key=value`, or `key = value` with
//!   [`KeyFileOptions::pretty`](crate::KeyFileOptions::pretty)
//! - The text ends with a newline
//! - Comments and the original key order are not preserved
//!
//! # Limitations
//!
//! - **Nesting**: groups hold scalars, lists and locale maps only; structs inside
//!   groups are rejected
//! - **Map keys**: must be strings, even in an empty map when decoding
//! - **Names**: written group names cannot be empty, contain brackets or line
//!   breaks, or carry surrounding whitespace. Written keys follow the same rules,
//!   cannot start with `#` and cannot contain `=`. Subkeys cannot contain
//!   brackets, `=` or line breaks.
//! - **Hooks**: an absent key leaves a hook type at its `Default` value
//! - **Escapes**: a literal `\s`, `\n`, `\t` or `\r` in a value reads back as the
//!   escaped character
//! - **Options**: `Some("")` is written as an empty value and reads back as `None`

// This module contains only documentation; no implementation code
