//! Escaping of scalar text values and escape-aware list splitting.
//!
//! Raw values are unescaped once, right after a line is scanned, and escaped once
//! when a document is written. In between, values are plain text.
//!
//! | Character | Escape |
//! |-----------|--------|
//! | newline | `\n` |
//! | carriage return | `\r` |
//! | tab | `\t` |
//! | leading/trailing whitespace | `\s` per character |
//!
//! A string holding a literal backslash followed by `s`, `n`, `r` or `t` does not
//! survive a round trip: the sequence reads back as the escaped character.
//!
//! ```rust
//! use serde_keyfile::escape::{escape, unescape, join, split};
//!
//! assert_eq!(escape("  two\tcols "), "\\s\\stwo\\tcols\\s");
//! assert_eq!(unescape("\\s\\stwo\\tcols\\s"), "  two\tcols ");
//!
//! let joined = join(&["a;b", "c"], ";");
//! assert_eq!(joined, "a\\;b;c");
//! assert_eq!(split(&joined, ";"), vec!["a;b", "c"]);
//! ```

/// Escapes control characters and leading/trailing whitespace.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut body = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\n' => body.push_str("\\n"),
            '\r' => body.push_str("\\r"),
            '\t' => body.push_str("\\t"),
            other => body.push(other),
        }
    }

    let inner = body.trim_matches(char::is_whitespace);
    if inner.len() == body.len() {
        return body;
    }

    let leading = body.len() - body.trim_start_matches(char::is_whitespace).len();
    let leading_count = body[..leading].chars().count();
    let trailing_count = if inner.is_empty() {
        0
    } else {
        body[leading + inner.len()..].chars().count()
    };

    let mut output = String::with_capacity(body.len() + 2 * (leading_count + trailing_count));
    for _ in 0..leading_count {
        output.push_str("\\s");
    }
    output.push_str(inner);
    for _ in 0..trailing_count {
        output.push_str("\\s");
    }
    output
}

/// Reverses [`escape`].
///
/// Unknown backslash sequences are kept as they are, which leaves escaped list
/// separators in place for [`split`].
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        let replacement = match chars.peek() {
            Some('s') => ' ',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            _ => {
                output.push('\\');
                continue;
            }
        };
        chars.next();
        output.push(replacement);
    }

    output
}

/// Splits `value` on `sep`, honouring backslash-escaped separators.
///
/// The separator is matched as a whole token, so multi-character separators
/// behave like single characters. An escaped separator is emitted literally
/// without its backslash. An empty input yields no items.
///
/// ```rust
/// use serde_keyfile::escape::split;
///
/// assert_eq!(split("1,2,3", ","), vec!["1", "2", "3"]);
/// assert_eq!(split("a::b\\::c", "::"), vec!["a", "b::c"]);
/// assert!(split("", ";").is_empty());
/// ```
#[must_use]
pub fn split(value: &str, sep: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    if sep.is_empty() {
        return vec![value.to_string()];
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut rest = value;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(sep) {
            if current.ends_with('\\') {
                current.pop();
                current.push_str(sep);
            } else {
                items.push(std::mem::take(&mut current));
            }
            rest = after;
            continue;
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            current.push(ch);
        }
        rest = chars.as_str();
    }

    items.push(current);
    items
}

/// Joins `items` with `sep`, escaping separators that occur inside an item.
#[must_use]
pub fn join<S: AsRef<str>>(items: &[S], sep: &str) -> String {
    let escaped_sep = format!("\\{}", sep);
    items
        .iter()
        .map(|item| {
            let item = item.as_ref();
            if sep.is_empty() {
                item.to_string()
            } else {
                item.replace(sep, &escaped_sep)
            }
        })
        .collect::<Vec<_>>()
        .join(sep)
}
