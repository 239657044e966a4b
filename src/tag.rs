//! Field directives carried in serde field names.
//!
//! Serde hands the codec each field's identifier: the Rust field name, or the
//! string given to `#[serde(rename = "...")]`. That identifier doubles as a
//! directive tag:
//!
//! ```text
//! tag        = directive *( "," directive )
//! directive  = "-" | "omitempty" | name | "sep:" rest | "sep=" rest
//! ```
//!
//! - `-` ignores the field; the rest of the tag is not looked at.
//! - `omitempty` drops the field from encoded output when it holds its zero value.
//! - `name` is the document key; the first bare token wins.
//! - `sep:`/`sep=` takes the *remainder of the tag* as the list separator, so it
//!   may contain commas (`sep=,`). Backslashes in it are removed. It must come last.
//!
//! ```rust
//! use serde_keyfile::tag::Directives;
//!
//! let d = Directives::parse("Keywords,omitempty,sep=,").unwrap();
//! assert_eq!(d.name.as_deref(), Some("Keywords"));
//! assert!(d.omit_empty);
//! assert_eq!(d.separator.as_deref(), Some(","));
//! ```

use crate::{Error, Result};

const IGNORE_MARKER: &str = "-";
const OMIT_EMPTY_MARKER: &str = "omitempty";

/// Normalized directives for one group or field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    /// Document key; `None` when the tag only carries options.
    pub name: Option<String>,
    pub ignore: bool,
    pub omit_empty: bool,
    /// List separator; `None` means the configured default.
    pub separator: Option<String>,
}

impl Directives {
    /// Parses a directive tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTag`] for an empty separator, a second name, or an
    /// unknown `key=value` option.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut directives = Directives::default();
        let mut rest = tag;

        loop {
            let (token, remainder) = match rest.find(',') {
                Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
                None => (rest, None),
            };
            let trimmed = token.trim();

            if trimmed == IGNORE_MARKER {
                return Ok(Directives {
                    ignore: true,
                    ..Directives::default()
                });
            }

            let trimmed_rest = rest.trim_start();
            if let Some(sep) = trimmed_rest
                .strip_prefix("sep:")
                .or_else(|| trimmed_rest.strip_prefix("sep="))
            {
                let sep = sep.replace('\\', "");
                if sep.is_empty() {
                    return Err(Error::invalid_tag(tag, "separator must not be empty"));
                }
                directives.separator = Some(sep);
                break;
            }

            if trimmed == OMIT_EMPTY_MARKER {
                directives.omit_empty = true;
            } else if trimmed.contains(':') || trimmed.contains('=') {
                return Err(Error::invalid_tag(
                    tag,
                    &format!("unknown directive `{}`", trimmed),
                ));
            } else if !trimmed.is_empty() {
                if directives.name.is_some() {
                    return Err(Error::invalid_tag(
                        tag,
                        &format!("unexpected second key name `{}`", trimmed),
                    ));
                }
                directives.name = Some(trimmed.to_string());
            }

            match remainder {
                Some(next) => rest = next,
                None => break,
            }
        }

        Ok(directives)
    }

    /// Directives for a key with no tag options, used by map-mode binding.
    pub(crate) fn for_key(key: &str) -> Self {
        Directives {
            name: Some(key.to_string()),
            ..Directives::default()
        }
    }

    /// The document key, or an error when the tag declared none.
    pub(crate) fn key<'a>(&'a self, tag: &str) -> Result<&'a str> {
        self.name
            .as_deref()
            .ok_or_else(|| Error::invalid_tag(tag, "no key name given"))
    }

    /// Pairs the field identified by `tag` with its document key and list separator.
    pub(crate) fn bind<'a>(
        &'a self,
        tag: &'a str,
        default_separator: &'a str,
    ) -> Result<BoundField<'a>> {
        Ok(BoundField {
            key: self.key(tag)?,
            field: tag,
            separator: self.separator.as_deref().unwrap_or(default_separator),
        })
    }
}

/// A record field paired with the document key it is read from or written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoundField<'a> {
    pub key: &'a str,
    /// The serde identifier, used when attributing errors.
    pub field: &'a str,
    pub separator: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier() {
        let d = Directives::parse("port").unwrap();
        assert_eq!(d, Directives::for_key("port"));
    }

    #[test]
    fn test_ignore_short_circuits() {
        let d = Directives::parse("Name,-,sep=|").unwrap();
        assert!(d.ignore);
        assert_eq!(d.name, None);
        assert_eq!(d.separator, None);
    }

    #[test]
    fn test_separator_takes_remainder() {
        let d = Directives::parse("list,sep:;,").unwrap();
        assert_eq!(d.separator.as_deref(), Some(";,"));

        let d = Directives::parse("list, sep=\\,").unwrap();
        assert_eq!(d.separator.as_deref(), Some(","));
    }

    #[test]
    fn test_options_without_name() {
        let d = Directives::parse(",omitempty").unwrap();
        assert_eq!(d.name, None);
        assert!(d.omit_empty);
        assert!(d.key(",omitempty").is_err());
    }

    #[test]
    fn test_bind_uses_default_separator() {
        let d = Directives::parse("Name").unwrap();
        let bound = d.bind("Name", ";").unwrap();
        assert_eq!(bound.key, "Name");
        assert_eq!(bound.separator, ";");

        let d = Directives::parse("Keywords,sep=|").unwrap();
        assert_eq!(d.bind("Keywords,sep=|", ";").unwrap().separator, "|");
    }

    #[test]
    fn test_invalid_tags() {
        assert!(Directives::parse("a,sep=").is_err());
        assert!(Directives::parse("a,b").is_err());
        assert!(Directives::parse("a,color=red").is_err());
    }
}
