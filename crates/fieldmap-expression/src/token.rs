/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Field placeholders in expression text.
//!
//! Three forms are recognized:
//!
//! - `${docId:path}`: a field of a specific document
//! - `${path}`: a path, relative to the active collection context if any
//! - `{n}` or `${n}`: the n-th user-mapped source field, 1-based

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{(?P<payload>[A-Za-z0-9.:/<>\[\]_-]+)\}|\{(?P<index>[0-9]+)\}")
        .expect("placeholder pattern is valid")
});

/// A parsed placeholder payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Qualified { doc_id: String, path: String },
    Relative { path: String },
    Positional(usize),
}

impl Placeholder {
    /// Classify the text between `${` and `}`.
    ///
    /// Returns None for payloads with more than one `:`.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldmap_expression::Placeholder;
    ///
    /// assert_eq!(Placeholder::parse("2"), Some(Placeholder::Positional(2)));
    /// assert_eq!(
    ///     Placeholder::parse("city"),
    ///     Some(Placeholder::Relative { path: "city".into() })
    /// );
    /// assert_eq!(Placeholder::parse("a:b:c"), None);
    /// ```
    pub fn parse(payload: &str) -> Option<Placeholder> {
        if !payload.is_empty() && payload.bytes().all(|b| b.is_ascii_digit()) {
            return payload.parse().ok().map(Placeholder::Positional);
        }

        let mut parts = payload.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, None) if !path.is_empty() => Some(Placeholder::Relative {
                path: path.to_string(),
            }),
            (Some(doc_id), Some(path), None) if !doc_id.is_empty() && !path.is_empty() => {
                Some(Placeholder::Qualified {
                    doc_id: doc_id.to_string(),
                    path: path.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// A placeholder found in one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceholderMatch<'t> {
    /// Byte range of the whole token in the line
    pub range: Range<usize>,
    /// The token as written
    pub raw: &'t str,
    /// Classified payload; None when the payload is malformed
    pub placeholder: Option<Placeholder>,
}

/// Placeholders of a single line, left to right.
pub(crate) fn scan_line(
    line: &str,
    positional_placeholders: bool,
) -> impl Iterator<Item = PlaceholderMatch<'_>> + '_ {
    PLACEHOLDER_RE.captures_iter(line).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let placeholder = if let Some(payload) = caps.name("payload") {
            Placeholder::parse(payload.as_str())
        } else if positional_placeholders {
            caps.name("index")
                .and_then(|index| index.as_str().parse().ok())
                .map(Placeholder::Positional)
        } else {
            return None;
        };
        Some(PlaceholderMatch {
            range: whole.range(),
            raw: whole.as_str(),
            placeholder,
        })
    })
}
