//! `{{tag}}` scanning and substitution on plain text.
use tracing::{debug, warn};

use crate::core::tags::{Resolved, TagMap};

/// Byte range of one `{{key}}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    pub start: usize,
    pub end: usize,
    pub key: String,
}

pub fn find_tags(text: &str) -> Vec<TagSpan> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find("{{") {
        let open = pos + found;
        let Some(found) = text[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + found;
        // innermost opening brace pair before the closing one
        let open = text[open..close].rfind("{{").map_or(open, |i| open + i);
        let key = text[open + 2..close].trim();
        if !key.is_empty() {
            spans.push(TagSpan {
                start: open,
                end: close + 2,
                key: key.to_string(),
            });
        }
        pos = close + 2;
    }
    spans
}

pub fn has_tags(text: &str) -> bool {
    !find_tags(text).is_empty()
}

/// Replacement text for a tag, `None` when the key is unknown and must stay untouched.
pub fn replacement(tags: &TagMap, key: &str, row: Option<usize>) -> Option<String> {
    match tags.resolve(key) {
        Some(Resolved::Table) => {
            warn!("Tag {{{{{}}}}} names a table; use {{{{{}.<column>}}}} inside a table row", key, key);
            Some(String::new())
        }
        Some(resolved) => Some(resolved.text(row)),
        None => {
            debug!("Unknown tag {{{{{}}}}} left in place", key);
            None
        }
    }
}

/// Replace every known tag in `text`.
pub fn render(text: &str, tags: &TagMap, row: Option<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in find_tags(text) {
        if let Some(value) = replacement(tags, &span.key, row) {
            out.push_str(&text[last..span.start]);
            out.push_str(&value);
            last = span.end;
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Repetition count of a row containing `text`: the longest column among its
/// tags, `None` when no tag is column-valued.
pub fn column_len(text: &str, tags: &TagMap) -> Option<usize> {
    find_tags(text)
        .iter()
        .filter_map(|span| tags.resolve(&span.key).and_then(|r| r.column_len()))
        .max()
}

/// The value is exactly one tag, e.g. `{{price}}` or ` {{ price }} `.
pub fn single_tag(text: &str) -> Option<TagSpan> {
    let spans = find_tags(text);
    match spans.as_slice() {
        [span] if text[..span.start].trim().is_empty() && text[span.end..].trim().is_empty() => {
            Some(span.clone())
        }
        _ => None,
    }
}
