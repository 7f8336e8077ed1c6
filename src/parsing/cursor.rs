//! Recovering what a cursor points at on a single line of markup
//!
//! Columns are counted in UTF-16 code units, like [`crate::Location`].

use crate::config::MarkupConfig;
use crate::{IndexError, IndexResult};
use regex::Regex;

/// Byte offset of a UTF-16 column, clamped to the end of the line
pub fn byte_offset(line: &str, column: u32) -> usize {
    let mut units = 0u32;
    for (offset, ch) in line.char_indices() {
        if units >= column {
            return offset;
        }
        units += ch.len_utf16() as u32;
    }
    line.len()
}

/// Contents of the `"..."` run covering `column`, quotes excluded.
///
/// The cursor may sit on either quote. Empty quotes never match.
pub fn quoted_word_at(line: &str, column: u32) -> Option<&str> {
    let cursor = byte_offset(line, column);
    let quotes: Vec<usize> = line.match_indices('"').map(|(i, _)| i).collect();

    quotes.chunks_exact(2).find_map(|pair| {
        let (open, close) = (pair[0], pair[1]);
        let inner = &line[open + 1..close];
        (!inner.is_empty() && open <= cursor && cursor <= close + 1).then_some(inner)
    })
}

/// Identifier under `column` when it directly follows `<` or `</`
pub fn tag_at(line: &str, column: u32) -> Option<&str> {
    let cursor = byte_offset(line, column);
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let start = line[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(cursor, |(i, _)| i);
    let end = line[cursor..]
        .char_indices()
        .find(|(_, c)| !is_word(*c))
        .map_or(line.len(), |(i, _)| cursor + i);

    let word = &line[start..end];
    if !word.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }

    let before = line[..start].trim_end();
    let before = before.strip_suffix('/').unwrap_or(before);
    before.ends_with('<').then_some(word)
}

/// Matches references to tree entities on markup lines
#[derive(Debug, Clone)]
pub struct ReferenceMatcher {
    attributes: Vec<String>,
    completion: Regex,
}

impl ReferenceMatcher {
    /// Recognize the identifying attribute and every reference attribute
    pub fn new(config: &MarkupConfig) -> IndexResult<Self> {
        let attributes: Vec<String> = std::iter::once(&config.id_attribute)
            .chain(&config.reference_attributes)
            .map(|attr| format!("{attr}="))
            .collect();

        let alternatives = attributes
            .iter()
            .map(|attr| regex::escape(attr))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r#"(?:{alternatives})\s*"([^"]*)$"#);
        let completion = Regex::new(&pattern).map_err(|e| IndexError::ConfigError {
            reason: format!("invalid reference attributes: {e}"),
        })?;

        Ok(Self {
            attributes,
            completion,
        })
    }

    /// Quoted tree name under the cursor on a line that names a tree
    pub fn reference_at<'a>(&self, line: &'a str, column: u32) -> Option<&'a str> {
        if !self.attributes.iter().any(|attr| line.contains(attr.as_str())) {
            return None;
        }
        quoted_word_at(line, column)
    }

    /// Partially typed value of an open reference attribute before the cursor
    pub fn completion_prefix<'a>(&self, line: &'a str, column: u32) -> Option<&'a str> {
        let head = &line[..byte_offset(line, column)];
        self.completion
            .captures(head)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
