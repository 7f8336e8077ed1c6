//! Textual span of an entity inside raw markup
//!
//! The close boundary is the nearest close tag following the opening pattern.
//! Entities nesting an element of their own tag therefore end early, at the
//! inner close tag.

use crate::types::TextRange;

/// Opening text of an entity, e.g. `<BehaviorTree ID="Main"`
pub fn open_pattern(tag: &str, id_attribute: &str, name: &str) -> String {
    format!("<{tag} {id_attribute}=\"{name}\"")
}

/// Generic close tag for `tag`
pub fn close_pattern(tag: &str) -> String {
    format!("</{tag}>")
}

/// Range from the first `open` to the end of the first `close` at or after it.
///
/// When no close tag follows, the range collapses to the start offset.
pub fn resolve(text: &str, open: &str, close: &str) -> Option<TextRange> {
    let start = text.find(open)?;
    let end = text[start..]
        .find(close)
        .map_or(start, |offset| start + offset + close.len());
    Some(TextRange::new(start, end))
}

/// Span of the entity `name` using the standard open/close patterns
pub fn resolve_entity(text: &str, tag: &str, id_attribute: &str, name: &str) -> Option<TextRange> {
    resolve(
        text,
        &open_pattern(tag, id_attribute, name),
        &close_pattern(tag),
    )
}
