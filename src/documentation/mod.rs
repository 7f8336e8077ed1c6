//! Documentation comments of native node declarations

pub mod comment;
pub mod sections;

pub use comment::extract;
pub use sections::{DocSections, parse};

/// Extract and parse the comment above `declaration_line` in one step
pub fn document<S: AsRef<str>>(lines: &[S], declaration_line: usize) -> DocSections {
    parse(&extract(lines, declaration_line))
}
