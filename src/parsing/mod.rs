//! Structural view of markup documents
//!
//! [`parse_markup`] builds a [`ParsedNode`] tree; the other modules query it
//! (entity collection, outlines) or work on raw text (spans, cursor lookups).

pub mod collect;
pub mod cursor;
pub mod node;
pub mod outline;
pub mod span;
pub mod xml;

pub use collect::{collect_by_tag, find_entity};
pub use cursor::ReferenceMatcher;
pub use node::{Child, MAX_NESTING_DEPTH, ParsedNode};
pub use outline::{render, render_outline};
pub use xml::{MarkupParser, parse_markup};
