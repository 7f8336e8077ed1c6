//! Generic attribute/children tree produced from markup

use serde::Serialize;

/// Upper bound on element nesting accepted by the parser and traversals
pub const MAX_NESTING_DEPTH: usize = 256;

/// One element of a parsed markup document.
///
/// Attributes and child slots keep document order. Sibling elements sharing a
/// tag are grouped under the slot of the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<(String, Child)>,
    pub text: Option<String>,
}

/// Content of a child slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Child {
    /// Single occurrence of the tag
    Element(ParsedNode),
    /// Repeated siblings, in document order
    List(Vec<ParsedNode>),
    /// Single occurrence carrying only text: no attributes, no children
    Value(String),
}

impl ParsedNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, tag: &str) -> Option<&Child> {
        self.children
            .iter()
            .find(|(key, _)| key == tag)
            .map(|(_, child)| child)
    }

    /// Whether the node has element children (text alone does not count)
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Tags of the immediate child slots, in document order
    pub fn child_tags(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(tag, _)| tag.as_str())
    }

    /// Add a child element, folding it into an existing slot for the same tag.
    ///
    /// A node with no attributes and no children but with text is stored as a
    /// [`Child::Value`] while it is the only occurrence of its tag.
    pub fn push_child(&mut self, child: ParsedNode) {
        let tag = child.tag.clone();
        match self.children.iter_mut().find(|(key, _)| *key == tag) {
            Some((_, slot)) => {
                let existing = std::mem::replace(slot, Child::List(Vec::new()));
                let mut items = match existing {
                    Child::Element(node) => vec![node],
                    Child::Value(text) => vec![ParsedNode {
                        tag: tag.clone(),
                        text: Some(text),
                        ..Default::default()
                    }],
                    Child::List(items) => items,
                };
                items.push(child);
                *slot = Child::List(items);
            }
            None => {
                let slot = if child.attributes.is_empty() && child.children.is_empty() {
                    match child.text {
                        Some(text) => Child::Value(text),
                        None => Child::Element(child),
                    }
                } else {
                    Child::Element(child)
                };
                self.children.push((tag, slot));
            }
        }
    }
}

impl Child {
    /// Element nodes held by this slot; a text value holds none
    pub fn nodes(&self) -> &[ParsedNode] {
        match self {
            Child::Element(node) => std::slice::from_ref(node),
            Child::List(nodes) => nodes,
            Child::Value(_) => &[],
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Child::List(_))
    }
}
