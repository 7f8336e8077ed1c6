//! Indented structural outline of an entity
//!
//! Only structure is summarized. Text content of leaf values is never echoed.

use crate::parsing::node::{Child, MAX_NESTING_DEPTH, ParsedNode};

/// Render `node` under `tag` as outline lines, two spaces of indent per level
pub fn render(tag: &str, node: &ParsedNode, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(tag, node, depth, &mut lines);
    lines
}

/// [`render`] from depth zero, joined with newlines
pub fn render_outline(node: &ParsedNode) -> String {
    render(&node.tag, node, 0).join("\n")
}

fn render_into(tag: &str, node: &ParsedNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let attrs = format_attributes(node);

    if !node.has_children() {
        lines.push(format!("{indent}- <{tag}{attrs} />"));
        return;
    }

    lines.push(format!("{indent}- <{tag}{attrs}>"));
    if depth + 1 >= MAX_NESTING_DEPTH {
        lines.push(format!("{indent}  - ..."));
    } else {
        for (child_tag, child) in &node.children {
            match child {
                Child::Element(item) => render_into(child_tag, item, depth + 1, lines),
                Child::List(items) => {
                    for item in items {
                        render_into(child_tag, item, depth + 1, lines);
                    }
                }
                Child::Value(_) => lines.push(format!("{indent}  - <{child_tag} />")),
            }
        }
    }
    lines.push(format!("{indent}- </{tag}>"));
}

fn format_attributes(node: &ParsedNode) -> String {
    node.attributes
        .iter()
        .map(|(name, value)| format!(" {name}=\"{value}\""))
        .collect()
}
