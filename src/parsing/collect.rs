//! Finding identified entities anywhere in a parsed document

use crate::parsing::node::{MAX_NESTING_DEPTH, ParsedNode};

/// Every node tagged `tag` that carries `id_attribute`, depth-first pre-order.
///
/// Siblings are visited slot by slot, so repeated tags are reached together
/// at the position of their first occurrence. The root itself is a candidate.
/// Nodes with the right tag but no identifier are skipped, their descendants
/// are still searched. Subtrees deeper than [`MAX_NESTING_DEPTH`] are not
/// visited.
pub fn collect_by_tag<'a>(root: &'a ParsedNode, tag: &str, id_attribute: &str) -> Vec<&'a ParsedNode> {
    let mut found = Vec::new();
    visit(root, tag, id_attribute, 0, &mut found);
    found
}

fn visit<'a>(
    node: &'a ParsedNode,
    tag: &str,
    id_attribute: &str,
    depth: usize,
    found: &mut Vec<&'a ParsedNode>,
) {
    if depth >= MAX_NESTING_DEPTH {
        tracing::warn!("entity search stopped at nesting depth {depth}");
        return;
    }

    if node.tag == tag && node.attribute(id_attribute).is_some() {
        found.push(node);
    }

    for (_, child) in &node.children {
        for item in child.nodes() {
            visit(item, tag, id_attribute, depth + 1, found);
        }
    }
}

/// First entity whose identifying attribute equals `name`
pub fn find_entity<'a>(
    root: &'a ParsedNode,
    tag: &str,
    id_attribute: &str,
    name: &str,
) -> Option<&'a ParsedNode> {
    collect_by_tag(root, tag, id_attribute)
        .into_iter()
        .find(|node| node.attribute(id_attribute) == Some(name))
}
