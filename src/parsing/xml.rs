//! Markup parser producing [`ParsedNode`] trees
//!
//! Uses the tree-sitter XML grammar for tokenizing and structure. tree-sitter
//! recovers from errors, so any ERROR or MISSING node in the syntax tree is
//! reported as a [`ParseError`] instead of yielding a partial tree.

use crate::error::{ParseError, ParseResult};
use crate::parsing::node::{MAX_NESTING_DEPTH, ParsedNode};
use tree_sitter::{Node, Parser};

const ELEMENT: &str = "element";
const START_TAGS: &[&str] = &["STag", "EmptyElemTag"];
const END_TAG: &str = "ETag";
const CONTENT: &str = "content";
const ATTRIBUTE: &str = "Attribute";
const ATTRIBUTE_VALUE: &str = "AttValue";
const NAME: &str = "Name";
const CHAR_DATA: &str = "CharData";
const CDATA: &str = "CDSect";
const REFERENCES: &[&str] = &["EntityRef", "CharRef"];

/// Reusable markup parser
pub struct MarkupParser {
    parser: Parser,
}

impl std::fmt::Debug for MarkupParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupParser").field("language", &"XML").finish()
    }
}

impl MarkupParser {
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_xml::LANGUAGE_XML.into())
            .map_err(|e| ParseError::ParserInit {
                language: "XML".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse a whole document and return its root element
    pub fn parse(&mut self, text: &str) -> ParseResult<ParsedNode> {
        let tree = self.parser.parse(text, None).ok_or_else(|| ParseError::Syntax {
            line: 1,
            column: 1,
            reason: "parser produced no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            // The grammar gives up on very deep documents before our own limit is reached
            if nesting_exceeds_limit(text) {
                return Err(ParseError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                });
            }
            return Err(first_error(root));
        }

        let mut cursor = root.walk();
        let element = root
            .named_children(&mut cursor)
            .find(|child| child.kind() == ELEMENT)
            .ok_or(ParseError::NoRootElement)?;

        build_element(element, text, 0)
    }
}

/// Parse markup text with a fresh parser
pub fn parse_markup(text: &str) -> ParseResult<ParsedNode> {
    MarkupParser::new()?.parse(text)
}

fn build_element(element: Node, source: &str, depth: usize) -> ParseResult<ParsedNode> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let mut node = ParsedNode::default();
    let mut text = String::new();

    let mut cursor = element.walk();
    for part in element.named_children(&mut cursor) {
        match part.kind() {
            kind if START_TAGS.contains(&kind) => {
                node.tag = tag_name(part, source);
                node.attributes = attributes(part, source);
            }
            END_TAG => {
                let found = tag_name(part, source);
                if found != node.tag {
                    return Err(ParseError::MismatchedTag {
                        expected: node.tag,
                        found,
                        line: part.start_position().row as u32 + 1,
                    });
                }
            }
            CONTENT => collect_content(part, source, depth, &mut node, &mut text)?,
            _ => collect_item(part, source, depth, &mut node, &mut text)?,
        }
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() {
        node.text = Some(trimmed.to_string());
    }
    Ok(node)
}

fn collect_content(
    content: Node,
    source: &str,
    depth: usize,
    node: &mut ParsedNode,
    text: &mut String,
) -> ParseResult<()> {
    let mut cursor = content.walk();
    for item in content.named_children(&mut cursor) {
        collect_item(item, source, depth, node, text)?;
    }
    Ok(())
}

fn collect_item(
    item: Node,
    source: &str,
    depth: usize,
    node: &mut ParsedNode,
    text: &mut String,
) -> ParseResult<()> {
    match item.kind() {
        ELEMENT => node.push_child(build_element(item, source, depth + 1)?),
        CHAR_DATA => text.push_str(&decode_entities(node_text(item, source))),
        CDATA => {
            let raw = node_text(item, source);
            let inner = raw
                .strip_prefix("<![CDATA[")
                .and_then(|rest| rest.strip_suffix("]]>"))
                .unwrap_or(raw);
            text.push_str(inner);
        }
        kind if REFERENCES.contains(&kind) => text.push_str(&decode_entities(node_text(item, source))),
        // Comments, processing instructions
        _ => {}
    }
    Ok(())
}

fn tag_name(tag: Node, source: &str) -> String {
    let mut cursor = tag.walk();
    let name = tag
        .named_children(&mut cursor)
        .find(|child| child.kind() == NAME)
        .or_else(|| tag.named_child(0));
    name.map(|n| node_text(n, source).to_string())
        .unwrap_or_default()
}

fn attributes(tag: Node, source: &str) -> Vec<(String, String)> {
    let mut cursor = tag.walk();
    tag.named_children(&mut cursor)
        .filter(|child| child.kind() == ATTRIBUTE)
        .filter_map(|attribute| {
            let mut inner = attribute.walk();
            let parts: Vec<Node> = attribute.named_children(&mut inner).collect();
            let name = *parts.first()?;
            let value = parts
                .iter()
                .copied()
                .find(|child| child.kind() == ATTRIBUTE_VALUE)
                .or_else(|| parts.last().copied())?;
            Some((
                node_text(name, source).to_string(),
                decode_entities(unquote(node_text(value, source))),
            ))
        })
        .collect()
}

fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Decode the predefined XML entities and numeric character references
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let Some(semi) = after.find(';') else {
            out.push_str(after);
            return out;
        };

        let entity = &after[1..semi];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&after[..=semi]),
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    out
}

/// Lexical element depth check, skipping comments, CDATA, declarations and
/// quoted attribute values
fn nesting_exceeds_limit(text: &str) -> bool {
    let mut depth = 0usize;
    let mut pos = 0;
    while let Some(found) = text[pos..].find('<') {
        let start = pos + found;
        let rest = &text[start..];
        let skip_to = |terminator: &str| rest.find(terminator).map_or(rest.len(), |end| end + terminator.len());

        let consumed = if rest.starts_with("<!--") {
            skip_to("-->")
        } else if rest.starts_with("<![CDATA[") {
            skip_to("]]>")
        } else if rest.starts_with("<?") || rest.starts_with("<!") {
            skip_to(">")
        } else {
            let end = tag_end(rest);
            let tag = &rest[..end];
            if tag.starts_with("</") {
                depth = depth.saturating_sub(1);
            } else if !tag.ends_with('/') {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return true;
                }
            }
            (end + 1).min(rest.len())
        };
        pos = start + consumed;
    }
    false
}

/// Offset of the `>` closing the tag at the start of `rest`, outside quotes
fn tag_end(rest: &str) -> usize {
    let mut quote = None;
    for (i, c) in rest.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, '>') => return i,
            _ => {}
        }
    }
    rest.len()
}

/// Locate the first ERROR or MISSING node, depth-first without recursion
fn first_error(root: Node) -> ParseError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            let reason = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "unexpected input".to_string()
            };
            return ParseError::Syntax {
                line: position.row as u32 + 1,
                column: position.column as u32 + 1,
                reason,
            };
        }

        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    ParseError::Syntax {
        line: 1,
        column: 1,
        reason: "malformed document".to_string(),
    }
}
