//! Query API over a [`Workspace`]
//!
//! Lookups read the in-memory index. Outlines, documentation and entity
//! listings read the file fresh from disk on every call. Unreadable files
//! degrade to an absent result; malformed markup is surfaced as
//! [`IndexError::Parse`].

use crate::documentation::{self, DocSections};
use crate::indexing::{LineIndex, Workspace};
use crate::parsing::{collect_by_tag, cursor, find_entity, parse_markup, render_outline, span};
use crate::types::Span;
use crate::{IndexError, IndexResult, Location, SymbolKind};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A definition site with its file path resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub kind: SymbolKind,
    pub path: PathBuf,
    pub location: Location,
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {}:{}:{}",
            self.kind,
            self.name,
            self.path.display(),
            self.location.line + 1,
            self.location.column + 1
        )
    }
}

/// Documentation of a native node declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDocumentation {
    /// Declaration line, trimmed
    pub signature: String,
    pub sections: DocSections,
}

impl fmt::Display for NodeDocumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.signature)?;
        let sections = &self.sections;
        if !sections.brief.is_empty() {
            writeln!(f, "\n{}", sections.brief)?;
        }
        if !sections.description.is_empty() {
            writeln!(f, "\n{}", sections.description.join(" "))?;
        }
        for (title, ports) in [
            ("Input Ports", &sections.input_ports),
            ("Output Ports", &sections.output_ports),
        ] {
            writeln!(f, "\n{title}")?;
            if ports.is_empty() {
                writeln!(f, "  None")?;
            }
            for port in ports {
                writeln!(f, "  - {port}")?;
            }
        }
        Ok(())
    }
}

/// Immediate child slot of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildSymbol {
    pub tag: String,
    /// The tag occurs more than once among the entity's children
    pub repeated: bool,
    /// Byte offset of the first `<tag` at or after the entity start
    pub offset: usize,
}

impl ChildSymbol {
    /// `tag`, or `tag[]` for repeated siblings
    pub fn display_name(&self) -> String {
        if self.repeated {
            format!("{}[]", self.tag)
        } else {
            self.tag.clone()
        }
    }
}

/// An identified entity of a markup file with its textual span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySymbol {
    pub name: String,
    pub span: Span,
    pub children: Vec<ChildSymbol>,
}

impl fmt::Display for EntitySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}..{}]", self.name, self.span.start, self.span.end)?;
        for child in &self.children {
            write!(f, "\n  {} @{}", child.display_name(), child.offset)?;
        }
        Ok(())
    }
}

/// What a cursor position resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HoverInfo {
    Tree { name: String, outline: String },
    Node { name: String, documentation: NodeDocumentation },
}

impl fmt::Display for HoverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoverInfo::Tree { name, outline } => write!(f, "Tree {name} structure:\n{outline}"),
            HoverInfo::Node { name, documentation } => write!(f, "Node {name}\n{documentation}"),
        }
    }
}

impl Workspace {
    /// All definitions of `name`, in scan order
    pub fn lookup(&self, kind: SymbolKind, name: &str) -> Vec<Location> {
        self.store.lookup(kind, name)
    }

    /// [`Workspace::lookup`] with file paths attached
    pub fn definitions(&self, kind: SymbolKind, name: &str) -> Vec<Definition> {
        self.lookup(kind, name)
            .into_iter()
            .filter_map(|location| {
                Some(Definition {
                    name: name.to_string(),
                    kind,
                    path: self.registry.path_of(location.file_id)?,
                    location,
                })
            })
            .collect()
    }

    /// Indexed names of `kind` starting with `prefix`, sorted
    pub fn completions(&self, kind: SymbolKind, prefix: &str) -> Vec<String> {
        self.store
            .names(kind)
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect()
    }

    /// Outline of the entity `name` defined in `path`.
    ///
    /// `Ok(None)` when the file is unreadable or has no such entity.
    pub async fn outline(&self, path: &Path, name: &str) -> IndexResult<Option<String>> {
        let Some(text) = read_for_query(path).await else {
            return Ok(None);
        };
        let root = parse_markup(&text).map_err(|source| IndexError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let markup = &self.settings.markup;
        Ok(find_entity(&root, &markup.entity_tag, &markup.id_attribute, name).map(render_outline))
    }

    /// Outline of a tree at its first indexed definition
    pub async fn tree_outline(&self, name: &str) -> IndexResult<Option<String>> {
        match self.definitions(SymbolKind::Tree, name).first() {
            Some(definition) => self.outline(&definition.path, name).await,
            None => Ok(None),
        }
    }

    /// Documentation attached to the declaration on zero-based `declaration_line`
    pub async fn documentation(&self, path: &Path, declaration_line: u32) -> Option<NodeDocumentation> {
        let text = read_for_query(path).await?;
        let lines: Vec<&str> = text.lines().collect();
        let line = declaration_line as usize;
        let signature = lines.get(line)?.trim().to_string();

        Some(NodeDocumentation {
            signature,
            sections: documentation::document(&lines, line),
        })
    }

    /// Documentation of a node class at its first indexed definition
    pub async fn node_documentation(&self, name: &str) -> Option<NodeDocumentation> {
        let definition = self.definitions(SymbolKind::Node, name).into_iter().next()?;
        self.documentation(&definition.path, definition.location.line).await
    }

    /// Identified entities of a markup file with spans and child tags
    pub async fn entities_in_file(&self, path: &Path) -> IndexResult<Vec<EntitySymbol>> {
        let Some(text) = read_for_query(path).await else {
            return Ok(Vec::new());
        };
        let root = parse_markup(&text).map_err(|source| IndexError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let file_id = self.registry.get_or_insert(&canonical_path(path))?;

        let markup = &self.settings.markup;
        let mut symbols = Vec::new();
        for entity in collect_by_tag(&root, &markup.entity_tag, &markup.id_attribute) {
            let Some(name) = entity.attribute(&markup.id_attribute) else {
                continue;
            };
            let Some(range) = span::resolve_entity(&text, &markup.entity_tag, &markup.id_attribute, name)
            else {
                debug!("start tag not found for {name} in {}", path.display());
                continue;
            };

            let children = entity
                .children
                .iter()
                .filter_map(|(tag, child)| {
                    let offset = text[range.start..].find(&format!("<{tag}"))? + range.start;
                    Some(ChildSymbol {
                        tag: tag.clone(),
                        repeated: child.is_list(),
                        offset,
                    })
                })
                .collect();

            symbols.push(EntitySymbol {
                name: name.to_string(),
                span: range.in_file(file_id),
                children,
            });
        }
        Ok(symbols)
    }

    /// Tree names completing the reference value typed before `column`
    pub fn complete_at(&self, line: &str, column: u32) -> Vec<String> {
        match self.references.completion_prefix(line, column) {
            Some(prefix) => self.completions(SymbolKind::Tree, prefix),
            None => Vec::new(),
        }
    }

    /// Tree definitions of the quoted name under the cursor
    pub fn definitions_at(&self, line: &str, column: u32) -> Vec<Definition> {
        cursor::quoted_word_at(line, column)
            .map(|name| self.definitions(SymbolKind::Tree, name))
            .unwrap_or_default()
    }

    /// Tree outline for a tree reference under the cursor, else node
    /// documentation for a tag name under the cursor
    pub async fn hover_at(&self, line: &str, column: u32) -> Option<HoverInfo> {
        if let Some(name) = self.references.reference_at(line, column) {
            match self.tree_outline(name).await {
                Ok(Some(outline)) => {
                    return Some(HoverInfo::Tree {
                        name: name.to_string(),
                        outline,
                    });
                }
                Ok(None) => {}
                Err(e) => debug!("Tree hover error: {e}"),
            }
        }

        let tag = cursor::tag_at(line, column)?;
        let documentation = self.node_documentation(tag).await?;
        Some(HoverInfo::Node {
            name: tag.to_string(),
            documentation,
        })
    }

    /// Hover for a cursor given as a zero-based line and UTF-16 column of a file
    pub async fn hover_in_file(&self, path: &Path, line: u32, column: u32) -> Option<HoverInfo> {
        let text = read_for_query(path).await?;
        let line_text = LineIndex::new(&text).line_text(line)?;
        self.hover_at(line_text, column).await
    }
}

/// Registry key for `path`; the path as given when it cannot be resolved
fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

async fn read_for_query(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("cannot read {}: {e}", path.display());
            None
        }
    }
}
