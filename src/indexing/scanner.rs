//! Lexical scan of a file's text for definitions
//!
//! Deliberately not a parser: patterns match anywhere in the text, including
//! inside comments and string literals.

use crate::config::Settings;
use crate::indexing::LineIndex;
use crate::{FileId, IndexError, IndexResult, Location, SymbolKind};
use regex::Regex;

/// Compiled definition patterns for both symbol kinds
#[derive(Debug, Clone)]
pub struct DefinitionScanner {
    tree: Regex,
    node: Regex,
}

impl DefinitionScanner {
    /// Build patterns for `<{tag} {id}="value">` and `{keyword} Identifier`
    pub fn new(entity_tag: &str, id_attribute: &str, declaration_keyword: &str) -> IndexResult<Self> {
        let tree = format!(
            r#"<{}\s+{}=["']([^"']+)["']"#,
            regex::escape(entity_tag),
            regex::escape(id_attribute)
        );
        let node = format!(r"\b{}\s+([A-Za-z_]\w*)", regex::escape(declaration_keyword));

        Ok(Self {
            tree: compile(&tree)?,
            node: compile(&node)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> IndexResult<Self> {
        Self::new(
            &settings.markup.entity_tag,
            &settings.markup.id_attribute,
            &settings.native.declaration_keyword,
        )
    }

    fn pattern(&self, kind: SymbolKind) -> &Regex {
        match kind {
            SymbolKind::Tree => &self.tree,
            SymbolKind::Node => &self.node,
        }
    }

    /// Every `(name, byte offset of the match)` in document order
    pub fn scan(&self, kind: SymbolKind, text: &str) -> Vec<(String, usize)> {
        self.pattern(kind)
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some((name.as_str().to_string(), whole.start()))
            })
            .collect()
    }

    /// Scan and convert offsets into locations within `file_id`
    pub fn locate(&self, file_id: FileId, kind: SymbolKind, text: &str) -> Vec<(String, Location)> {
        let lines = LineIndex::new(text);
        self.scan(kind, text)
            .into_iter()
            .map(|(name, offset)| {
                let (line, column) = lines.line_col(offset);
                (name, Location::new(file_id, line, column))
            })
            .collect()
    }
}

impl Default for DefinitionScanner {
    fn default() -> Self {
        Self {
            tree: Regex::new(r#"<BehaviorTree\s+ID=["']([^"']+)["']"#).expect("valid tree pattern"),
            node: Regex::new(r"\bclass\s+([A-Za-z_]\w*)").expect("valid node pattern"),
        }
    }
}

fn compile(pattern: &str) -> IndexResult<Regex> {
    Regex::new(pattern).map_err(|e| IndexError::ConfigError {
        reason: format!("invalid definition pattern '{pattern}': {e}"),
    })
}
