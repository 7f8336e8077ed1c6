use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// Zero-based position of a definition. Columns count UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file_id: FileId,
    pub line: u32,
    pub column: u32,
}

/// Byte range into a document's raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// Text span of an entity definition inside a specific file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub file_id: FileId,
    pub start: usize,
    pub end: usize,
}

/// The two independent categories of indexed names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Identifier of a tree entity declared in markup (`<BehaviorTree ID="...">`)
    Tree,
    /// Native class declared in source (`class MoveArm ...`)
    Node,
}

impl FileId {
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Location {
    pub fn new(file_id: FileId, line: u32, column: u32) -> Self {
        Self {
            file_id,
            line,
            column,
        }
    }
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn in_file(self, file_id: FileId) -> Span {
        Span {
            file_id,
            start: self.start,
            end: self.end,
        }
    }
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 2] = [SymbolKind::Tree, SymbolKind::Node];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Tree => "Tree",
            SymbolKind::Node => "Node",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tree" | "tree" => Ok(SymbolKind::Tree),
            "Node" | "node" => Ok(SymbolKind::Node),
            _ => Err("Unknown symbol kind"),
        }
    }
}
