//! Live definition index for BehaviorTree XML workspaces and their C++ nodes

pub mod config;
pub mod documentation;
pub mod error;
pub mod indexing;
pub mod io;
pub mod parsing;
pub mod retrieve;
pub mod storage;
pub mod types;

// Explicit exports for better API clarity
pub use config::Settings;
pub use documentation::DocSections;
pub use error::{IndexError, IndexResult, ParseError, ParseResult};
pub use indexing::{FileSystemWatcher, IndexStats, WatchEvent, Workspace};
pub use parsing::{Child, ParsedNode};
pub use retrieve::{ChildSymbol, Definition, EntitySymbol, HoverInfo, NodeDocumentation};
pub use storage::{FileRegistry, IndexStore};
pub use types::{FileId, Location, Span, SymbolKind, TextRange};
