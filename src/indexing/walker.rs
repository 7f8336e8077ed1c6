//! File system walker for discovering files to index
//!
//! This module provides directory traversal with support for:
//! - .gitignore rules
//! - `.treesenseignore` files
//! - Extension to kind mapping
//! - Hidden file handling

use crate::config::IGNORE_FILE;
use crate::{Settings, SymbolKind};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Walks directories to find markup and native files
#[derive(Debug)]
pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    /// Create a new file walker with the given settings
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Every indexable file under `root` paired with the kind it feeds
    pub fn walk_all(&self, root: &Path) -> Vec<(PathBuf, SymbolKind)> {
        Self::walk_files(root)
            .filter_map(|path| {
                let kind = self.settings.indexing.kind_for_path(&path)?;
                Some((path, kind))
            })
            .collect()
    }

    fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> + use<> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(None)
            .require_git(false);

        builder.add_custom_ignore_filename(IGNORE_FILE);

        builder
            .build()
            .filter_map(Result::ok) // Skip files we can't access
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| {
                // Skip hidden files (files starting with .)
                !path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'))
            })
    }
}
