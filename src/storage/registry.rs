//! Mapping between workspace paths and the compact file ids stored in locations

use crate::{FileId, IndexError, IndexResult};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out one [`FileId`] per path for the process lifetime.
///
/// Ids are never reused: a deleted file keeps its id, so a recreated file
/// shows up under the same id as before.
#[derive(Clone, Debug)]
pub struct FileRegistry {
    by_path: Arc<DashMap<PathBuf, FileId>>,
    by_id: Arc<DashMap<FileId, PathBuf>>,
    next_id: Arc<AtomicU32>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self {
            by_path: Arc::new(DashMap::new()),
            by_id: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Get the id of `path`, registering it if unseen
    pub fn get_or_insert(&self, path: &Path) -> IndexResult<FileId> {
        if let Some(id) = self.by_path.get(path) {
            return Ok(*id);
        }

        let entry = self.by_path.entry(path.to_path_buf());
        let id = match entry {
            dashmap::mapref::entry::Entry::Occupied(existing) => *existing.get(),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
                let id = FileId::new(raw).ok_or(IndexError::FileIdExhausted)?;
                vacant.insert(id);
                self.by_id.insert(id, path.to_path_buf());
                id
            }
        };

        Ok(id)
    }

    pub fn id_of(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).map(|id| *id)
    }

    pub fn path_of(&self, id: FileId) -> Option<PathBuf> {
        self.by_id.get(&id).map(|path| path.clone())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
