use crate::{FileId, Location, SymbolKind};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Name → locations for one symbol kind, plus the reverse file → names map
/// used to drop a file's contributions without scanning every entry.
#[derive(Debug, Default)]
struct SymbolTable {
    by_name: HashMap<String, Vec<Location>>,
    by_file: HashMap<FileId, HashSet<String>>,
}

impl SymbolTable {
    fn remove_file(&mut self, file_id: FileId) -> usize {
        let Some(names) = self.by_file.remove(&file_id) else {
            return 0;
        };

        let mut removed = 0;
        for name in names {
            let now_empty = match self.by_name.get_mut(&name) {
                Some(locations) => {
                    let before = locations.len();
                    locations.retain(|loc| loc.file_id != file_id);
                    removed += before - locations.len();
                    locations.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.by_name.remove(&name);
                tracing::debug!("dropped \"{name}\" (no remaining definitions)");
            }
        }
        removed
    }

    fn insert(&mut self, file_id: FileId, name: String, location: Location) {
        let names = self.by_file.entry(file_id).or_default();
        if !names.contains(&name) {
            names.insert(name.clone());
        }
        self.by_name.entry(name).or_default().push(location);
    }
}

/// Shared definition index for both symbol kinds.
///
/// Every mutation of a kind happens under that kind's write lock, so readers
/// observe a file's definitions either entirely before or entirely after a
/// [`replace`](IndexStore::replace).
#[derive(Clone, Debug, Default)]
pub struct IndexStore {
    trees: Arc<RwLock<SymbolTable>>,
    nodes: Arc<RwLock<SymbolTable>>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: SymbolKind) -> &RwLock<SymbolTable> {
        match kind {
            SymbolKind::Tree => &self.trees,
            SymbolKind::Node => &self.nodes,
        }
    }

    /// Drop every location of `file_id` for `kind`, then append `pairs` in order.
    ///
    /// An empty `pairs` still clears the file's previous definitions.
    pub fn replace(
        &self,
        file_id: FileId,
        kind: SymbolKind,
        pairs: impl IntoIterator<Item = (String, Location)>,
    ) -> usize {
        let mut table = self.table(kind).write();
        table.remove_file(file_id);

        let mut inserted = 0;
        for (name, location) in pairs {
            debug_assert_eq!(location.file_id, file_id);
            table.insert(file_id, name, location);
            inserted += 1;
        }
        inserted
    }

    /// Drop every location of `file_id` for `kind`. Returns how many were removed.
    pub fn remove_file(&self, file_id: FileId, kind: SymbolKind) -> usize {
        self.table(kind).write().remove_file(file_id)
    }

    /// All definitions of `name`, in scan order. Empty when unknown.
    pub fn lookup(&self, kind: SymbolKind, name: &str) -> Vec<Location> {
        self.table(kind)
            .read()
            .by_name
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `name` currently has an entry at all
    pub fn contains(&self, kind: SymbolKind, name: &str) -> bool {
        self.table(kind).read().by_name.contains_key(name)
    }

    /// Names defined for `kind`, sorted
    pub fn names(&self, kind: SymbolKind) -> Vec<String> {
        let mut names: Vec<String> = self.table(kind).read().by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of distinct names for `kind`
    pub fn len(&self, kind: SymbolKind) -> usize {
        self.table(kind).read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        SymbolKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    pub fn clear(&self) {
        for kind in SymbolKind::ALL {
            *self.table(kind).write() = SymbolTable::default();
        }
    }
}
