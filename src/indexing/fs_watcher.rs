//! File system watcher feeding the indexer loop
//!
//! Translates `notify` events under the workspace root into [`WatchEvent`]s.
//! Only files of an indexed kind are forwarded; debouncing happens in the
//! indexer loop, not here.

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::IndexingConfig;
use crate::indexing::WatchEvent;
use crate::{IndexError, IndexResult};

/// Keeps a recursive watch on the workspace root alive
pub struct FileSystemWatcher {
    /// The actual file watcher (kept alive by storing it)
    _watcher: notify::RecommendedWatcher,
    root: PathBuf,
}

impl std::fmt::Debug for FileSystemWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemWatcher")
            .field("root", &self.root)
            .finish()
    }
}

impl FileSystemWatcher {
    /// Start watching `root` recursively, sending events to `sender`.
    ///
    /// Events stop when the returned watcher is dropped.
    pub fn start(
        root: &Path,
        indexing: IndexingConfig,
        sender: mpsc::Sender<WatchEvent>,
    ) -> IndexResult<Self> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for translated in translate(&event, &indexing) {
                        // We use blocking_send because this callback is sync
                        if sender.blocking_send(translated).is_err() {
                            debug!("indexer loop closed, dropping watch event");
                            return;
                        }
                    }
                }
                Err(e) => warn!("File watch error: {e}"),
            }
        })
        .map_err(|e| IndexError::Watch {
            reason: format!("failed to create file watcher: {e}"),
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| IndexError::Watch {
                reason: format!("cannot watch {}: {e}", root.display()),
            })?;
        debug!("Watching {}", root.display());

        Ok(Self {
            _watcher: watcher,
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Lifecycle events for the indexed files touched by a `notify` event
pub fn translate(event: &Event, indexing: &IndexingConfig) -> Vec<WatchEvent> {
    let indexed = |path: &Path| indexing.kind_for_path(path).is_some() && !is_hidden(path);

    let events: Vec<WatchEvent> = match &event.kind {
        EventKind::Create(_) => event.paths.iter().cloned().map(WatchEvent::Created).collect(),
        EventKind::Remove(_) => event.paths.iter().cloned().map(WatchEvent::Deleted).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.iter().cloned().map(WatchEvent::Deleted).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().cloned().map(WatchEvent::Created).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to] => vec![WatchEvent::Deleted(from.clone()), WatchEvent::Created(to.clone())],
            _ => Vec::new(),
        },
        EventKind::Modify(_) => event.paths.iter().cloned().map(WatchEvent::Changed).collect(),
        _ => Vec::new(),
    };

    events
        .into_iter()
        .filter(|e| indexed(e.path()))
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
