//! Process-scoped owner of the definition index
//!
//! The [`Workspace`] performs the initial parallel scan and then serialises
//! every later mutation through a single indexer loop fed by [`WatchEvent`]s.

use crate::config::Settings;
use crate::indexing::{DebounceScheduler, DefinitionScanner, FileWalker, IndexStats};
use crate::parsing::ReferenceMatcher;
use crate::storage::{FileRegistry, IndexStore};
use crate::{IndexError, IndexResult, SymbolKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Buffer of the loop's internal command channel
const COMMAND_BUFFER: usize = 256;

/// File lifecycle notification consumed by [`Workspace::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created(PathBuf),
    Changed(PathBuf),
    Deleted(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Created(path) | WatchEvent::Changed(path) | WatchEvent::Deleted(path) => path,
        }
    }
}

/// Work item of the indexer loop
#[derive(Debug)]
enum Command {
    /// A debounce timer expired for this path
    Reindex(PathBuf),
}

/// Owns the index and everything needed to keep it current.
///
/// Cloning is cheap; clones share the same store, registry and timers.
#[derive(Clone)]
pub struct Workspace {
    pub(crate) settings: Arc<Settings>,
    pub(crate) root: PathBuf,
    pub(crate) store: IndexStore,
    pub(crate) registry: FileRegistry,
    pub(crate) scanner: DefinitionScanner,
    pub(crate) references: ReferenceMatcher,
    scheduler: DebounceScheduler<PathBuf>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("root", &self.root)
            .field("files", &self.registry.len())
            .field("trees", &self.store.len(SymbolKind::Tree))
            .field("nodes", &self.store.len(SymbolKind::Node))
            .finish()
    }
}

impl Workspace {
    /// Create an empty workspace rooted at `root`
    pub fn new(settings: Arc<Settings>, root: impl Into<PathBuf>) -> IndexResult<Self> {
        let root = root.into();
        let root = std::fs::canonicalize(&root).unwrap_or(root);

        Ok(Self {
            scanner: DefinitionScanner::from_settings(&settings)?,
            references: ReferenceMatcher::new(&settings.markup)?,
            store: IndexStore::new(),
            registry: FileRegistry::new(),
            scheduler: DebounceScheduler::new(),
            settings,
            root,
        })
    }

    /// Root from the settings, falling back to the current directory
    pub fn from_settings(settings: Arc<Settings>) -> IndexResult<Self> {
        let root = match settings.workspace_root.clone() {
            Some(root) => root,
            None => std::env::current_dir().map_err(|e| IndexError::ConfigError {
                reason: format!("cannot determine workspace root: {e}"),
            })?,
        };
        Self::new(settings, root)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Whether a debounced re-index is waiting for `path`
    pub fn is_pending(&self, path: &Path) -> bool {
        self.scheduler.is_pending(&path.to_path_buf())
    }

    /// Scan every markup and native file under the root.
    ///
    /// One task per file; reads are bounded by `indexing.parallel_threads`.
    /// Returns once every file has been applied to the store.
    pub async fn index_workspace(&self) -> IndexStats {
        let mut stats = IndexStats::new();
        let walker = FileWalker::new(Arc::clone(&self.settings));
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || walker.walk_all(&root))
            .await
            .unwrap_or_else(|e| {
                warn!("workspace walk failed: {e}");
                Vec::new()
            });
        info!("Scanning {} file(s) under {}", files.len(), self.root.display());

        let permits = Arc::new(Semaphore::new(self.settings.indexing.parallel_threads.max(1)));
        let mut tasks = JoinSet::new();
        for (path, kind) in files {
            let workspace = self.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result = workspace.index_file(&path, kind).await;
                (path, kind, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, kind, Ok(found))) => stats.record_file(kind, found),
                Ok((path, _, Err(e))) => stats.add_error(path, e.to_string()),
                Err(e) => warn!("indexing task failed: {e}"),
            }
        }

        stats.stop_timing();
        info!(
            "Initial index complete: {} tree ID(s), {} node class(es)",
            self.store.len(SymbolKind::Tree),
            self.store.len(SymbolKind::Node)
        );
        stats
    }

    /// Read `path` and replace its definitions of `kind`.
    ///
    /// A read failure still clears the file's previous definitions before the
    /// error is returned.
    pub async fn index_file(&self, path: &Path, kind: SymbolKind) -> IndexResult<usize> {
        let file_id = self.registry.get_or_insert(path)?;

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(source) => {
                let dropped = self.store.remove_file(file_id, kind);
                warn!(
                    "Error indexing {}: {source} ({dropped} stale definition(s) dropped)",
                    path.display()
                );
                return Err(IndexError::FileRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let definitions = self.scanner.locate(file_id, kind, &text);
        for (name, location) in &definitions {
            debug!("Indexed {kind} \"{name}\" at {}:{}", path.display(), location.line + 1);
        }
        Ok(self.store.replace(file_id, kind, definitions))
    }

    /// Re-index a path of any kind; files of no indexed kind are ignored
    pub async fn reindex(&self, path: &Path) -> IndexResult<usize> {
        match self.settings.indexing.kind_for_path(path) {
            Some(kind) => self.index_file(path, kind).await,
            None => {
                debug!("Ignoring unindexed file {}", path.display());
                Ok(0)
            }
        }
    }

    /// Cancel any pending re-index of `path` and drop all its definitions
    pub fn remove_file(&self, path: &Path) -> usize {
        let path_buf = path.to_path_buf();
        if self.scheduler.cancel(&path_buf) {
            debug!("Cancelled pending re-index of {}", path.display());
        }

        let Some(file_id) = self.registry.id_of(path) else {
            return 0;
        };
        let removed: usize = SymbolKind::ALL
            .into_iter()
            .map(|kind| self.store.remove_file(file_id, kind))
            .sum();
        info!("Removed {} from index ({removed} definition(s))", path.display());
        removed
    }

    /// Consume lifecycle events until `events` closes.
    ///
    /// Created and Changed are debounced per path; the re-index itself runs on
    /// this loop. Deleted cancels the pending re-index then removes the file.
    pub async fn run(self, mut events: mpsc::Receiver<WatchEvent>) {
        let (commands_tx, mut commands) = mpsc::channel(COMMAND_BUFFER);
        let delay = self.settings.file_watch.debounce();
        info!("Indexer loop started (debounce {}ms)", delay.as_millis());

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event, delay, &commands_tx);
                }
                Some(command) = commands.recv() => match command {
                    Command::Reindex(path) => {
                        match self.reindex(&path).await {
                            Ok(count) => info!("Re-indexed {} ({count} definition(s))", path.display()),
                            Err(e) => warn!("Re-index failed: {e}"),
                        }
                    }
                },
            }
        }

        self.scheduler.cancel_all();
        info!("Indexer loop stopped");
    }

    fn handle_event(&self, event: WatchEvent, delay: std::time::Duration, commands: &mpsc::Sender<Command>) {
        debug!("Watch event: {event:?}");
        match event {
            WatchEvent::Created(path) | WatchEvent::Changed(path) => {
                if self.settings.indexing.kind_for_path(&path).is_none() {
                    return;
                }
                let commands = commands.clone();
                let key = path.clone();
                self.scheduler.schedule(key, delay, async move {
                    // Loop gone means shutdown; nothing left to index into
                    let _ = commands.send(Command::Reindex(path)).await;
                });
            }
            WatchEvent::Deleted(path) => {
                self.remove_file(&path);
            }
        }
    }
}
