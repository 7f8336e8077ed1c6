pub mod debounce;
pub mod fs_watcher;
pub mod line_index;
pub mod progress;
pub mod scanner;
pub mod walker;
pub mod workspace;

pub use debounce::{DEFAULT_DEBOUNCE, DebounceScheduler};
pub use fs_watcher::FileSystemWatcher;
pub use line_index::LineIndex;
pub use progress::IndexStats;
pub use scanner::DefinitionScanner;
pub use walker::FileWalker;
pub use workspace::{WatchEvent, Workspace};
