//! In-memory storage for the definition index
//!
//! The index is rebuilt from the workspace at startup and lives only for the
//! process lifetime.

pub mod memory;
pub mod registry;

pub use memory::IndexStore;
pub use registry::FileRegistry;
