//! Configuration module for the definition index.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.treesense/settings.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `TS_` and use double underscores
//! to separate nested levels:
//! - `TS_FILE_WATCH__DEBOUNCE_MS=500` sets `file_watch.debounce_ms`
//! - `TS_MARKUP__ENTITY_TAG=Tree` sets `markup.entity_tag`
//! - `TS_DEBUG=true` sets `debug`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::SymbolKind;
use crate::indexing::DEFAULT_DEBOUNCE;

/// Name of the per-workspace configuration directory
pub const CONFIG_DIR: &str = ".treesense";

/// Custom ignore file honoured by the walker, gitignore syntax
pub const IGNORE_FILE: &str = ".treesenseignore";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .treesense is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Verbose logging of every indexing step
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Indexing configuration
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Markup entity recognition
    #[serde(default)]
    pub markup: MarkupConfig,

    /// Native declaration recognition
    #[serde(default)]
    pub native: NativeConfig,

    /// File watching settings
    #[serde(default)]
    pub file_watch: FileWatchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Maximum number of files read concurrently during the initial scan
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// Extensions of markup files holding tree definitions
    #[serde(default = "default_tree_extensions")]
    pub tree_extensions: Vec<String>,

    /// Extensions of native source files holding node classes
    #[serde(default = "default_node_extensions")]
    pub node_extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MarkupConfig {
    /// Element name of an indexed entity
    #[serde(default = "default_entity_tag")]
    pub entity_tag: String,

    /// Attribute carrying the entity's identifier
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,

    /// Attributes that reference an entity by name without defining it
    #[serde(default = "default_reference_attributes")]
    pub reference_attributes: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NativeConfig {
    /// Keyword introducing an indexed declaration
    #[serde(default = "default_declaration_keyword")]
    pub declaration_keyword: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileWatchConfig {
    /// Enable automatic re-indexing in watch mode
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Debounce interval in milliseconds (default: 200ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_tree_extensions() -> Vec<String> {
    vec!["xml".to_string()]
}
fn default_node_extensions() -> Vec<String> {
    vec!["cpp".to_string(), "h".to_string(), "hpp".to_string()]
}
fn default_entity_tag() -> String {
    "BehaviorTree".to_string()
}
fn default_id_attribute() -> String {
    "ID".to_string()
}
fn default_reference_attributes() -> Vec<String> {
    vec!["main_tree_to_execute".to_string()]
}
fn default_declaration_keyword() -> String {
    "class".to_string()
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            indexing: IndexingConfig::default(),
            markup: MarkupConfig::default(),
            native: NativeConfig::default(),
            file_watch: FileWatchConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            tree_extensions: default_tree_extensions(),
            node_extensions: default_node_extensions(),
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            entity_tag: default_entity_tag(),
            id_attribute: default_id_attribute(),
            reference_attributes: default_reference_attributes(),
        }
    }
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            declaration_keyword: default_declaration_keyword(),
        }
    }
}

impl Default for FileWatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl IndexingConfig {
    /// File extensions contributing to the given symbol kind
    pub fn extensions_for(&self, kind: SymbolKind) -> &[String] {
        match kind {
            SymbolKind::Tree => &self.tree_extensions,
            SymbolKind::Node => &self.node_extensions,
        }
    }

    /// Which index a file feeds, judged by its extension
    pub fn kind_for_path(&self, path: &Path) -> Option<SymbolKind> {
        let ext = path.extension()?.to_str()?;
        SymbolKind::ALL.into_iter().find(|kind| {
            self.extensions_for(*kind)
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
    }
}

impl FileWatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .treesense directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::figment(config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                // If workspace_root is not set in config, detect it
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with TS_ prefix
            // Double underscore (__) separates nested levels
            .merge(Env::prefixed("TS_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find the workspace config by looking for .treesense directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .treesense is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments under `root`
    pub fn init_config_file(root: &Path, force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.join(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# treesense configuration file

# Version of the configuration schema
version = 1

# Log every indexing step
debug = false

[indexing]
# Maximum number of files read concurrently during the initial scan
# parallel_threads = {}

# Markup files holding tree definitions
tree_extensions = ["xml"]

# Native sources holding node classes
node_extensions = ["cpp", "h", "hpp"]

[markup]
# Element that defines an entity and the attribute that names it
entity_tag = "BehaviorTree"
id_attribute = "ID"

# Attributes that only reference an entity by name
reference_attributes = ["main_tree_to_execute"]

[native]
# Keyword introducing an indexed declaration
declaration_keyword = "class"

[file_watch]
# Re-index files when they change in watch mode
enabled = true

# How long to wait after the last change before re-indexing
debounce_ms = 200
"#,
            num_cpus::get()
        );

        std::fs::write(&config_path, template)?;
        Self::create_default_ignore_file(root, force)?;

        Ok(config_path)
    }

    /// Create a default .treesenseignore file next to the config directory
    fn create_default_ignore_file(root: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
        let ignore_path = root.join(IGNORE_FILE);

        if !force && ignore_path.exists() {
            return Ok(());
        }

        let default_content = r#"# treesense ignore patterns (gitignore syntax)

# Build artifacts
build/
install/
log/
target/

# Generated files
*.generated.*

# Version control and editor state
.git/
.vscode/
.idea/
"#;

        std::fs::write(&ignore_path, default_content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert!(settings.indexing.parallel_threads > 0);
        assert_eq!(settings.markup.entity_tag, "BehaviorTree");
        assert_eq!(settings.markup.id_attribute, "ID");
        assert_eq!(settings.native.declaration_keyword, "class");
        assert_eq!(settings.file_watch.debounce_ms, 200);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
version = 2
debug = true

[indexing]
parallel_threads = 4
tree_extensions = ["xml", "btxml"]

[markup]
entity_tag = "Tree"

[file_watch]
debounce_ms = 50
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert!(settings.debug);
        assert_eq!(settings.indexing.parallel_threads, 4);
        assert_eq!(settings.indexing.tree_extensions, vec!["xml", "btxml"]);
        assert_eq!(settings.markup.entity_tag, "Tree");
        // Untouched keys of a partially specified table keep their defaults
        assert_eq!(settings.markup.id_attribute, "ID");
        assert_eq!(settings.file_watch.debounce(), Duration::from_millis(50));
    }

    #[test]
    fn test_save_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.indexing.parallel_threads = 2;
        settings.native.declaration_keyword = "struct".to_string();

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.indexing.parallel_threads, 2);
        assert_eq!(loaded.native.declaration_keyword, "struct");
    }

    #[test]
    fn test_init_config_file_round_trips() {
        let temp_dir = TempDir::new().unwrap();

        let path = Settings::init_config_file(temp_dir.path(), false).unwrap();
        assert!(path.exists());
        assert!(temp_dir.path().join(IGNORE_FILE).exists());

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.file_watch.debounce_ms, 200);
        assert_eq!(settings.markup.reference_attributes, vec!["main_tree_to_execute"]);

        // Second init without force refuses to overwrite
        assert!(Settings::init_config_file(temp_dir.path(), false).is_err());
        assert!(Settings::init_config_file(temp_dir.path(), true).is_ok());
    }

    #[test]
    fn test_kind_for_path() {
        let indexing = IndexingConfig::default();
        assert_eq!(
            indexing.kind_for_path(Path::new("trees/main.xml")),
            Some(SymbolKind::Tree)
        );
        assert_eq!(
            indexing.kind_for_path(Path::new("src/move_arm.HPP")),
            Some(SymbolKind::Node)
        );
        assert_eq!(indexing.kind_for_path(Path::new("README.md")), None);
        assert_eq!(indexing.kind_for_path(Path::new("Makefile")), None);
    }
}
