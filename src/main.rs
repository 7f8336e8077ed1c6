//! CLI entry point for the BehaviorTree definition index.
//!
//! Builds the in-memory index for a workspace, then answers one query or keeps
//! the index live while watching the file system.

use anyhow::{Context, Result};
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use treesense::indexing::FileWalker;
use treesense::io::{ExitCode, OutputFormat, OutputManager};
use treesense::{FileSystemWatcher, Settings, SymbolKind, Workspace};

/// Capacity of the watcher → indexer loop channel
const WATCH_CHANNEL_CAPACITY: usize = 1024;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Definition index for BehaviorTree XML and C++ node classes
#[derive(Parser)]
#[command(
    name = "treesense",
    version = env!("CARGO_PKG_VERSION"),
    about = "Definition index for BehaviorTree XML and C++ node classes",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Set up .treesense directory with default configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// Index a workspace and report what was found
    Index {
        /// Workspace directory (defaults to the configured root)
        path: Option<PathBuf>,

        /// Number of concurrent file reads (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,

        /// List the files that would be indexed without reading them
        #[arg(long)]
        dry_run: bool,
    },

    /// Find where a tree (or, with --node, a node class) is defined
    Find {
        name: String,

        /// Look up a C++ node class instead of a tree ID
        #[arg(long)]
        node: bool,
    },

    /// Print the structural outline of a tree defined in FILE
    Outline { file: PathBuf, id: String },

    /// Show the documentation comment of a node class
    Doc { name: String },

    /// List the trees of a markup file with their spans and child tags
    Symbols { file: PathBuf },

    /// Complete a tree ID (or, with --node, a node class) from a prefix
    Complete {
        #[arg(default_value = "")]
        prefix: String,

        #[arg(long)]
        node: bool,
    },

    /// Resolve what sits under a zero-based line and column of a markup file
    Hover { file: PathBuf, line: u32, column: u32 },

    /// Keep the index live and log every re-index until Ctrl+C
    Watch {
        /// Workspace directory (defaults to the configured root)
        path: Option<PathBuf>,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug { "treesense=debug" } else { "treesense=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => Settings::load_from(path).map_err(|e| {
            anyhow::anyhow!("Configuration error loading from {}: {e}", path.display())
        }),
        None => Ok(Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration.");
            Settings::default()
        })),
    }
}

async fn indexed_workspace(settings: Settings, path: Option<&Path>) -> Result<Workspace> {
    let settings = Arc::new(settings);
    let workspace = match path {
        Some(root) => Workspace::new(settings, root)?,
        None => Workspace::from_settings(settings)?,
    };
    let stats = workspace.index_workspace().await;
    for (path, error) in &stats.errors {
        tracing::warn!("{}: {error}", path.display());
    }
    Ok(workspace)
}

fn node_kind(node: bool) -> SymbolKind {
    if node { SymbolKind::Node } else { SymbolKind::Tree }
}

#[tokio::main]
async fn main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli)?;
    init_tracing(settings.debug);

    let format = OutputFormat::from_json_flag(cli.json);
    let mut output = OutputManager::new(format);

    let code = match cli.command {
        Commands::Init { force } => {
            let root = std::env::current_dir().context("cannot read current directory")?;
            match Settings::init_config_file(&root, force) {
                Ok(path) => {
                    output.info(&format!("Created configuration file at: {}", path.display()))?;
                    output.info("Edit this file to customize your settings.")?;
                    ExitCode::Success
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::ConfigError
                }
            }
        }

        Commands::Config => {
            if format.is_json() {
                output.success(serde_json::to_value(&settings)?)?
            } else {
                println!("Current Configuration:");
                println!("{}", "=".repeat(50));
                println!("{}", toml::to_string_pretty(&settings)?);
                ExitCode::Success
            }
        }

        Commands::Index {
            path,
            threads,
            dry_run,
        } => {
            if let Some(threads) = threads {
                settings.indexing.parallel_threads = threads;
            }
            let settings = Arc::new(settings);
            let workspace = match path {
                Some(root) => Workspace::new(Arc::clone(&settings), root)?,
                None => Workspace::from_settings(Arc::clone(&settings))?,
            };

            if dry_run {
                let files = FileWalker::new(settings).walk_all(workspace.root());
                output.info(&format!("{} file(s) would be indexed", files.len()))?;
                output.collection(
                    files
                        .iter()
                        .map(|(path, kind)| format!("{kind}\t{}", path.display())),
                    "File",
                    "any",
                )?
            } else {
                let stats = workspace.index_workspace().await;
                if format.is_json() {
                    output.success(serde_json::to_value(&stats)?)?
                } else {
                    stats.display();
                    ExitCode::Success
                }
            }
        }

        Commands::Find { name, node } => {
            let workspace = indexed_workspace(settings, None).await?;
            output.collection(workspace.definitions(node_kind(node), &name), "Definition", &name)?
        }

        Commands::Outline { file, id } => {
            let workspace = Workspace::from_settings(Arc::new(settings))?;
            match workspace.outline(&file, &id).await {
                Ok(outline) => output.item(outline, "Tree", &id)?,
                Err(e) => output.error(&e)?,
            }
        }

        Commands::Doc { name } => {
            let workspace = indexed_workspace(settings, None).await?;
            output.item(workspace.node_documentation(&name).await, "Node", &name)?
        }

        Commands::Symbols { file } => {
            let workspace = Workspace::from_settings(Arc::new(settings))?;
            match workspace.entities_in_file(&file).await {
                Ok(symbols) => output.collection(symbols, "Tree", &file.display().to_string())?,
                Err(e) => output.error(&e)?,
            }
        }

        Commands::Complete { prefix, node } => {
            let workspace = indexed_workspace(settings, None).await?;
            output.collection(workspace.completions(node_kind(node), &prefix), "Completion", &prefix)?
        }

        Commands::Hover { file, line, column } => {
            let workspace = indexed_workspace(settings, None).await?;
            let hover = workspace.hover_in_file(&file, line, column).await;
            output.item(hover, "Hover target", &format!("{}:{line}:{column}", file.display()))?
        }

        Commands::Watch { path } => {
            if !settings.file_watch.enabled {
                eprintln!("File watching is disabled (file_watch.enabled = false)");
                return Ok(ExitCode::ConfigError.into());
            }
            let workspace = indexed_workspace(settings, path.as_deref()).await?;
            watch(workspace).await?;
            ExitCode::Success
        }
    };

    Ok(code.into())
}

async fn watch(workspace: Workspace) -> Result<()> {
    let (sender, events) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    let watcher = FileSystemWatcher::start(
        workspace.root(),
        workspace.settings().indexing.clone(),
        sender,
    )?;

    let indexer = tokio::spawn(workspace.clone().run(events));
    eprintln!("Watching {}. Press Ctrl+C to stop.", watcher.root().display());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    // Dropping the watcher closes the channel and ends the indexer loop
    drop(watcher);
    indexer.await.context("indexer loop panicked")?;
    Ok(())
}
