//! Statistics of an indexing run

use crate::SymbolKind;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Most errors kept for reporting; later ones are only counted
const MAX_REPORTED_ERRORS: usize = 100;

/// Statistics collected during indexing
#[derive(Debug, Default, Serialize)]
pub struct IndexStats {
    /// Number of files whose definitions were (re)placed in the index
    pub files_indexed: usize,

    /// Number of files that could not be read
    pub files_failed: usize,

    /// Tree identifiers found
    pub trees_found: usize,

    /// Node classes found
    pub nodes_found: usize,

    /// Time elapsed during indexing
    pub elapsed: Duration,

    /// Errors encountered (limited to the first 100)
    pub errors: Vec<(PathBuf, String)>,

    #[serde(skip)]
    start_time: Option<Instant>,
}

impl IndexStats {
    /// Create new stats and start timing
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Stop timing and record elapsed time
    pub fn stop_timing(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed = start.elapsed();
        }
    }

    /// Count a successfully indexed file and its definitions
    pub fn record_file(&mut self, kind: SymbolKind, definitions: usize) {
        self.files_indexed += 1;
        match kind {
            SymbolKind::Tree => self.trees_found += definitions,
            SymbolKind::Node => self.nodes_found += definitions,
        }
    }

    /// Add an error (limited to the first 100 errors)
    pub fn add_error(&mut self, path: PathBuf, error: String) {
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push((path, error));
        }
        self.files_failed += 1;
    }

    pub fn symbols_found(&self) -> usize {
        self.trees_found + self.nodes_found
    }

    /// Display the statistics in a human-readable format
    pub fn display(&self) {
        println!("\nIndexing Complete:");
        println!("  Files indexed: {}", self.files_indexed);
        println!("  Files failed: {}", self.files_failed);
        println!("  Trees found: {}", self.trees_found);
        println!("  Nodes found: {}", self.nodes_found);
        println!("  Time elapsed: {:.2}s", self.elapsed.as_secs_f64());

        if self.files_indexed > 0 && !self.elapsed.is_zero() {
            let files_per_sec = self.files_indexed as f64 / self.elapsed.as_secs_f64();
            println!("  Performance: {files_per_sec:.0} files/second");
        }

        if !self.errors.is_empty() {
            println!("\nErrors (showing first {}):", self.errors.len().min(5));
            for (path, error) in self.errors.iter().take(5) {
                println!("  {}: {}", path.display(), error);
            }
            if self.errors.len() > 5 {
                println!("  ... and {} more errors", self.errors.len() - 5);
            }
        }
    }
}
