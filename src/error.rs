//! Error types for the definition index
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for indexing and query operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Parsing errors
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to create file ID: maximum file count reached")]
    FileIdExhausted,

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    /// File watching errors
    #[error("File watcher failed: {reason}")]
    Watch { reason: String },
}

impl IndexError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::FileIdExhausted => "FILE_ID_EXHAUSTED",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::Watch { .. } => "WATCH_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::Parse { .. } => vec![
                "Fix the malformed markup and run the query again",
                "Outlines and entity listings stay unavailable until the file parses",
            ],
            Self::ConfigError { .. } => vec![
                "Run 'treesense config' to inspect the effective settings",
                "Run 'treesense init --force' to regenerate .treesense/settings.toml",
            ],
            Self::Watch { .. } => vec![
                "Check file system permissions on the workspace root",
                "Raise the inotify watch limit if the workspace is very large",
            ],
            _ => vec![],
        }
    }
}

/// Errors produced while turning markup text into a [`ParsedNode`] tree
///
/// [`ParsedNode`]: crate::parsing::ParsedNode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to initialize {language} parser: {reason}")]
    ParserInit { language: String, reason: String },

    #[error("Failed to parse markup at line {line}, column {column}: {reason}")]
    Syntax {
        line: u32,
        column: u32,
        reason: String,
    },

    #[error("Closing tag </{found}> at line {line} does not match <{expected}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: u32,
    },

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Element nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;
