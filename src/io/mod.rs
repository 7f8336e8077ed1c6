//! Input/Output handling for the CLI.
//!
//! Unified text/JSON output and exit codes.

pub mod exit_code;
pub mod format;
pub mod output;

pub use exit_code::ExitCode;
pub use format::{JsonResponse, OutputFormat};
pub use output::OutputManager;
