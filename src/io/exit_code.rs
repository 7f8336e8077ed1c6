//! Exit codes for CLI operations following Unix conventions.
//!
//! - `0`: Success
//! - `1`: General error
//! - `2`: Blocking error, automation should halt
//! - `3-125`: Specific recoverable errors

use crate::error::IndexError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// Query ran but nothing matched (code 3)
    NotFound = 3,

    /// Markup could not be parsed (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    /// Map an `IndexError` to the exit code scripts can act on
    pub fn from_error(error: &IndexError) -> Self {
        match error {
            IndexError::Parse { .. } => ExitCode::ParseError,
            IndexError::FileRead { .. } => ExitCode::IoError,
            IndexError::ConfigError { .. } => ExitCode::ConfigError,
            IndexError::FileIdExhausted => ExitCode::BlockingError,
            IndexError::Watch { .. } => ExitCode::GeneralError,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Stable upper-case name used in JSON responses
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::BlockingError => "BLOCKING_ERROR",
            ExitCode::NotFound => "NOT_FOUND",
            ExitCode::ParseError => "PARSE_ERROR",
            ExitCode::IoError => "IO_ERROR",
            ExitCode::ConfigError => "CONFIG_ERROR",
        }
    }
}
