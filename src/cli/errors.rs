//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code after one JSON
//! error response. `cause` carries the subsystem error code when there is one.

use std::fmt;
use std::io;

use serde_json::Value;

use crate::artifact::ArtifactError;
use crate::enrich::EnrichError;
use crate::parser::ParseError;
use crate::split::SplitError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or flag error
    ConfigError,
    /// I/O error (stdout, input files)
    IoError,
    /// Object metadata could not be parsed at all
    ParseFailed,
    /// Layout could not be written
    SplitFailed,
    /// Enrichment could not run
    EnrichFailed,
    /// Reading or writing an artifact failed
    ArtifactError,
    /// Verification found damaged partitions
    LayoutDamaged,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SFS_CLI_CONFIG_ERROR",
            Self::IoError => "SFS_CLI_IO_ERROR",
            Self::ParseFailed => "SFS_CLI_PARSE_FAILED",
            Self::SplitFailed => "SFS_CLI_SPLIT_FAILED",
            Self::EnrichFailed => "SFS_CLI_ENRICH_FAILED",
            Self::ArtifactError => "SFS_CLI_ARTIFACT_ERROR",
            Self::LayoutDamaged => "SFS_CLI_LAYOUT_DAMAGED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    cause: Option<&'static str>,
    message: String,
    details: Option<Value>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            cause: None,
            message: message.into(),
            details: None,
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Damaged layout, with the verification report attached
    pub fn layout_damaged(msg: impl Into<String>, report: Value) -> Self {
        Self::new(CliErrorCode::LayoutDamaged, msg).with_details(report)
    }

    pub fn with_cause(mut self, cause: &'static str) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Subsystem error code, if any
    pub fn cause(&self) -> Option<&'static str> {
        self.cause
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause {
            Some(cause) => write!(f, "{} ({}): {}", self.code.code(), cause, self.message),
            None => write!(f, "{}: {}", self.code.code(), self.message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        Self::new(CliErrorCode::ParseFailed, e.to_string()).with_cause(e.code())
    }
}

impl From<SplitError> for CliError {
    fn from(e: SplitError) -> Self {
        Self::new(CliErrorCode::SplitFailed, e.to_string()).with_cause(e.code())
    }
}

impl From<EnrichError> for CliError {
    fn from(e: EnrichError) -> Self {
        let code = match e {
            EnrichError::Configuration { .. } | EnrichError::InvalidObjectName { .. } => {
                CliErrorCode::ConfigError
            }
            _ => CliErrorCode::EnrichFailed,
        };
        Self::new(code, e.to_string()).with_cause(e.code())
    }
}

impl From<ArtifactError> for CliError {
    fn from(e: ArtifactError) -> Self {
        Self::new(CliErrorCode::ArtifactError, e.to_string()).with_cause(e.code())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
