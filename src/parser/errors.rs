//! Parser errors
//!
//! Only run-level failures are errors. Everything below the object root
//! degrades to placeholders and diagnostics instead.
//!
//! Error codes:
//! - SFS_PARSE_MISSING_ROOT (fatal)
//! - SFS_PARSE_NOT_A_DIRECTORY (fatal)
//! - SFS_PARSE_IO (fatal)
//! - SFS_PARSE_NOT_DETECTED (fatal)

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Objects path does not exist: {path}")]
    MissingObjectRoot { path: PathBuf },

    #[error("Objects path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Could not read objects directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No objects directory found; looked in {searched}")]
    NotDetected { searched: String },
}

impl ParseError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        ParseError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseError::MissingObjectRoot { .. } => "SFS_PARSE_MISSING_ROOT",
            ParseError::NotADirectory { .. } => "SFS_PARSE_NOT_A_DIRECTORY",
            ParseError::Io { .. } => "SFS_PARSE_IO",
            ParseError::NotDetected { .. } => "SFS_PARSE_NOT_DETECTED",
        }
    }

    /// Every parser error aborts the run before output is produced.
    pub fn is_fatal(&self) -> bool {
        true
    }
}
