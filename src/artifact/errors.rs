//! Artifact I/O errors
//!
//! Error codes:
//! - SFS_ARTIFACT_IO
//! - SFS_ARTIFACT_ENCODE
//! - SFS_ARTIFACT_DECODE

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for artifact operations
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Failure reading or writing one artifact file
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl ArtifactError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn encode(path: &Path, message: impl ToString) -> Self {
        ArtifactError::Encode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn decode(path: &Path, message: impl ToString) -> Self {
        ArtifactError::Decode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ArtifactError::Io { .. } => "SFS_ARTIFACT_IO",
            ArtifactError::Encode { .. } => "SFS_ARTIFACT_ENCODE",
            ArtifactError::Decode { .. } => "SFS_ARTIFACT_DECODE",
        }
    }

    /// Path of the artifact involved
    pub fn path(&self) -> &Path {
        match self {
            ArtifactError::Io { path, .. }
            | ArtifactError::Encode { path, .. }
            | ArtifactError::Decode { path, .. } => path,
        }
    }

    /// True when the file simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
