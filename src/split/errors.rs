//! Splitter errors
//!
//! A failed object partition is not an error here; it is recorded in the
//! run report and the next object is attempted. These variants cover the
//! layout-wide artifacts only.
//!
//! Error codes:
//! - SFS_SPLIT_LAYOUT_ROOT (fatal)
//! - SFS_SPLIT_ARTIFACT (fatal)

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::artifact::ArtifactError;

pub type SplitResult<T> = Result<T, SplitError>;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Could not create layout directory {path}: {source}")]
    LayoutRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write layout artifact: {0}")]
    Artifact(#[from] ArtifactError),
}

impl SplitError {
    pub fn layout_root(path: &Path, source: io::Error) -> Self {
        SplitError::LayoutRoot {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SplitError::LayoutRoot { .. } => "SFS_SPLIT_LAYOUT_ROOT",
            SplitError::Artifact(_) => "SFS_SPLIT_ARTIFACT",
        }
    }

    pub fn is_fatal(&self) -> bool {
        true
    }
}
