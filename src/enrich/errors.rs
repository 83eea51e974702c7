//! Enrichment errors
//!
//! Per-object variants are recorded as skips and the run moves on. Fatal
//! variants stop the run before, or instead of, the next object.
//!
//! Error codes:
//! - SFS_ENRICH_CONFIGURATION (fatal)
//! - SFS_ENRICH_EXECUTABLE_NOT_FOUND (fatal)
//! - SFS_ENRICH_SPAWN (fatal)
//! - SFS_ENRICH_LAYOUT_MISSING (fatal)
//! - SFS_ENRICH_SCHEMA_MISSING
//! - SFS_ENRICH_TIMEOUT
//! - SFS_ENRICH_REMOTE
//! - SFS_ENRICH_MALFORMED_RESPONSE
//! - SFS_ENRICH_ARTIFACT

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::report::DiagnosticKind;

pub type EnrichResult<T> = Result<T, EnrichError>;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Salesforce CLI executable not found; looked in {searched}")]
    ExecutableNotFound { searched: String },

    #[error("Could not start {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid object name '{name}': must be a plain folder name")]
    InvalidObjectName { name: String },

    #[error("Layout objects directory does not exist: {path}")]
    LayoutMissing { path: PathBuf },

    #[error("Schema file not found for {object}: {path}")]
    SchemaMissing { object: String, path: PathBuf },

    #[error("Describe of {object} timed out after {seconds} seconds")]
    Timeout { object: String, seconds: u64 },

    #[error("Describe of {object} failed: {message}")]
    Remote { object: String, message: String },

    #[error("Malformed describe response for {object}: {message}")]
    MalformedResponse { object: String, message: String },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl EnrichError {
    pub fn configuration(message: impl Into<String>) -> Self {
        EnrichError::Configuration {
            message: message.into(),
        }
    }

    pub fn remote(object: &str, message: impl Into<String>) -> Self {
        EnrichError::Remote {
            object: object.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(object: &str, message: impl ToString) -> Self {
        EnrichError::MalformedResponse {
            object: object.to_string(),
            message: message.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EnrichError::Configuration { .. } => "SFS_ENRICH_CONFIGURATION",
            EnrichError::ExecutableNotFound { .. } => "SFS_ENRICH_EXECUTABLE_NOT_FOUND",
            EnrichError::Spawn { .. } => "SFS_ENRICH_SPAWN",
            EnrichError::InvalidObjectName { .. } => "SFS_ENRICH_INVALID_OBJECT_NAME",
            EnrichError::LayoutMissing { .. } => "SFS_ENRICH_LAYOUT_MISSING",
            EnrichError::SchemaMissing { .. } => "SFS_ENRICH_SCHEMA_MISSING",
            EnrichError::Timeout { .. } => "SFS_ENRICH_TIMEOUT",
            EnrichError::Remote { .. } => "SFS_ENRICH_REMOTE",
            EnrichError::MalformedResponse { .. } => "SFS_ENRICH_MALFORMED_RESPONSE",
            EnrichError::Artifact(_) => "SFS_ENRICH_ARTIFACT",
        }
    }

    /// Fatal errors mean no further object can succeed either.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EnrichError::Configuration { .. }
                | EnrichError::ExecutableNotFound { .. }
                | EnrichError::Spawn { .. }
                | EnrichError::InvalidObjectName { .. }
                | EnrichError::LayoutMissing { .. }
        )
    }

    /// Diagnostic kind used when the error is recorded as a skip.
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            EnrichError::SchemaMissing { .. } => DiagnosticKind::SchemaMissing,
            EnrichError::Artifact(_) => DiagnosticKind::Io,
            _ => DiagnosticKind::ExternalFetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(EnrichError::configuration("no org").is_fatal());
        assert!(!EnrichError::Timeout {
            object: "Account".into(),
            seconds: 60
        }
        .is_fatal());
        assert!(!EnrichError::remote("Account", "INVALID_TYPE").is_fatal());
    }

    #[test]
    fn test_codes_and_kinds() {
        let err = EnrichError::malformed("Case", "expected value");
        assert_eq!(err.code(), "SFS_ENRICH_MALFORMED_RESPONSE");
        assert_eq!(err.diagnostic_kind(), DiagnosticKind::ExternalFetch);

        let err = EnrichError::SchemaMissing {
            object: "Case".into(),
            path: PathBuf::from("objects/Case/schema.yaml"),
        };
        assert_eq!(err.diagnostic_kind(), DiagnosticKind::SchemaMissing);
    }
}
