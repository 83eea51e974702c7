//! Configuration file (`sfschema.json`)
//!
//! Every key is optional. A missing file means all defaults; a present but
//! invalid file is a configuration error.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::categorize::CategoryRules;
use crate::observability::Severity;
use crate::retrieval::RetrievalFilter;

use super::args::PathArgs;
use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Object metadata root; auto-detected when absent
    pub objects_path: Option<PathBuf>,

    /// Normalized schema document
    pub schema_file: PathBuf,

    /// Partitioned layout root
    pub output_dir: PathBuf,

    /// Target org alias for enrichment
    pub org_alias: Option<String>,

    /// Explicit path to the sf executable
    pub sf_executable: Option<PathBuf>,

    /// Per-object describe timeout
    pub describe_timeout_secs: u64,

    /// RFC3339 timestamp used instead of the current time
    pub fixed_timestamp: Option<String>,

    pub log_level: String,

    pub categories: CategoryRules,

    pub retrieval: RetrievalFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            objects_path: None,
            schema_file: PathBuf::from("config/salesforce-er-schema.yaml"),
            output_dir: PathBuf::from("config/schema"),
            org_alias: None,
            sf_executable: None,
            describe_timeout_secs: 60,
            fixed_timestamp: None,
            log_level: "info".to_string(),
            categories: CategoryRules::default(),
            retrieval: RetrievalFilter::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or defaults when it does not exist
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.describe_timeout_secs == 0 {
            return Err(CliError::config_error("describe_timeout_secs must be > 0"));
        }

        if self.schema_file.as_os_str().is_empty() {
            return Err(CliError::config_error("schema_file must not be empty"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("output_dir must not be empty"));
        }

        self.severity()?;

        if let Some(ts) = &self.fixed_timestamp {
            DateTime::parse_from_rfc3339(ts).map_err(|e| {
                CliError::config_error(format!("Invalid fixed_timestamp '{}': {}", ts, e))
            })?;
        }

        self.categories
            .validate()
            .map_err(|e| CliError::config_error(format!("Invalid categories: {}", e)))?;

        if self.retrieval.excluded_suffixes.iter().any(String::is_empty) {
            return Err(CliError::config_error(
                "retrieval.excluded_suffixes must not contain empty entries",
            ));
        }

        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        Severity::from_str(&self.log_level).map_err(|_| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            ))
        })
    }

    /// Applies command-line path overrides.
    pub fn apply_paths(&mut self, paths: &PathArgs) {
        if let Some(p) = &paths.objects_path {
            self.objects_path = Some(p.clone());
        }
        if let Some(p) = &paths.schema_file {
            self.schema_file = p.clone();
        }
        if let Some(p) = &paths.output_dir {
            self.output_dir = p.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(&temp_dir.path().join("sfschema.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.describe_timeout_secs, 60);
        assert_eq!(config.output_dir, PathBuf::from("config/schema"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sfschema.json");
        fs::write(
            &path,
            r#"{"output_dir":"out","categories":{"fallback":"misc"},"log_level":"warn"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.categories.fallback, "misc");
        assert_eq!(config.categories.custom_category, "custom");
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_rejects_bad_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sfschema.json");

        for content in [
            r#"{"describe_timeout_secs":0}"#,
            r#"{"log_level":"loud"}"#,
            r#"{"fixed_timestamp":"yesterday"}"#,
            r#"{"categories":{"fallback":"../x"}}"#,
            "{not json",
        ] {
            fs::write(&path, content).unwrap();
            let err = Config::load(&path).unwrap_err();
            assert_eq!(err.code_str(), "SFS_CLI_CONFIG_ERROR", "{}", content);
        }
    }

    #[test]
    fn test_path_overrides() {
        let mut config = Config::default();
        config.apply_paths(&PathArgs {
            objects_path: Some(PathBuf::from("src/objects")),
            schema_file: None,
            output_dir: Some(PathBuf::from("out")),
        });
        assert_eq!(config.objects_path, Some(PathBuf::from("src/objects")));
        assert_eq!(config.schema_file, PathBuf::from("config/salesforce-er-schema.yaml"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }
}
