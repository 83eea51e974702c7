//! Target org resolution
//!
//! Order: explicit alias, `.sf/config.json` `target-org`, then
//! `.sfdx/sfdx-config.json` `defaultusername`, all relative to the project
//! directory.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{EnrichError, EnrichResult};

const SF_CONFIG: &str = ".sf/config.json";
const SF_CONFIG_KEY: &str = "target-org";
const SFDX_CONFIG: &str = ".sfdx/sfdx-config.json";
const SFDX_CONFIG_KEY: &str = "defaultusername";

pub fn resolve_org(project_dir: &Path, explicit: Option<&str>) -> EnrichResult<String> {
    if let Some(alias) = explicit.map(str::trim).filter(|a| !a.is_empty()) {
        log_event_with_fields(Event::OrgResolved, &[("org", alias), ("source", "explicit")]);
        return Ok(alias.to_string());
    }

    for (file, key) in [(SF_CONFIG, SF_CONFIG_KEY), (SFDX_CONFIG, SFDX_CONFIG_KEY)] {
        if let Some(alias) = read_key(&project_dir.join(file), key) {
            log_event_with_fields(Event::OrgResolved, &[("org", alias.as_str()), ("source", file)]);
            return Ok(alias);
        }
    }

    Err(EnrichError::configuration(format!(
        "no target org: pass --org or set one with `sf config set target-org <alias>` ({} and {} had none)",
        SF_CONFIG, SFDX_CONFIG
    )))
}

/// Non-empty string value of `key`, if the file exists and parses.
fn read_key(path: &Path, key: &str) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let value: Value = serde_json::from_str(&content).ok()?;
    value
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        let path = dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_explicit_wins() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), SF_CONFIG, r#"{"target-org":"from-file"}"#);
        assert_eq!(resolve_org(temp_dir.path(), Some("dev")).unwrap(), "dev");
    }

    #[test]
    fn test_sf_config_before_sfdx() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), SF_CONFIG, r#"{"target-org":"sf-org"}"#);
        write(temp_dir.path(), SFDX_CONFIG, r#"{"defaultusername":"sfdx-org"}"#);
        assert_eq!(resolve_org(temp_dir.path(), None).unwrap(), "sf-org");
    }

    #[test]
    fn test_sfdx_fallback() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), SF_CONFIG, "not json");
        write(temp_dir.path(), SFDX_CONFIG, r#"{"defaultusername":"sfdx-org"}"#);
        assert_eq!(resolve_org(temp_dir.path(), None).unwrap(), "sfdx-org");
    }

    #[test]
    fn test_nothing_configured_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = resolve_org(temp_dir.path(), Some("  ")).unwrap_err();
        assert_eq!(err.code(), "SFS_ENRICH_CONFIGURATION");
        assert!(err.is_fatal());
    }
}
