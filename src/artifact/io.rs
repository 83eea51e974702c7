//! YAML/JSON artifact reading and writing
//!
//! Every write is synchronous: create, write, fsync. The returned value is the
//! CRC32 of the bytes written so callers can record it without re-reading.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::checksum::compute_checksum;
use super::errors::{ArtifactError, ArtifactResult};

/// Writes `# ` prefixed header lines, a blank line, then the YAML body.
pub fn write_yaml<T: Serialize>(path: &Path, header: &[String], value: &T) -> ArtifactResult<u32> {
    let body = serde_yaml::to_string(value).map_err(|e| ArtifactError::encode(path, e))?;

    let mut content = String::with_capacity(body.len() + 256);
    for line in header {
        content.push_str("# ");
        content.push_str(line);
        content.push('\n');
    }
    if !header.is_empty() {
        content.push_str("#\n\n");
    }
    content.push_str(&body);

    write_text(path, &content)
}

/// Pretty-printed JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ArtifactResult<u32> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| ArtifactError::encode(path, e))?;
    content.push('\n');
    write_text(path, &content)
}

/// Writes raw text, creating parent directories as needed.
pub fn write_text(path: &Path, content: &str) -> ArtifactResult<u32> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
        }
    }

    let mut file = File::create(path).map_err(|e| ArtifactError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ArtifactError::io(path, e))?;
    file.sync_all().map_err(|e| ArtifactError::io(path, e))?;

    Ok(compute_checksum(content.as_bytes()))
}

/// Reads a YAML artifact. Header comments are ignored by the YAML parser.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    let content = fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| ArtifactError::decode(path, e))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    let content = fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::decode(path, e))
}

/// Removes a file left over from an earlier run. Absent files are fine.
pub fn remove_stale(path: &Path) -> ArtifactResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ArtifactError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_header_and_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("picklists.yaml");

        let mut value = BTreeMap::new();
        value.insert("Status".to_string(), vec!["Open".to_string(), "Closed".to_string()]);

        write_yaml(&path, &["Picklist Values for Case".to_string()], &value).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("# Picklist Values for Case\n#\n\n"));

        let back: BTreeMap<String, Vec<String>> = read_yaml(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_write_returns_content_checksum() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");

        let checksum = write_text(&path, "hello").unwrap();
        assert_eq!(checksum, compute_checksum(b"hello"));
    }

    #[test]
    fn test_decode_error_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yaml");
        fs::write(&path, "object: [unclosed").unwrap();

        let err = read_yaml::<serde_yaml::Value>(&path).unwrap_err();
        assert_eq!(err.code(), "SFS_ARTIFACT_DECODE");
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_remove_stale_absent_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("formulas.yaml");
        assert!(!remove_stale(&path).unwrap());

        fs::write(&path, "x").unwrap();
        assert!(remove_stale(&path).unwrap());
        assert!(!path.exists());
    }
}
