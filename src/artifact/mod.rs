//! Artifact files: YAML/JSON encoding, checksums and generation timestamps
//!
//! Every file the pipeline produces goes through this module so encoding,
//! fsync and checksum rules stay identical across stages.

mod checksum;
mod errors;
mod io;

pub use checksum::{compute_checksum, compute_file_checksum, format_checksum};
pub use errors::{ArtifactError, ArtifactResult};
pub use io::{read_json, read_yaml, remove_stale, write_json, write_text, write_yaml};

use chrono::{SecondsFormat, Utc};

/// Timestamp stamped into generated artifacts.
///
/// A fixed value makes regeneration byte-identical; otherwise the current UTC
/// time in RFC3339 with second precision.
pub fn generation_timestamp(fixed: Option<&str>) -> String {
    match fixed {
        Some(ts) => ts.to_string(),
        None => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}
