//! Layout manifest: `api_name → partition descriptor`
//!
//! Format:
//! ```json
//! {
//!   "format_version": 1,
//!   "generated_date": "2024-05-01T00:00:00Z",
//!   "source": "config/salesforce-er-schema.yaml",
//!   "partitions": {
//!     "Account": {
//!       "folder": "objects/Account/",
//!       "files": { "schema": "objects/Account/schema.yaml" },
//!       "checksums": { "objects/Account/schema.yaml": "crc32:deadbeef" }
//!     }
//!   }
//! }
//! ```
//!
//! Partitions are independent entries; nothing in the manifest links one
//! object to another. `verify` recomputes checksums to find partitions an
//! interrupted run left half-written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifact::{self, compute_file_checksum, format_checksum, ArtifactResult};

use super::layout::{Layout, PartitionFiles};

pub const MANIFEST_FORMAT_VERSION: u8 = 1;

/// One object's partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    pub folder: String,
    pub files: PartitionFiles,
    /// file reference → `crc32:xxxxxxxx`
    pub checksums: BTreeMap<String, String>,
}

impl PartitionDescriptor {
    pub fn new(folder: String, files: PartitionFiles) -> Self {
        Self {
            folder,
            files,
            checksums: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, file_ref: &str, checksum: u32) {
        self.checksums
            .insert(file_ref.to_string(), format_checksum(checksum));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutManifest {
    pub format_version: u8,
    pub generated_date: String,
    pub source: String,
    pub partitions: BTreeMap<String, PartitionDescriptor>,
}

impl LayoutManifest {
    pub fn new(generated_date: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            format_version: MANIFEST_FORMAT_VERSION,
            generated_date: generated_date.into(),
            source: source.into(),
            partitions: BTreeMap::new(),
        }
    }

    pub fn load(layout: &Layout) -> ArtifactResult<Self> {
        artifact::read_json(&layout.manifest_path())
    }

    /// Previous manifest if there is a readable one.
    pub fn load_existing(layout: &Layout) -> Option<Self> {
        Self::load(layout).ok()
    }

    pub fn write(&self, layout: &Layout) -> ArtifactResult<u32> {
        artifact::write_json(&layout.manifest_path(), self)
    }

    /// Recomputes every recorded checksum.
    pub fn verify(&self, layout: &Layout) -> VerifyReport {
        let mut report = VerifyReport::default();

        for (object, descriptor) in &self.partitions {
            let mut intact = true;
            for (file_ref, expected) in &descriptor.checksums {
                let path = layout.resolve(file_ref);
                match compute_file_checksum(&path) {
                    Ok(actual) => {
                        let actual = format_checksum(actual);
                        if &actual != expected {
                            intact = false;
                            report.problems.push(VerifyProblem {
                                object: object.clone(),
                                file: file_ref.clone(),
                                kind: VerifyProblemKind::ChecksumMismatch {
                                    expected: expected.clone(),
                                    actual,
                                },
                            });
                        }
                    }
                    Err(e) => {
                        intact = false;
                        let kind = if e.is_not_found() {
                            VerifyProblemKind::Missing
                        } else {
                            VerifyProblemKind::Unreadable {
                                message: e.to_string(),
                            }
                        };
                        report.problems.push(VerifyProblem {
                            object: object.clone(),
                            file: file_ref.clone(),
                            kind,
                        });
                    }
                }
            }

            report.checked += 1;
            if intact {
                report.intact += 1;
            }
        }

        report
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Partitions examined
    pub checked: usize,
    /// Partitions whose every file matched
    pub intact: usize,
    pub problems: Vec<VerifyProblem>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Objects with at least one problem, without repeats.
    pub fn damaged_objects(&self) -> Vec<&str> {
        let mut objects: Vec<&str> = self.problems.iter().map(|p| p.object.as_str()).collect();
        objects.dedup();
        objects
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyProblem {
    pub object: String,
    pub file: String,
    #[serde(flatten)]
    pub kind: VerifyProblemKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum VerifyProblemKind {
    Missing,
    ChecksumMismatch { expected: String, actual: String },
    Unreadable { message: String },
}
