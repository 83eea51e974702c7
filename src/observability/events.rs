//! Pipeline lifecycle events
//!
//! Every stage announces itself with one of these. Stage scopes use the
//! stage names below with `_BEGIN` / `_COMPLETE` / `_FAILED` appended.

use std::fmt;

use super::logger::Severity;

/// Observable events of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,
    ObjectsPathResolved,

    // Parsing
    ObjectParsed,
    DocumentWritten,

    // Partitioning
    PartitionWritten,
    PartitionFailed,
    StalePayloadRemoved,
    IndexWritten,
    CategoryBundleWritten,
    GuideWritten,
    ManifestWritten,

    // Enrichment
    OrgResolved,
    DescribeFetched,
    ObjectEnriched,
    ObjectSkipped,

    // Verification
    PartitionVerified,
    PartitionCorrupt,

    /// A run could not start at all
    RunAborted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ObjectsPathResolved => "OBJECTS_PATH_RESOLVED",

            Event::ObjectParsed => "OBJECT_PARSED",
            Event::DocumentWritten => "SCHEMA_DOCUMENT_WRITTEN",

            Event::PartitionWritten => "PARTITION_WRITTEN",
            Event::PartitionFailed => "PARTITION_FAILED",
            Event::StalePayloadRemoved => "STALE_PAYLOAD_REMOVED",
            Event::IndexWritten => "INDEX_WRITTEN",
            Event::CategoryBundleWritten => "CATEGORY_BUNDLE_WRITTEN",
            Event::GuideWritten => "GUIDE_WRITTEN",
            Event::ManifestWritten => "MANIFEST_WRITTEN",

            Event::OrgResolved => "ORG_RESOLVED",
            Event::DescribeFetched => "DESCRIBE_FETCHED",
            Event::ObjectEnriched => "OBJECT_ENRICHED",
            Event::ObjectSkipped => "OBJECT_SKIPPED",

            Event::PartitionVerified => "PARTITION_VERIFIED",
            Event::PartitionCorrupt => "PARTITION_CORRUPT",

            Event::RunAborted => "RUN_ABORTED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::RunAborted)
    }

    /// Level the event is logged at. Lost or damaged partitions are errors.
    pub fn severity(&self) -> Severity {
        match self {
            Event::RunAborted => Severity::Fatal,
            Event::PartitionFailed | Event::ObjectSkipped | Event::PartitionCorrupt => {
                Severity::Error
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stage names used by `ObservationScope`
pub mod stage {
    pub const PARSE: &str = "PARSE";
    pub const SPLIT: &str = "SPLIT";
    pub const INDEX: &str = "INDEX";
    pub const CATEGORIZE: &str = "CATEGORIZE";
    pub const ENRICH: &str = "ENRICH";
    pub const VERIFY: &str = "VERIFY";
}
