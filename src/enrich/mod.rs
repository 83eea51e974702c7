//! Enrichment: merges live field attributes into a partitioned layout
//!
//! The live system is reached through `DescribeSource`; `SfCliSource` is the
//! production implementation. Picklists are replaced with active values,
//! formulas are replaced, and every other attribute is only filled in where
//! the layout has none.

mod cli_source;
pub mod describe;
mod enricher;
mod errors;
pub mod merge;
mod org;
mod stats;

pub use cli_source::{parse_envelope, resolve_executable, SfCliSource, DEFAULT_DESCRIBE_TIMEOUT};
pub use describe::{
    extract_active_picklist_values, DescribeSource, FieldDescribe, ObjectDescribe, PicklistEntry,
};
pub use enricher::Enricher;
pub use errors::{EnrichError, EnrichResult};
pub use merge::{merge_object, MergeOutcome, ACTIVE_PICKLIST_NOTE};
pub use org::resolve_org;
pub use stats::EnrichmentStats;
