//! Partitioned layout
//!
//! Each object is written as up to three disjoint payloads (core schema,
//! picklists, formulas) in its own folder. `_manifest.json` maps every API
//! name to its partition descriptor; partitions never reference each other.

mod bundle;
mod errors;
mod guide;
pub mod layout;
pub mod manifest;
pub mod partition;
mod writer;

pub use bundle::{CategoryBundle, CategoryMetadata};
pub use errors::{SplitError, SplitResult};
pub use guide::{render as render_guide, GuideContext};
pub use layout::{Layout, PartitionFiles};
pub use manifest::{
    LayoutManifest, PartitionDescriptor, VerifyProblem, VerifyProblemKind, VerifyReport,
    MANIFEST_FORMAT_VERSION,
};
pub use partition::{
    reconstruct_field, CoreField, CoreObject, FormulaPayload, Partition, PartitionContext,
    PicklistPayload, SchemaPayload,
};
pub use writer::{SplitSummary, Splitter};
