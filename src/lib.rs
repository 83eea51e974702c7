//! sfschema - Salesforce object metadata normalizer
//!
//! Pipeline:
//! 1. `parser` reads one directory per object into a `SchemaDocument`
//! 2. `categorize`, `index` and `split` derive the partitioned layout
//! 3. `enrich` later merges live field attributes into that layout
//!
//! Every stage is single-threaded and deterministic. Tolerated failures are
//! collected in a `report::RunReport` instead of aborting the run.

pub mod artifact;
pub mod categorize;
pub mod cli;
pub mod enrich;
pub mod index;
pub mod model;
pub mod observability;
pub mod parser;
pub mod report;
pub mod retrieval;
pub mod split;
