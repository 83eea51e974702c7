//! Metadata parsing
//!
//! Turns an object root of platform metadata documents into a normalized
//! `SchemaDocument`. Relationship edges are extracted while fields are read.
//!
//! Failure handling is layered: a missing or unreadable root is a
//! `ParseError`; a bad document below it becomes a placeholder plus a
//! diagnostic in the caller's `RunReport`.

mod errors;
mod field;
mod object;
mod record;
pub mod relationships;
pub mod xml;

pub use errors::{ParseError, ParseResult};
pub use field::parse_field;
pub use object::{
    name_from_file, MetadataParser, FIELD_SUFFIX, OBJECT_SUFFIX, RECORD_TYPE_SUFFIX,
    VALIDATION_RULE_SUFFIX,
};
pub use record::{parse_record_type, parse_validation_rule};
pub use xml::{Element, XmlError};

use std::path::{Path, PathBuf};

/// Conventional object root locations, checked in order.
pub const OBJECT_ROOT_CANDIDATES: [&str; 3] =
    ["force-app/main/default/objects", "src/objects", "objects"];

/// First conventional object root that exists under `base`.
pub fn detect_objects_path(base: &Path) -> ParseResult<PathBuf> {
    OBJECT_ROOT_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.is_dir())
        .ok_or_else(|| ParseError::NotDetected {
            searched: OBJECT_ROOT_CANDIDATES.join(", "),
        })
}
