//! Normalized schema model
//!
//! `SchemaDocument` is the single in-memory representation every later stage
//! consumes. It serializes to the normalized YAML document with the top-level
//! sections `metadata`, `objects` and `relationships`.

mod types;

pub use types::{
    DocumentMetadata, FieldDefinition, ObjectDefinition, ObjectType, RecordType,
    RelationshipEdge, RelationshipType, SchemaDocument, ValidationRule, PICKLIST_TYPES,
    REFERENCE_TYPES,
};

use std::path::Path;

use crate::artifact::{self, ArtifactResult};

/// Writes the normalized document with its descriptive header.
pub fn write_document(document: &SchemaDocument, path: &Path) -> ArtifactResult<u32> {
    let header = vec![
        "Salesforce Entity-Relationship Schema".to_string(),
        format!("Generated: {}", document.metadata.generated_date),
        format!("Objects: {}", document.metadata.total_objects),
        format!("Relationships: {}", document.relationships.len()),
    ];
    artifact::write_yaml(path, &header, document)
}

/// Reads a normalized document written by `write_document`.
pub fn read_document(path: &Path) -> ArtifactResult<SchemaDocument> {
    artifact::read_yaml(path)
}
