//! Relationship edges derived from reference fields

use crate::model::{FieldDefinition, RelationshipEdge, RelationshipType};

/// One edge for a Lookup/MasterDetail field with a non-empty target, else none.
pub fn extract(object: &str, field: &FieldDefinition) -> Option<RelationshipEdge> {
    let relationship_type = RelationshipType::from_field_type(field.type_name())?;
    let to_object = field.reference_to.as_deref().filter(|t| !t.is_empty())?;

    Some(RelationshipEdge {
        from_object: object.to_string(),
        from_field: field.api_name.clone(),
        to_object: to_object.to_string(),
        relationship_type,
        relationship_name: field.relationship_name.clone().unwrap_or_default(),
        delete_constraint: field.delete_constraint.clone().unwrap_or_default(),
    })
}
