//! Normalized schema types
//!
//! Field order of every struct is the key order of the emitted YAML, so it is
//! part of the output format. Optional attributes are omitted when absent.

use serde::{Deserialize, Serialize};

/// Field types that carry an ordered option list.
pub const PICKLIST_TYPES: [&str; 2] = ["Picklist", "MultiselectPicklist"];

/// Field types that reference another object.
pub const REFERENCE_TYPES: [&str; 2] = ["Lookup", "MasterDetail"];

fn is_false(value: &bool) -> bool {
    !*value
}

/// Object kind, derived purely from the API name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Standard,
    Custom,
    CustomMetadata,
    PlatformEvent,
}

impl ObjectType {
    /// `__mdt` → CustomMetadata, `__e` → PlatformEvent, `__c` → Custom,
    /// anything else → Standard.
    pub fn from_api_name(api_name: &str) -> Self {
        if api_name.ends_with("__mdt") {
            ObjectType::CustomMetadata
        } else if api_name.ends_with("__e") {
            ObjectType::PlatformEvent
        } else if api_name.ends_with("__c") {
            ObjectType::Custom
        } else {
            ObjectType::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Standard => "Standard",
            ObjectType::Custom => "Custom",
            ObjectType::CustomMetadata => "CustomMetadata",
            ObjectType::PlatformEvent => "PlatformEvent",
        }
    }
}

/// Generation metadata of a normalized document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// RFC3339 generation timestamp
    pub generated_date: String,
    /// Object root the document was parsed from
    pub source_path: String,
    /// Number of objects in the document
    pub total_objects: usize,
}

/// Root of the normalized schema.
///
/// Built once per parse run. Derived artifacts are computed from it and never
/// written back into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub objects: Vec<ObjectDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipEdge>,
}

impl SchemaDocument {
    /// Looks up an object by API name.
    pub fn object(&self, api_name: &str) -> Option<&ObjectDefinition> {
        self.objects.iter().find(|o| o.api_name == api_name)
    }

    /// Edges where the object is either source or target, in document order.
    pub fn relationships_for(&self, api_name: &str) -> Vec<&RelationshipEdge> {
        self.relationships
            .iter()
            .filter(|r| r.from_object == api_name || r.to_object == api_name)
            .collect()
    }
}

/// One business object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    pub api_name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub record_types: Vec<RecordType>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

impl ObjectDefinition {
    /// Creates an empty object whose label defaults to its API name.
    pub fn new(api_name: impl Into<String>) -> Self {
        let api_name = api_name.into();
        Self {
            object_type: ObjectType::from_api_name(&api_name),
            label: api_name.clone(),
            api_name,
            description: None,
            fields: Vec::new(),
            record_types: Vec::new(),
            validation_rules: Vec::new(),
        }
    }

    pub fn field(&self, api_name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.api_name == api_name)
    }

    pub fn has_picklists(&self) -> bool {
        self.fields.iter().any(FieldDefinition::has_picklist_values)
    }

    pub fn has_formulas(&self) -> bool {
        self.fields.iter().any(FieldDefinition::has_formula)
    }
}

/// One typed attribute of an object.
///
/// `picklist_values` is only set for picklist types and `formula` only for
/// calculated fields. `controlling_field` and `is_dependent_picklist` are only
/// ever filled in by enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub external_id: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_constraint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picklist_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlling_field: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_dependent_picklist: bool,
    /// Set on placeholders for documents that could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl FieldDefinition {
    pub fn new(api_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            ..Self::default()
        }
    }

    /// Placeholder for a field document that failed to parse.
    pub fn placeholder(api_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            parse_error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn type_name(&self) -> &str {
        self.field_type.as_deref().unwrap_or("")
    }

    pub fn is_picklist_type(&self) -> bool {
        PICKLIST_TYPES.contains(&self.type_name())
    }

    pub fn is_reference_type(&self) -> bool {
        REFERENCE_TYPES.contains(&self.type_name())
    }

    pub fn has_picklist_values(&self) -> bool {
        self.picklist_values.as_ref().map_or(false, |v| !v.is_empty())
    }

    pub fn has_formula(&self) -> bool {
        self.formula.as_ref().map_or(false, |f| !f.is_empty())
    }

    pub fn is_placeholder(&self) -> bool {
        self.parse_error.is_some()
    }
}

/// Kind of a relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    Lookup,
    MasterDetail,
}

impl RelationshipType {
    pub fn from_field_type(field_type: &str) -> Option<Self> {
        match field_type {
            "Lookup" => Some(RelationshipType::Lookup),
            "MasterDetail" => Some(RelationshipType::MasterDetail),
            _ => None,
        }
    }
}

/// Directed reference from one object's field to another object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub from_object: String,
    pub from_field: String,
    pub to_object: String,
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub relationship_name: String,
    #[serde(default)]
    pub delete_constraint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_condition_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_display_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_from_suffix() {
        assert_eq!(ObjectType::from_api_name("Account"), ObjectType::Standard);
        assert_eq!(ObjectType::from_api_name("Invoice__c"), ObjectType::Custom);
        assert_eq!(ObjectType::from_api_name("Setting__mdt"), ObjectType::CustomMetadata);
        assert_eq!(ObjectType::from_api_name("Alert__e"), ObjectType::PlatformEvent);
        assert_eq!(ObjectType::from_api_name("HealthCloudGA__Plan__c"), ObjectType::Custom);
    }

    #[test]
    fn test_new_object_label_defaults_to_name() {
        let obj = ObjectDefinition::new("Case");
        assert_eq!(obj.label, "Case");
        assert_eq!(obj.object_type, ObjectType::Standard);
    }

    #[test]
    fn test_field_yaml_omits_absent_attributes() {
        let mut field = FieldDefinition::new("Name");
        field.field_type = Some("Text".into());
        field.length = Some(80);

        let yaml = serde_yaml::to_string(&field).unwrap();
        assert!(yaml.contains("api_name: Name"));
        assert!(yaml.contains("type: Text"));
        assert!(yaml.contains("length: 80"));
        assert!(!yaml.contains("required"));
        assert!(!yaml.contains("picklist_values"));
        assert!(!yaml.contains("parse_error"));
    }

    #[test]
    fn test_empty_picklist_is_not_a_picklist_payload() {
        let mut field = FieldDefinition::new("Status");
        field.field_type = Some("Picklist".into());
        field.picklist_values = Some(Vec::new());
        assert!(field.is_picklist_type());
        assert!(!field.has_picklist_values());
    }

    #[test]
    fn test_relationships_for_matches_both_ends() {
        let edge = RelationshipEdge {
            from_object: "Case".into(),
            from_field: "ContactId".into(),
            to_object: "Contact".into(),
            relationship_type: RelationshipType::Lookup,
            relationship_name: String::new(),
            delete_constraint: String::new(),
        };
        let doc = SchemaDocument {
            metadata: DocumentMetadata {
                generated_date: "2024-01-01T00:00:00Z".into(),
                source_path: "objects".into(),
                total_objects: 0,
            },
            objects: Vec::new(),
            relationships: vec![edge],
        };

        assert_eq!(doc.relationships_for("Case").len(), 1);
        assert_eq!(doc.relationships_for("Contact").len(), 1);
        assert!(doc.relationships_for("Account").is_empty());
    }
}
