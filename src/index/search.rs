//! Search index: every field of every object, without bulk payloads
//!
//! Picklist values and formula text are never copied here, only a flag that
//! they exist in the partition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{FieldDefinition, ObjectDefinition, ObjectType};
use crate::split::layout::{folder_ref, PartitionFiles};

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub search_index: SearchIndexBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexBody {
    pub metadata: SearchIndexMetadata,
    pub objects: BTreeMap<String, SearchObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexMetadata {
    pub generated_date: String,
    pub description: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchObject {
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub label: String,
    pub folder: String,
    pub files: PartitionFiles,
    pub fields: Vec<SearchField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_picklist_values: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_formula: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl From<&FieldDefinition> for SearchField {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            name: field.api_name.clone(),
            field_type: field.type_name().to_string(),
            required: field.required,
            has_picklist_values: field.has_picklist_values(),
            has_formula: field.has_formula(),
            reference_to: field.reference_to.clone(),
            length: field.length,
        }
    }
}

impl From<&ObjectDefinition> for SearchObject {
    fn from(object: &ObjectDefinition) -> Self {
        Self {
            object_type: object.object_type,
            label: object.label.clone(),
            folder: folder_ref(&object.api_name),
            files: PartitionFiles::for_object(
                &object.api_name,
                object.has_picklists(),
                object.has_formulas(),
            ),
            fields: object.fields.iter().map(SearchField::from).collect(),
        }
    }
}

pub(super) fn metadata(generated_date: &str) -> SearchIndexMetadata {
    SearchIndexMetadata {
        generated_date: generated_date.to_string(),
        description: "Lightweight index for searching objects and fields".to_string(),
        usage: "Use this to quickly find objects and their key fields. For picklist values, see objects/<ObjectName>/picklists.yaml"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_flags_without_payloads() {
        let mut field = FieldDefinition::new("Status__c");
        field.field_type = Some("Picklist".into());
        field.picklist_values = Some(vec!["Open".into()]);
        field.length = Some(255);

        let entry = SearchField::from(&field);
        assert!(entry.has_picklist_values);
        assert!(!entry.has_formula);

        let yaml = serde_yaml::to_string(&entry).unwrap();
        assert!(yaml.contains("has_picklist_values: true"));
        assert!(!yaml.contains("has_formula"));
        assert!(!yaml.contains("Open"));
        assert!(yaml.contains("required: false"));
    }
}
