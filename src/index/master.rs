//! Master index: one entry per object, sorted by API name

use serde::{Deserialize, Serialize};

use crate::model::{ObjectDefinition, ObjectType};
use crate::split::layout::{folder_ref, PartitionFiles, CATEGORIES_DIR, OBJECTS_DIR};

/// Number of fields previewed per entry
pub const SAMPLE_FIELD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIndex {
    pub schema_index: MasterIndexBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIndexBody {
    pub metadata: MasterIndexMetadata,
    pub objects: Vec<MasterIndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIndexMetadata {
    pub generated_date: String,
    pub total_objects: usize,
    pub source_file: String,
    pub objects_directory: String,
    pub categories_directory: String,
    pub structure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIndexEntry {
    pub api_name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub category: String,
    pub folder: String,
    pub files: PartitionFiles,
    pub field_count: usize,
    pub has_picklists: bool,
    pub has_formulas: bool,
    pub has_record_types: bool,
    pub has_validation_rules: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_fields: Option<Vec<String>>,
}

impl MasterIndexEntry {
    pub fn for_object(object: &ObjectDefinition, category: &str) -> Self {
        let has_picklists = object.has_picklists();
        let has_formulas = object.has_formulas();

        Self {
            api_name: object.api_name.clone(),
            label: object.label.clone(),
            object_type: object.object_type,
            category: category.to_string(),
            folder: folder_ref(&object.api_name),
            files: PartitionFiles::for_object(&object.api_name, has_picklists, has_formulas),
            field_count: object.fields.len(),
            has_picklists,
            has_formulas,
            has_record_types: !object.record_types.is_empty(),
            has_validation_rules: !object.validation_rules.is_empty(),
            sample_fields: sample_fields(object),
        }
    }
}

/// `"name (type)"` for the first fields that have both; `None` when empty.
fn sample_fields(object: &ObjectDefinition) -> Option<Vec<String>> {
    let samples: Vec<String> = object
        .fields
        .iter()
        .take(SAMPLE_FIELD_LIMIT)
        .filter(|f| !f.api_name.is_empty() && !f.type_name().is_empty())
        .map(|f| format!("{} ({})", f.api_name, f.type_name()))
        .collect();

    if samples.is_empty() {
        None
    } else {
        Some(samples)
    }
}

pub(super) fn metadata(generated_date: &str, source_file: &str, total_objects: usize) -> MasterIndexMetadata {
    MasterIndexMetadata {
        generated_date: generated_date.to_string(),
        total_objects,
        source_file: source_file.to_string(),
        objects_directory: format!("{}/", OBJECTS_DIR),
        categories_directory: format!("{}/", CATEGORIES_DIR),
        structure: "Each object has a folder with schema.yaml, picklists.yaml (optional), formulas.yaml (optional)"
            .to_string(),
    }
}
