//! One object split into core schema, picklist and formula payloads
//!
//! The three payloads are disjoint: picklist values and formula text live
//! only in their sibling payload, and the core field carries a note pointing
//! there instead. `reconstruct_field` is the inverse.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::{self, ArtifactResult};
use crate::model::{
    FieldDefinition, ObjectDefinition, ObjectType, RecordType, RelationshipEdge, SchemaDocument,
    ValidationRule,
};

use super::layout::{file_ref, FORMULAS_FILE, PICKLISTS_FILE};

/// Field record in the core schema payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreField {
    #[serde(flatten)]
    pub field: FieldDefinition,
    #[serde(rename = "_picklist_note", default, skip_serializing_if = "Option::is_none")]
    pub picklist_note: Option<String>,
    #[serde(rename = "_formula_note", default, skip_serializing_if = "Option::is_none")]
    pub formula_note: Option<String>,
}

impl CoreField {
    /// Strips payload values from `field`, leaving notes where it did.
    pub fn strip(object: &str, field: &FieldDefinition) -> Self {
        let mut core = field.clone();
        let picklist_note = if field.has_picklist_values() {
            core.picklist_values = None;
            Some(picklist_note(object))
        } else {
            None
        };
        let formula_note = if field.has_formula() {
            core.formula = None;
            Some(formula_note(object))
        } else {
            None
        };

        Self {
            field: core,
            picklist_note,
            formula_note,
        }
    }

    pub fn api_name(&self) -> &str {
        &self.field.api_name
    }

    /// Brings the notes in line with the sibling payloads.
    pub fn annotate(&mut self, object: &str, has_picklist: bool, has_formula: bool) {
        self.picklist_note = has_picklist.then(|| picklist_note(object));
        self.formula_note = has_formula.then(|| formula_note(object));
    }
}

pub fn picklist_note(object: &str) -> String {
    format!("Picklist values available in {}", file_ref(object, PICKLISTS_FILE))
}

pub fn formula_note(object: &str) -> String {
    format!("Formula definition available in {}", file_ref(object, FORMULAS_FILE))
}

/// Object record in the core schema payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreObject {
    pub api_name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<CoreField>,
    #[serde(default)]
    pub record_types: Vec<RecordType>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPayloadMetadata {
    pub split_from: String,
    pub generated_date: String,
    pub original_schema_date: String,
    pub has_picklists: bool,
    pub has_formulas: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enriched_date: Option<String>,
}

/// `objects/<Name>/schema.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPayload {
    pub object: CoreObject,
    #[serde(default)]
    pub related_relationships: Vec<RelationshipEdge>,
    pub metadata: SchemaPayloadMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistMetadata {
    pub object: String,
    pub generated_date: String,
    pub picklist_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// `objects/<Name>/picklists.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistPayload {
    pub picklists: BTreeMap<String, Vec<String>>,
    pub metadata: PicklistMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaMetadata {
    pub object: String,
    pub generated_date: String,
    pub formula_count: usize,
}

/// `objects/<Name>/formulas.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaPayload {
    pub formulas: BTreeMap<String, String>,
    pub metadata: FormulaMetadata,
}

/// Provenance stamped into every payload of a run
#[derive(Debug, Clone)]
pub struct PartitionContext {
    /// Normalized document the layout was split from
    pub split_from: String,
    pub generated_date: String,
    pub original_schema_date: String,
}

/// All payloads of one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub schema: SchemaPayload,
    pub picklists: Option<PicklistPayload>,
    pub formulas: Option<FormulaPayload>,
}

impl Partition {
    /// Splits one object of `document`.
    pub fn of(object: &ObjectDefinition, document: &SchemaDocument, ctx: &PartitionContext) -> Self {
        let name = object.api_name.as_str();

        let mut picklists = BTreeMap::new();
        let mut formulas = BTreeMap::new();
        let mut fields = Vec::with_capacity(object.fields.len());

        for field in &object.fields {
            if let Some(values) = field.picklist_values.as_ref().filter(|v| !v.is_empty()) {
                picklists.insert(field.api_name.clone(), values.clone());
            }
            if let Some(formula) = field.formula.as_ref().filter(|f| !f.is_empty()) {
                formulas.insert(field.api_name.clone(), formula.clone());
            }
            fields.push(CoreField::strip(name, field));
        }

        let schema = SchemaPayload {
            object: CoreObject {
                api_name: object.api_name.clone(),
                object_type: object.object_type,
                label: object.label.clone(),
                description: object.description.clone(),
                fields,
                record_types: object.record_types.clone(),
                validation_rules: object.validation_rules.clone(),
            },
            related_relationships: document
                .relationships_for(name)
                .into_iter()
                .cloned()
                .collect(),
            metadata: SchemaPayloadMetadata {
                split_from: ctx.split_from.clone(),
                generated_date: ctx.generated_date.clone(),
                original_schema_date: ctx.original_schema_date.clone(),
                has_picklists: !picklists.is_empty(),
                has_formulas: !formulas.is_empty(),
                enriched_date: None,
            },
        };

        Self {
            schema,
            picklists: PicklistPayload::from_map(name, picklists, &ctx.generated_date, None),
            formulas: FormulaPayload::from_map(name, formulas, &ctx.generated_date),
        }
    }

    pub fn api_name(&self) -> &str {
        &self.schema.object.api_name
    }
}

impl PicklistPayload {
    /// `None` for an empty map: no payload file is written then.
    pub fn from_map(
        object: &str,
        picklists: BTreeMap<String, Vec<String>>,
        generated_date: &str,
        note: Option<String>,
    ) -> Option<Self> {
        if picklists.is_empty() {
            return None;
        }
        Some(Self {
            metadata: PicklistMetadata {
                object: object.to_string(),
                generated_date: generated_date.to_string(),
                picklist_count: picklists.len(),
                note,
            },
            picklists,
        })
    }
}

impl FormulaPayload {
    pub fn from_map(
        object: &str,
        formulas: BTreeMap<String, String>,
        generated_date: &str,
    ) -> Option<Self> {
        if formulas.is_empty() {
            return None;
        }
        Some(Self {
            metadata: FormulaMetadata {
                object: object.to_string(),
                generated_date: generated_date.to_string(),
                formula_count: formulas.len(),
            },
            formulas,
        })
    }
}

impl SchemaPayload {
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            format!("Salesforce Object Schema: {}", self.object.api_name),
            format!("Generated: {}", self.metadata.generated_date),
            format!("Type: {}", self.object.object_type.as_str()),
            format!("Fields: {}", self.object.fields.len()),
        ];
        if let Some(enriched) = &self.metadata.enriched_date {
            header.push(format!("Enriched: {}", enriched));
        }
        header
    }

    pub fn write(&self, path: &Path) -> ArtifactResult<u32> {
        artifact::write_yaml(path, &self.header(), self)
    }
}

impl PicklistPayload {
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            format!("Picklist Values for {}", self.metadata.object),
            format!("Generated: {}", self.metadata.generated_date),
            format!("Total Picklist Fields: {}", self.metadata.picklist_count),
        ];
        if self.metadata.note.is_some() {
            header.push("IMPORTANT: Only ACTIVE picklist values are shown.".to_string());
        }
        header
    }

    pub fn write(&self, path: &Path) -> ArtifactResult<u32> {
        artifact::write_yaml(path, &self.header(), self)
    }
}

impl FormulaPayload {
    pub fn header(&self) -> Vec<String> {
        vec![
            format!("Formula Definitions for {}", self.metadata.object),
            format!("Generated: {}", self.metadata.generated_date),
            format!("Total Formula Fields: {}", self.metadata.formula_count),
        ]
    }

    pub fn write(&self, path: &Path) -> ArtifactResult<u32> {
        artifact::write_yaml(path, &self.header(), self)
    }
}

/// Rebuilds the full field from its core record and the sibling payloads.
pub fn reconstruct_field(
    core: &CoreField,
    picklists: Option<&PicklistPayload>,
    formulas: Option<&FormulaPayload>,
) -> FieldDefinition {
    let mut field = core.field.clone();
    if let Some(values) = picklists.and_then(|p| p.picklists.get(core.api_name())) {
        field.picklist_values = Some(values.clone());
    }
    if let Some(formula) = formulas.and_then(|f| f.formulas.get(core.api_name())) {
        field.formula = Some(formula.clone());
    }
    field
}
