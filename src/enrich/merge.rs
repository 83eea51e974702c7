//! Merge of live describe data into one partition
//!
//! Pure: takes the current payloads and a describe result, returns the new
//! payloads plus counts. Rules per field present in both:
//!
//! - picklist type: the entry becomes the active values, or is dropped if
//!   none are active
//! - calculated with formula text: the formula entry is replaced
//! - everything else: filled only where the partition has no value yet
//!
//! Applying the same describe twice yields identical payloads apart from
//! the timestamps.

use std::collections::BTreeMap;

use crate::model::FieldDefinition;
use crate::split::{FormulaPayload, PicklistPayload, SchemaPayload};

use super::describe::{FieldDescribe, ObjectDescribe};

pub const ACTIVE_PICKLIST_NOTE: &str = "Only ACTIVE picklist values are included";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub schema: SchemaPayload,
    pub picklists: Option<PicklistPayload>,
    pub formulas: Option<FormulaPayload>,
    /// Picklist replacements, formula replacements and filled attributes
    pub fields_enriched: usize,
    pub picklists_added: usize,
    pub formulas_added: usize,
}

pub fn merge_object(
    schema: &SchemaPayload,
    picklists: Option<&PicklistPayload>,
    formulas: Option<&FormulaPayload>,
    describe: &ObjectDescribe,
    timestamp: &str,
) -> MergeOutcome {
    let object = schema.object.api_name.as_str();
    let mut schema = schema.clone();
    let mut picklist_map: BTreeMap<String, Vec<String>> =
        picklists.map(|p| p.picklists.clone()).unwrap_or_default();
    let mut formula_map: BTreeMap<String, String> =
        formulas.map(|f| f.formulas.clone()).unwrap_or_default();

    let mut fields_enriched = 0;
    let mut picklists_added = 0;
    let mut formulas_added = 0;

    for core in &mut schema.object.fields {
        let name = core.field.api_name.clone();
        let Some(live) = describe.field(&name) else {
            continue;
        };

        if live.is_picklist() {
            let values = live.active_picklist_values();
            if values.is_empty() {
                picklist_map.remove(&name);
            } else {
                picklist_map.insert(name.clone(), values);
                picklists_added += 1;
                fields_enriched += 1;
            }
        }

        if let Some(formula) = live.formula() {
            formula_map.insert(name.clone(), formula.to_string());
            formulas_added += 1;
            fields_enriched += 1;
        }

        fields_enriched += fill_missing(&mut core.field, live);
        core.annotate(
            object,
            picklist_map.contains_key(&name),
            formula_map.contains_key(&name),
        );
    }

    schema.metadata.has_picklists = !picklist_map.is_empty();
    schema.metadata.has_formulas = !formula_map.is_empty();
    schema.metadata.enriched_date = Some(timestamp.to_string());

    MergeOutcome {
        schema,
        picklists: PicklistPayload::from_map(
            object,
            picklist_map,
            timestamp,
            Some(ACTIVE_PICKLIST_NOTE.to_string()),
        ),
        formulas: FormulaPayload::from_map(object, formula_map, timestamp),
        fields_enriched,
        picklists_added,
        formulas_added,
    }
}

fn fill_text(slot: &mut Option<String>, value: Option<&str>) -> usize {
    match value {
        Some(v) if slot.as_deref().map_or(true, str::is_empty) => {
            *slot = Some(v.to_string());
            1
        }
        _ => 0,
    }
}

fn fill_number(slot: &mut Option<u32>, value: Option<u32>) -> usize {
    match value {
        Some(v) if slot.map_or(true, |n| n == 0) => {
            *slot = Some(v);
            1
        }
        _ => 0,
    }
}

fn fill_flag(slot: &mut bool, value: bool) -> usize {
    if value && !*slot {
        *slot = true;
        1
    } else {
        0
    }
}

/// Adopts live attributes the field lacks. Returns how many were filled.
fn fill_missing(field: &mut FieldDefinition, live: &FieldDescribe) -> usize {
    let default_value = live.default_value_text();

    fill_text(&mut field.default_value, default_value.as_deref())
        + fill_flag(&mut field.required, live.is_required())
        + fill_flag(&mut field.unique, live.is_unique())
        + fill_flag(&mut field.external_id, live.is_external_id())
        + fill_text(&mut field.reference_to, live.reference_target())
        + fill_text(&mut field.controlling_field, live.controlling_field())
        + fill_flag(&mut field.is_dependent_picklist, live.is_dependent_picklist())
        + fill_number(&mut field.length, live.length())
        + fill_number(&mut field.precision, live.precision())
        + fill_number(&mut field.scale, live.scale())
        + fill_text(&mut field.help_text, live.help_text())
        + fill_text(&mut field.label, live.label())
}
