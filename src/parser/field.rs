//! Field document → `FieldDefinition`

use crate::model::FieldDefinition;
use crate::report::{DiagnosticKind, RunReport};

use super::xml::Element;

/// Builds a field from a parsed `CustomField` document.
///
/// `fallback_name` is used when the document carries no `fullName`. Invalid
/// numeric attributes are omitted and reported against `object`.
pub fn parse_field(
    root: &Element,
    fallback_name: &str,
    object: &str,
    report: &mut RunReport,
) -> FieldDefinition {
    let api_name = root.find_text("fullName").unwrap_or(fallback_name);
    let mut field = FieldDefinition::new(api_name);

    field.label = text(root, "label");
    field.field_type = text(root, "type");
    field.description = text(root, "description");
    field.help_text = text(root, "inlineHelpText");

    field.required = flag(root, "required");
    field.unique = flag(root, "unique");
    field.external_id = flag(root, "externalId");

    field.length = numeric(root, "length", object, &field.api_name, report);
    field.precision = numeric(root, "precision", object, &field.api_name, report);
    field.scale = numeric(root, "scale", object, &field.api_name, report);

    if field.is_reference_type() {
        // Polymorphic targets are not modelled: the first referenceTo wins.
        field.reference_to = text(root, "referenceTo");
        field.relationship_name = text(root, "relationshipName");
        field.relationship_label = text(root, "relationshipLabel");
        field.delete_constraint = text(root, "deleteConstraint");
    }

    if field.is_picklist_type() {
        let values = picklist_values(root);
        if !values.is_empty() {
            field.picklist_values = Some(values);
        }
    }

    field.formula = text(root, "formula");
    field.default_value = text(root, "defaultValue");

    field
}

/// Every non-empty `fullName` under the field's `valueSet`, in order.
fn picklist_values(root: &Element) -> Vec<String> {
    match root.find("valueSet") {
        Some(value_set) => value_set
            .find_all("fullName")
            .into_iter()
            .filter(|e| !e.text.is_empty())
            .map(|e| e.text.clone())
            .collect(),
        None => Vec::new(),
    }
}

pub(super) fn text(root: &Element, name: &str) -> Option<String> {
    root.find_text(name).map(str::to_string)
}

/// `true` only for a case-insensitive "true"; absent means false.
pub(super) fn flag(root: &Element, name: &str) -> bool {
    root.find_text(name)
        .map_or(false, |t| t.trim().eq_ignore_ascii_case("true"))
}

fn numeric(
    root: &Element,
    name: &str,
    object: &str,
    field: &str,
    report: &mut RunReport,
) -> Option<u32> {
    let raw = root.find_text(name)?;
    match raw.trim().parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            report.warn(
                DiagnosticKind::InvalidNumeric,
                object,
                Some(field),
                format!("invalid {} value '{}', attribute omitted", name, raw),
            );
            None
        }
    }
}
