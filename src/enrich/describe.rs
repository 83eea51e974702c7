//! Live field attributes as returned by `sobject describe`
//!
//! The platform sends `null` for most absent attributes, so every field
//! here is optional and read through the accessor methods.

use serde::Deserialize;
use serde_json::Value;

use super::errors::EnrichError;

/// Source of describe results, keyed by object API name.
///
/// Implementations must be safe to call again for the same object.
pub trait DescribeSource {
    fn describe(&self, object: &str) -> Result<ObjectDescribe, EnrichError>;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectDescribe {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldDescribe>>,
}

impl ObjectDescribe {
    pub fn fields(&self) -> &[FieldDescribe] {
        self.fields.as_deref().unwrap_or(&[])
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields().iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescribe {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub picklist_values: Option<Vec<PicklistEntry>>,
    #[serde(default)]
    pub calculated: Option<bool>,
    #[serde(default)]
    pub calculated_formula: Option<String>,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub nillable: Option<bool>,
    #[serde(default)]
    pub unique: Option<bool>,
    #[serde(default)]
    pub external_id: Option<bool>,
    #[serde(default)]
    pub reference_to: Option<Vec<String>>,
    #[serde(default)]
    pub controller_name: Option<String>,
    #[serde(default)]
    pub dependent_picklist: Option<bool>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub inline_help_text: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PicklistEntry {
    pub value: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl PicklistEntry {
    /// Entries without an `active` flag count as active.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

/// Active option values, in describe order.
pub fn extract_active_picklist_values(entries: &[PicklistEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.is_active())
        .map(|e| e.value.clone())
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl FieldDescribe {
    pub fn type_name(&self) -> &str {
        self.field_type.as_deref().unwrap_or("")
    }

    /// `picklist` or `multipicklist`
    pub fn is_picklist(&self) -> bool {
        matches!(self.type_name(), "picklist" | "multipicklist")
    }

    pub fn active_picklist_values(&self) -> Vec<String> {
        extract_active_picklist_values(self.picklist_values.as_deref().unwrap_or(&[]))
    }

    /// Formula text of a calculated field.
    pub fn formula(&self) -> Option<&str> {
        if self.calculated.unwrap_or(false) {
            non_empty(&self.calculated_formula)
        } else {
            None
        }
    }

    /// Default value as text. False, zero, empty and null count as absent.
    pub fn default_value_text(&self) -> Option<String> {
        match self.default_value.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some("true".to_string()),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Number(n) => Some(n.to_string()),
            Value::Array(a) if a.is_empty() => None,
            Value::Object(o) if o.is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    /// Only non-nillable fields are known to be required.
    pub fn is_required(&self) -> bool {
        self.nillable == Some(false)
    }

    pub fn is_unique(&self) -> bool {
        self.unique.unwrap_or(false)
    }

    pub fn is_external_id(&self) -> bool {
        self.external_id.unwrap_or(false)
    }

    /// First reference target of a `reference` field.
    pub fn reference_target(&self) -> Option<&str> {
        if self.type_name() != "reference" {
            return None;
        }
        self.reference_to
            .as_ref()?
            .iter()
            .map(String::as_str)
            .find(|t| !t.is_empty())
    }

    pub fn controlling_field(&self) -> Option<&str> {
        non_empty(&self.controller_name)
    }

    pub fn is_dependent_picklist(&self) -> bool {
        self.dependent_picklist.unwrap_or(false)
    }

    pub fn length(&self) -> Option<u32> {
        self.length.filter(|n| *n > 0)
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision.filter(|n| *n > 0)
    }

    pub fn scale(&self) -> Option<u32> {
        self.scale.filter(|n| *n > 0)
    }

    pub fn help_text(&self) -> Option<&str> {
        non_empty(&self.inline_help_text)
    }

    pub fn label(&self) -> Option<&str> {
        non_empty(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_only() {
        let entries: Vec<PicklistEntry> = serde_json::from_str(
            r#"[{"value":"A","active":true},{"value":"B","active":false}]"#,
        )
        .unwrap();
        assert_eq!(extract_active_picklist_values(&entries), vec!["A"]);
    }

    #[test]
    fn test_missing_active_flag_counts_as_active() {
        let entries: Vec<PicklistEntry> =
            serde_json::from_str(r#"[{"value":"A"},{"value":"B","active":null}]"#).unwrap();
        assert_eq!(extract_active_picklist_values(&entries), vec!["A", "B"]);
    }

    #[test]
    fn test_nulls_are_tolerated() {
        let field: FieldDescribe = serde_json::from_str(
            r#"{
                "name": "Industry",
                "type": "picklist",
                "calculated": false,
                "calculatedFormula": null,
                "defaultValue": null,
                "referenceTo": [],
                "controllerName": null,
                "length": 255,
                "precision": 0,
                "inlineHelpText": null
            }"#,
        )
        .unwrap();
        assert!(field.is_picklist());
        assert_eq!(field.formula(), None);
        assert_eq!(field.default_value_text(), None);
        assert_eq!(field.reference_target(), None);
        assert_eq!(field.length(), Some(255));
        assert_eq!(field.precision(), None);
        assert!(!field.is_required());
    }

    #[test]
    fn test_default_value_rendering() {
        let mut field = FieldDescribe::default();
        for (raw, expected) in [
            (r#""Open""#, Some("Open")),
            ("true", Some("true")),
            ("false", None),
            ("0", None),
            ("5", Some("5")),
            (r#""""#, None),
        ] {
            field.default_value = Some(serde_json::from_str(raw).unwrap());
            assert_eq!(field.default_value_text().as_deref(), expected, "{}", raw);
        }
    }

    #[test]
    fn test_reference_target_first_only() {
        let field: FieldDescribe = serde_json::from_str(
            r#"{"name":"WhoId","type":"reference","referenceTo":["Contact","Lead"]}"#,
        )
        .unwrap();
        assert_eq!(field.reference_target(), Some("Contact"));
    }

    #[test]
    fn test_formula_requires_calculated() {
        let field: FieldDescribe = serde_json::from_str(
            r#"{"name":"Total__c","type":"currency","calculated":true,"calculatedFormula":"A + B"}"#,
        )
        .unwrap();
        assert_eq!(field.formula(), Some("A + B"));

        let field: FieldDescribe = serde_json::from_str(
            r#"{"name":"Total__c","type":"currency","calculated":false,"calculatedFormula":"A + B"}"#,
        )
        .unwrap();
        assert_eq!(field.formula(), None);
    }
}
