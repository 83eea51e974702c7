//! Record type and validation rule documents

use crate::model::{RecordType, ValidationRule};

use super::field::{flag, text};
use super::xml::Element;

pub fn parse_record_type(root: &Element, fallback_name: &str) -> RecordType {
    RecordType {
        api_name: root.find_text("fullName").unwrap_or(fallback_name).to_string(),
        label: text(root, "label"),
        description: text(root, "description"),
        active: flag(root, "active"),
        parse_error: None,
    }
}

pub fn parse_validation_rule(root: &Element, fallback_name: &str) -> ValidationRule {
    ValidationRule {
        name: root.find_text("fullName").unwrap_or(fallback_name).to_string(),
        active: flag(root, "active"),
        description: text(root, "description"),
        error_condition_formula: text(root, "errorConditionFormula"),
        error_display_field: text(root, "errorDisplayField"),
        error_message: text(root, "errorMessage"),
        parse_error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::xml;

    #[test]
    fn test_record_type() {
        let root = xml::parse(
            "<RecordType><fullName>Support</fullName><active>true</active><label>Support</label></RecordType>",
        )
        .unwrap();
        let rt = parse_record_type(&root, "ignored");
        assert_eq!(rt.api_name, "Support");
        assert!(rt.active);
        assert_eq!(rt.description, None);
    }

    #[test]
    fn test_validation_rule() {
        let root = xml::parse(
            "<ValidationRule>\
             <active>false</active>\
             <errorConditionFormula>ISBLANK(Email)</errorConditionFormula>\
             <errorDisplayField>Email</errorDisplayField>\
             <errorMessage>Email is required</errorMessage>\
             </ValidationRule>",
        )
        .unwrap();
        let rule = parse_validation_rule(&root, "Require_Email");
        assert_eq!(rule.name, "Require_Email");
        assert!(!rule.active);
        assert_eq!(rule.error_condition_formula.as_deref(), Some("ISBLANK(Email)"));
        assert_eq!(rule.error_message.as_deref(), Some("Email is required"));
    }
}
