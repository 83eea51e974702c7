//! Parser Tolerance Tests
//!
//! Tests for parsing invariants:
//! - A bad document degrades to a placeholder, siblings still parse
//! - Invalid numerics are omitted with a warning
//! - Missing sub-collections are empty, a missing root aborts
//! - Repeated runs produce identical documents

use std::fs;
use std::path::Path;

use sfschema::model::{self, RelationshipType};
use sfschema::parser::{MetadataParser, ParseError};
use sfschema::report::{DiagnosticKind, RunReport};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const NS: &str = r#"xmlns="http://soap.sforce.com/2006/04/metadata""#;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn field_doc(name: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomField {}>
    <fullName>{}</fullName>
    {}
</CustomField>"#,
        NS, name, body
    )
}

fn write_field(root: &Path, object: &str, name: &str, body: &str) {
    write(
        &root.join(object).join("fields").join(format!("{}.field-meta.xml", name)),
        &field_doc(name, body),
    );
}

fn parse(root: &Path) -> (sfschema::model::SchemaDocument, RunReport) {
    let mut report = RunReport::new();
    let document = MetadataParser::new(root)
        .with_timestamp(Some("2024-05-01T00:00:00Z".to_string()))
        .parse_all(&mut report)
        .unwrap();
    (document, report)
}

// =============================================================================
// Placeholder Tests
// =============================================================================

/// One malformed field among ten: nine parse, the tenth is a placeholder.
#[test]
fn test_one_bad_field_among_ten() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for i in 0..9 {
        write_field(root, "Account", &format!("Field{}__c", i), "<type>Text</type><length>80</length>");
    }
    write(
        &root.join("Account/fields/Broken__c.field-meta.xml"),
        "<CustomField><fullName>Broken__c</fullName><type>Text",
    );

    let (document, report) = parse(root);
    let account = document.object("Account").unwrap();

    assert_eq!(account.fields.len(), 10);
    let broken = account.field("Broken__c").unwrap();
    assert!(broken.is_placeholder());
    assert_eq!(account.fields.iter().filter(|f| !f.is_placeholder()).count(), 9);
    assert_eq!(report.count(DiagnosticKind::StructuralParse), 1);
}

/// A malformed object descriptor keeps the object with its default label.
#[test]
fn test_bad_descriptor_keeps_object() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(&root.join("Invoice__c/Invoice__c.object-meta.xml"), "<CustomObject><label>Inv");
    write_field(root, "Invoice__c", "Amount__c", "<type>Currency</type>");

    let (document, report) = parse(root);
    let invoice = document.object("Invoice__c").unwrap();

    assert_eq!(invoice.label, "Invoice__c");
    assert_eq!(invoice.fields.len(), 1);
    assert_eq!(report.for_object("Invoice__c").count(), 1);
}

// =============================================================================
// Numeric Attribute Tests
// =============================================================================

/// `length` of "abc" is omitted with a warning; the field still parses.
#[test]
fn test_non_numeric_length_is_omitted() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_field(root, "Account", "Code__c", "<type>Text</type><length>abc</length><label>Code</label>");

    let (document, report) = parse(root);
    let code = document.object("Account").unwrap().field("Code__c").unwrap();

    assert_eq!(code.length, None);
    assert_eq!(code.label.as_deref(), Some("Code"));
    assert!(!code.is_placeholder());
    assert_eq!(report.count(DiagnosticKind::InvalidNumeric), 1);
    assert_eq!(report.errors().count(), 0);
}

/// Negative numbers are treated like non-numeric text.
#[test]
fn test_negative_precision_is_omitted() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_field(root, "Account", "Score__c", "<type>Number</type><precision>-1</precision><scale>2</scale>");

    let (document, report) = parse(root);
    let score = document.object("Account").unwrap().field("Score__c").unwrap();

    assert_eq!(score.precision, None);
    assert_eq!(score.scale, Some(2));
    assert_eq!(report.count(DiagnosticKind::InvalidNumeric), 1);
}

// =============================================================================
// Collection Tests
// =============================================================================

/// Objects without any sub-collection directory parse as empty objects.
#[test]
fn test_missing_collections_are_empty() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("Contact")).unwrap();

    let (document, report) = parse(temp_dir.path());
    let contact = document.object("Contact").unwrap();

    assert!(contact.fields.is_empty());
    assert!(contact.record_types.is_empty());
    assert!(contact.validation_rules.is_empty());
    assert!(report.is_clean());
}

/// A sub-collection path that cannot be listed yields no items and an
/// error, and the object is still produced.
#[test]
fn test_unreadable_collection_keeps_object() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir.path().join("Contact/fields"), "not a directory");
    write_field(temp_dir.path(), "Account", "Name", "<type>Text</type>");

    let (document, report) = parse(temp_dir.path());
    let contact = document.object("Contact").unwrap();

    assert!(contact.fields.is_empty());
    assert_eq!(report.count(DiagnosticKind::UnreadableCollection), 1);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(document.objects.len(), 2);
    assert_eq!(document.object("Account").unwrap().fields.len(), 1);
}

/// An absent object root aborts before any output.
#[test]
fn test_missing_root_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let mut report = RunReport::new();
    let err = MetadataParser::new(temp_dir.path().join("nope"))
        .parse_all(&mut report)
        .unwrap_err();

    assert!(matches!(err, ParseError::MissingObjectRoot { .. }));
    assert!(err.is_fatal());
}

/// Duplicate field names keep the first definition.
#[test]
fn test_duplicate_field_keeps_first() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        &root.join("Account/fields/A_Name.field-meta.xml"),
        &field_doc("Shared__c", "<type>Text</type>"),
    );
    write(
        &root.join("Account/fields/B_Name.field-meta.xml"),
        &field_doc("Shared__c", "<type>Number</type>"),
    );

    let (document, report) = parse(root);
    let account = document.object("Account").unwrap();

    assert_eq!(account.fields.len(), 1);
    assert_eq!(account.fields[0].type_name(), "Text");
    assert_eq!(report.count(DiagnosticKind::DuplicateName), 1);
}

// =============================================================================
// Relationship Tests
// =============================================================================

/// A Lookup on Case to Contact yields exactly one edge.
#[test]
fn test_lookup_edge() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_field(
        root,
        "Case",
        "ContactId",
        "<type>Lookup</type><referenceTo>Contact</referenceTo><relationshipName>Contact</relationshipName><deleteConstraint>SetNull</deleteConstraint>",
    );
    write_field(root, "Case", "Subject", "<type>Text</type>");

    let (document, _) = parse(root);

    assert_eq!(document.relationships.len(), 1);
    let edge = &document.relationships[0];
    assert_eq!(edge.from_object, "Case");
    assert_eq!(edge.from_field, "ContactId");
    assert_eq!(edge.to_object, "Contact");
    assert_eq!(edge.relationship_type, RelationshipType::Lookup);
    assert_eq!(edge.delete_constraint, "SetNull");
}

/// A Lookup without a target yields no edge.
#[test]
fn test_lookup_without_target_has_no_edge() {
    let temp_dir = TempDir::new().unwrap();
    write_field(temp_dir.path(), "Case", "Orphan__c", "<type>Lookup</type>");

    let (document, _) = parse(temp_dir.path());
    assert!(document.relationships.is_empty());
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Two runs over unchanged input write byte-identical documents.
#[test]
fn test_repeated_runs_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("objects");

    write_field(&root, "Account", "Rating", "<type>Picklist</type><valueSet><valueSetDefinition><value><fullName>Hot</fullName></value><value><fullName>Cold</fullName></value></valueSetDefinition></valueSet>");
    write_field(&root, "Opportunity", "AccountId", "<type>MasterDetail</type><referenceTo>Account</referenceTo>");
    write_field(&root, "Opportunity", "Amount", "<type>Currency</type><precision>18</precision><scale>2</scale>");

    let first = temp_dir.path().join("first.yaml");
    let second = temp_dir.path().join("second.yaml");
    model::write_document(&parse(&root).0, &first).unwrap();
    model::write_document(&parse(&root).0, &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    let document = model::read_document(&first).unwrap();
    let names: Vec<_> = document.objects.iter().map(|o| o.api_name.as_str()).collect();
    assert_eq!(names, vec!["Account", "Opportunity"]);
    assert_eq!(
        document.object("Account").unwrap().field("Rating").unwrap().picklist_values,
        Some(vec!["Hot".to_string(), "Cold".to_string()])
    );
}
