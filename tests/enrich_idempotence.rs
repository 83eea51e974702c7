//! Enrichment Tests
//!
//! Tests for merging live describe results into a layout:
//! - Picklists keep only active values
//! - Re-running with the same describe is a no-op on file contents
//! - A failing object is skipped, the others still complete
//! - Dry runs write nothing

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde_json::json;
use sfschema::artifact;
use sfschema::categorize::CategoryRules;
use sfschema::enrich::{
    DescribeSource, EnrichError, Enricher, EnrichmentStats, ObjectDescribe, ACTIVE_PICKLIST_NOTE,
};
use sfschema::model::{DocumentMetadata, FieldDefinition, ObjectDefinition, SchemaDocument};
use sfschema::report::{DiagnosticKind, RunReport};
use sfschema::split::{Layout, LayoutManifest, PicklistPayload, SchemaPayload, Splitter};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const SPLIT_TS: &str = "2024-05-01T00:00:00Z";
const ENRICH_TS: &str = "2024-05-02T00:00:00Z";

/// Describe results keyed by object; unknown objects time out.
struct ScriptedSource {
    responses: HashMap<String, serde_json::Value>,
}

impl DescribeSource for ScriptedSource {
    fn describe(&self, object: &str) -> Result<ObjectDescribe, EnrichError> {
        match self.responses.get(object) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| EnrichError::malformed(object, e)),
            None => Err(EnrichError::Timeout {
                object: object.to_string(),
                seconds: 60,
            }),
        }
    }
}

fn field(name: &str, ty: &str) -> FieldDefinition {
    let mut f = FieldDefinition::new(name);
    f.field_type = Some(ty.to_string());
    f
}

fn document() -> SchemaDocument {
    let mut account = ObjectDefinition::new("Account");
    let mut status = field("Status__c", "Picklist");
    status.picklist_values = Some(vec!["Active".into(), "Inactive".into(), "Legacy".into()]);
    account.fields.push(status);
    account.fields.push(field("Score__c", "Number"));
    account.fields.push(field("Name", "Text"));

    let mut contact = ObjectDefinition::new("Contact");
    contact.fields.push(field("Email", "Email"));

    SchemaDocument {
        metadata: DocumentMetadata {
            generated_date: SPLIT_TS.to_string(),
            source_path: "objects".to_string(),
            total_objects: 2,
        },
        objects: vec![account, contact],
        relationships: Vec::new(),
    }
}

fn split(root: &Path) -> Layout {
    let layout = Layout::new(root);
    let rules = CategoryRules::default();
    let mut report = RunReport::new();
    Splitter::new(layout.clone(), &rules, "config/salesforce-er-schema.yaml")
        .with_timestamp(Some(SPLIT_TS.to_string()))
        .run(&document(), &mut report)
        .unwrap();
    layout
}

fn account_describe() -> serde_json::Value {
    json!({
        "name": "Account",
        "fields": [
            {
                "name": "Status__c",
                "type": "picklist",
                "picklistValues": [
                    {"value": "Active", "active": true},
                    {"value": "Inactive", "active": true},
                    {"value": "Legacy", "active": false}
                ]
            },
            {
                "name": "Score__c",
                "type": "double",
                "calculated": true,
                "calculatedFormula": "AnnualRevenue / 1000",
                "precision": 18,
                "scale": 0
            },
            {
                "name": "Name",
                "type": "string",
                "nillable": false,
                "length": 255,
                "defaultValue": null
            },
            {
                "name": "NotInLayout__c",
                "type": "string"
            }
        ]
    })
}

fn source(with_contact: bool) -> ScriptedSource {
    let mut responses = HashMap::new();
    responses.insert("Account".to_string(), account_describe());
    if with_contact {
        responses.insert(
            "Contact".to_string(),
            json!({"name": "Contact", "fields": [{"name": "Email", "type": "email", "unique": true}]}),
        );
    }
    ScriptedSource { responses }
}

fn enrich(layout: &Layout, source: &ScriptedSource, dry_run: bool) -> (EnrichmentStats, RunReport) {
    let mut report = RunReport::new();
    let stats = Enricher::new(layout.clone(), source)
        .with_timestamp(Some(ENRICH_TS.to_string()))
        .dry_run(dry_run)
        .run(None, &mut report)
        .unwrap();
    (stats, report)
}

/// Every file under `root`, relative path to bytes.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let relative = path.strip_prefix(root).unwrap().display().to_string();
                out.insert(relative, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

// =============================================================================
// Merge Tests
// =============================================================================

/// Inactive picklist values are dropped and the payload is marked.
#[test]
fn test_picklists_keep_only_active_values() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());

    let (stats, report) = enrich(&layout, &source(true), false);
    assert!(report.is_clean());
    assert_eq!(stats.objects_processed, 2);
    assert_eq!(stats.picklists_added, 1);

    let picklists: PicklistPayload = artifact::read_yaml(&layout.picklists_path("Account")).unwrap();
    assert_eq!(
        picklists.picklists["Status__c"],
        vec!["Active".to_string(), "Inactive".to_string()]
    );
    assert_eq!(picklists.metadata.note.as_deref(), Some(ACTIVE_PICKLIST_NOTE));

    let text = fs::read_to_string(layout.picklists_path("Account")).unwrap();
    assert!(text.contains("IMPORTANT: Only ACTIVE picklist values are shown."));
    assert!(!text.contains("Legacy"));
}

/// Formulas are added, missing attributes filled, unknown fields ignored.
#[test]
fn test_formulas_and_attributes_are_merged() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());
    assert!(!layout.formulas_path("Account").exists());

    let (stats, _) = enrich(&layout, &source(true), false);
    assert_eq!(stats.formulas_added, 1);
    assert_eq!(stats.formula_files_written, 1);

    let schema: SchemaPayload = artifact::read_yaml(&layout.schema_path("Account")).unwrap();
    assert!(schema.metadata.has_formulas);
    assert_eq!(schema.metadata.enriched_date.as_deref(), Some(ENRICH_TS));
    assert_eq!(schema.object.fields.len(), 3);

    let score = schema.object.fields.iter().find(|f| f.api_name() == "Score__c").unwrap();
    assert_eq!(score.field.formula, None);
    assert!(score.formula_note.is_some());
    assert_eq!(score.field.precision, Some(18));
    assert_eq!(score.field.scale, None);

    let name = schema.object.fields.iter().find(|f| f.api_name() == "Name").unwrap();
    assert!(name.field.required);
    assert_eq!(name.field.length, Some(255));
    assert_eq!(name.field.default_value, None);

    let contact: SchemaPayload = artifact::read_yaml(&layout.schema_path("Contact")).unwrap();
    assert!(contact.object.fields[0].field.unique);
}

// =============================================================================
// Idempotence Tests
// =============================================================================

/// A second run with the same describe and timestamp changes no bytes.
#[test]
fn test_second_run_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());
    let source = source(true);

    enrich(&layout, &source, false);
    let first = snapshot(temp_dir.path());

    let (stats, report) = enrich(&layout, &source, false);
    let second = snapshot(temp_dir.path());

    assert!(report.is_clean());
    assert_eq!(stats.objects_processed, 2);
    assert_eq!(first.keys().collect::<Vec<_>>(), second.keys().collect::<Vec<_>>());
    for (path, bytes) in &first {
        assert_eq!(bytes, &second[path], "{} changed", path);
    }
}

/// The manifest stays consistent with the enriched files.
#[test]
fn test_manifest_refreshed_after_enrich() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());

    enrich(&layout, &source(true), false);

    let manifest = LayoutManifest::load(&layout).unwrap();
    assert_eq!(manifest.generated_date, ENRICH_TS);
    assert_eq!(
        manifest.partitions["Account"].files.formulas.as_deref(),
        Some("objects/Account/formulas.yaml")
    );
    assert!(manifest.verify(&layout).is_clean());
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

/// A timed-out object is skipped; the rest of the run completes.
#[test]
fn test_timeout_skips_only_that_object() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());
    let contact_before = fs::read(layout.schema_path("Contact")).unwrap();

    let (stats, report) = enrich(&layout, &source(false), false);

    assert_eq!(stats.objects_processed, 1);
    assert_eq!(stats.objects_skipped, 1);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].starts_with("Contact: "));
    assert_eq!(report.count(DiagnosticKind::ExternalFetch), 1);

    assert_eq!(fs::read(layout.schema_path("Contact")).unwrap(), contact_before);
    assert!(layout.formulas_path("Account").exists());
}

/// Restricting the run to named objects leaves the others untouched.
#[test]
fn test_named_objects_only() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());
    let contact_before = fs::read(layout.schema_path("Contact")).unwrap();

    let mut report = RunReport::new();
    let only = vec!["Account".to_string()];
    let stats = Enricher::new(layout.clone(), &source(true))
        .with_timestamp(Some(ENRICH_TS.to_string()))
        .run(Some(&only), &mut report)
        .unwrap();

    assert_eq!(stats.objects_processed, 1);
    assert_eq!(fs::read(layout.schema_path("Contact")).unwrap(), contact_before);
}

// =============================================================================
// Dry Run Tests
// =============================================================================

/// A dry run counts the merge but leaves every file as it was.
#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let layout = split(temp_dir.path());
    let before = snapshot(temp_dir.path());

    let (stats, _) = enrich(&layout, &source(true), true);

    assert!(stats.dry_run);
    assert_eq!(stats.objects_processed, 2);
    assert_eq!(stats.formulas_added, 1);
    assert_eq!(stats.formula_files_written, 0);
    assert_eq!(snapshot(temp_dir.path()), before);
}
