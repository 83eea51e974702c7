//! Object directory walker
//!
//! Layout of one object directory:
//!
//! ```text
//! <Name>/
//!   <Name>.object-meta.xml
//!   fields/*.field-meta.xml
//!   recordTypes/*.recordType-meta.xml
//!   validationRules/*.validationRule-meta.xml
//! ```
//!
//! Every piece is optional. Directory and file names are visited in
//! lexicographic order, which is the only source of ordering in the output.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::artifact::generation_timestamp;
use crate::model::{
    DocumentMetadata, FieldDefinition, ObjectDefinition, RecordType, RelationshipEdge,
    SchemaDocument, ValidationRule,
};
use crate::observability::{log_event_with_fields, stage, Event, Logger, ObservationScope};
use crate::report::{DiagnosticKind, RunReport};

use super::errors::{ParseError, ParseResult};
use super::field::parse_field;
use super::record::{parse_record_type, parse_validation_rule};
use super::relationships;
use super::xml::{self, Element};

pub const OBJECT_SUFFIX: &str = ".object-meta.xml";
pub const FIELD_SUFFIX: &str = ".field-meta.xml";
pub const RECORD_TYPE_SUFFIX: &str = ".recordType-meta.xml";
pub const VALIDATION_RULE_SUFFIX: &str = ".validationRule-meta.xml";

const FIELDS_DIR: &str = "fields";
const RECORD_TYPES_DIR: &str = "recordTypes";
const VALIDATION_RULES_DIR: &str = "validationRules";

/// Parses an object root into a `SchemaDocument`.
pub struct MetadataParser {
    objects_path: PathBuf,
    fixed_timestamp: Option<String>,
}

impl MetadataParser {
    pub fn new(objects_path: impl Into<PathBuf>) -> Self {
        Self {
            objects_path: objects_path.into(),
            fixed_timestamp: None,
        }
    }

    /// Stamps the document with `timestamp` instead of the current time.
    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.fixed_timestamp = timestamp;
        self
    }

    pub fn objects_path(&self) -> &Path {
        &self.objects_path
    }

    /// Parses every object directory under the root.
    ///
    /// Fails only when the root itself is absent or unreadable. Everything
    /// below it is tolerated and recorded in `report`.
    pub fn parse_all(&self, report: &mut RunReport) -> ParseResult<SchemaDocument> {
        let root_display = self.objects_path.display().to_string();

        if !self.objects_path.exists() {
            return Err(ParseError::MissingObjectRoot {
                path: self.objects_path.clone(),
            });
        }
        if !self.objects_path.is_dir() {
            return Err(ParseError::NotADirectory {
                path: self.objects_path.clone(),
            });
        }

        let scope = ObservationScope::with_fields(stage::PARSE, &[("path", root_display.as_str())]);

        let object_dirs = match self.object_dirs(report) {
            Ok(dirs) => dirs,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        let mut objects = Vec::with_capacity(object_dirs.len());
        let mut edges = Vec::new();
        for (name, dir) in &object_dirs {
            objects.push(self.parse_object(name, dir, &mut edges, report));
        }

        let document = SchemaDocument {
            metadata: DocumentMetadata {
                generated_date: generation_timestamp(self.fixed_timestamp.as_deref()),
                source_path: root_display,
                total_objects: objects.len(),
            },
            objects,
            relationships: edges,
        };

        let objects = document.objects.len().to_string();
        let relationships = document.relationships.len().to_string();
        let diagnostics = report.len().to_string();
        scope.complete_with_fields(&[
            ("objects", objects.as_str()),
            ("relationships", relationships.as_str()),
            ("diagnostics", diagnostics.as_str()),
        ]);
        Ok(document)
    }

    /// Immediate subdirectories, sorted by name.
    fn object_dirs(&self, report: &mut RunReport) -> ParseResult<Vec<(String, PathBuf)>> {
        let entries =
            fs::read_dir(&self.objects_path).map_err(|e| ParseError::io(&self.objects_path, e))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.error(
                        DiagnosticKind::Io,
                        &self.objects_path.display().to_string(),
                        None,
                        format!("could not read directory entry: {}", e),
                    );
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
            }
        }

        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(dirs)
    }

    /// Builds one object. Never fails: unreadable parts become placeholders
    /// or empty collections, each with a diagnostic.
    pub fn parse_object(
        &self,
        name: &str,
        dir: &Path,
        edges: &mut Vec<RelationshipEdge>,
        report: &mut RunReport,
    ) -> ObjectDefinition {
        let mut object = ObjectDefinition::new(name);

        let descriptor = dir.join(format!("{}{}", name, OBJECT_SUFFIX));
        if descriptor.exists() {
            match load(&descriptor) {
                Ok(root) => {
                    if let Some(label) = root.find_text("label") {
                        object.label = label.to_string();
                    }
                    object.description = root.find_text("description").map(str::to_string);
                }
                Err(message) => {
                    report.warn(
                        DiagnosticKind::StructuralParse,
                        name,
                        Some(file_name(&descriptor).as_str()),
                        message,
                    );
                }
            }
        }

        let mut seen = HashSet::new();
        for path in documents(&dir.join(FIELDS_DIR), FIELD_SUFFIX, name, report) {
            let fallback = name_from_file(&path, FIELD_SUFFIX);
            let field = match load(&path) {
                Ok(root) => parse_field(&root, &fallback, name, report),
                Err(message) => {
                    report.warn(DiagnosticKind::StructuralParse, name, Some(fallback.as_str()), &message);
                    FieldDefinition::placeholder(fallback, message)
                }
            };

            if !seen.insert(field.api_name.clone()) {
                report.warn(
                    DiagnosticKind::DuplicateName,
                    name,
                    Some(field.api_name.as_str()),
                    format!("duplicate field in {}, first definition kept", file_name(&path)),
                );
                continue;
            }

            if let Some(edge) = relationships::extract(name, &field) {
                edges.push(edge);
            }
            object.fields.push(field);
        }

        let mut seen = HashSet::new();
        for path in documents(&dir.join(RECORD_TYPES_DIR), RECORD_TYPE_SUFFIX, name, report) {
            let fallback = name_from_file(&path, RECORD_TYPE_SUFFIX);
            let record_type = match load(&path) {
                Ok(root) => parse_record_type(&root, &fallback),
                Err(message) => {
                    report.warn(DiagnosticKind::StructuralParse, name, Some(fallback.as_str()), &message);
                    RecordType {
                        api_name: fallback,
                        parse_error: Some(message),
                        ..RecordType::default()
                    }
                }
            };
            if seen.insert(record_type.api_name.clone()) {
                object.record_types.push(record_type);
            } else {
                report.warn(
                    DiagnosticKind::DuplicateName,
                    name,
                    Some(record_type.api_name.as_str()),
                    "duplicate record type, first definition kept",
                );
            }
        }

        let mut seen = HashSet::new();
        for path in documents(&dir.join(VALIDATION_RULES_DIR), VALIDATION_RULE_SUFFIX, name, report) {
            let fallback = name_from_file(&path, VALIDATION_RULE_SUFFIX);
            let rule = match load(&path) {
                Ok(root) => parse_validation_rule(&root, &fallback),
                Err(message) => {
                    report.warn(DiagnosticKind::StructuralParse, name, Some(fallback.as_str()), &message);
                    ValidationRule {
                        name: fallback,
                        parse_error: Some(message),
                        ..ValidationRule::default()
                    }
                }
            };
            if seen.insert(rule.name.clone()) {
                object.validation_rules.push(rule);
            } else {
                report.warn(
                    DiagnosticKind::DuplicateName,
                    name,
                    Some(rule.name.as_str()),
                    "duplicate validation rule, first definition kept",
                );
            }
        }

        let fields = object.fields.len().to_string();
        let record_types = object.record_types.len().to_string();
        let validation_rules = object.validation_rules.len().to_string();
        log_event_with_fields(
            Event::ObjectParsed,
            &[
                ("object", name),
                ("fields", fields.as_str()),
                ("record_types", record_types.as_str()),
                ("validation_rules", validation_rules.as_str()),
            ],
        );
        object
    }
}

/// Reads and parses one document; the error is rendered for the placeholder.
fn load(path: &Path) -> Result<Element, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", file_name(path), e))?;
    xml::parse(&content).map_err(|e| format!("{}: {}", file_name(path), e))
}

/// Documents with `suffix` in `dir`, sorted by file name.
///
/// An absent directory is an empty collection. An unreadable one is also
/// empty but reported as an error.
fn documents(dir: &Path, suffix: &str, object: &str, report: &mut RunReport) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    match list_with_suffix(dir, suffix) {
        Ok(paths) => paths,
        Err(e) => {
            report.error(
                DiagnosticKind::UnreadableCollection,
                object,
                Some(file_name(dir).as_str()),
                format!("could not list {}: {}", dir.display(), e),
            );
            Vec::new()
        }
    }
}

fn list_with_suffix(dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && file_name(&path).ends_with(suffix) {
            paths.push(path);
        }
    }
    paths.sort();
    let dir_display = dir.display().to_string();
    let count = paths.len().to_string();
    Logger::trace(
        "COLLECTION_LISTED",
        &[("dir", dir_display.as_str()), ("documents", count.as_str())],
    );
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name with the metadata suffix removed: `Status__c.field-meta.xml`
/// gives `Status__c`.
pub fn name_from_file(path: &Path, suffix: &str) -> String {
    let name = file_name(path);
    match name.strip_suffix(suffix) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}
