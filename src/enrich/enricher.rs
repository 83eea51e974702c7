//! Enrichment run over an existing partitioned layout
//!
//! Objects are processed one at a time in lexicographic order. A failure for
//! one object is recorded as a skip; only fatal errors end the run early.

use std::fs;
use std::path::Path;

use crate::artifact::{self, generation_timestamp, ArtifactError, ArtifactResult};
use crate::observability::{log_event_with_fields, stage, Event, ObservationScope};
use crate::report::RunReport;
use crate::split::layout::{folder_ref, Layout, PartitionFiles};
use crate::split::{FormulaPayload, LayoutManifest, PartitionDescriptor, PicklistPayload, SchemaPayload};

use super::describe::DescribeSource;
use super::errors::{EnrichError, EnrichResult};
use super::merge::{merge_object, MergeOutcome};
use super::stats::EnrichmentStats;

pub struct Enricher<'s> {
    layout: Layout,
    source: &'s dyn DescribeSource,
    fixed_timestamp: Option<String>,
    dry_run: bool,
}

impl<'s> Enricher<'s> {
    pub fn new(layout: Layout, source: &'s dyn DescribeSource) -> Self {
        Self {
            layout,
            source,
            fixed_timestamp: None,
            dry_run: false,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.fixed_timestamp = timestamp;
        self
    }

    /// Computes and counts the merge without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enriches `objects`, or every object folder when `None`.
    pub fn run(&self, objects: Option<&[String]>, report: &mut RunReport) -> EnrichResult<EnrichmentStats> {
        let objects_dir = self.layout.objects_dir();
        if !objects_dir.is_dir() {
            return Err(EnrichError::LayoutMissing { path: objects_dir });
        }

        let targets = match objects {
            Some(list) => {
                if let Some(bad) = list.iter().find(|name| !is_folder_name(name)) {
                    return Err(EnrichError::InvalidObjectName { name: bad.clone() });
                }
                list.to_vec()
            }
            None => list_objects(&objects_dir).map_err(EnrichError::Artifact)?,
        };

        let count = targets.len().to_string();
        let mode = if self.dry_run { "dry_run" } else { "write" };
        let scope = ObservationScope::with_fields(
            stage::ENRICH,
            &[("objects", count.as_str()), ("mode", mode)],
        );

        let timestamp = generation_timestamp(self.fixed_timestamp.as_deref());
        let mut stats = EnrichmentStats::new(self.dry_run);
        let mut manifest = if self.dry_run {
            None
        } else {
            LayoutManifest::load_existing(&self.layout)
        };
        let mut manifest_dirty = false;

        for object in &targets {
            match self.enrich_object(object, &timestamp, &mut stats) {
                Ok(descriptor) => {
                    stats.objects_processed += 1;
                    if let (Some(manifest), Some(descriptor)) = (manifest.as_mut(), descriptor) {
                        manifest.partitions.insert(object.clone(), descriptor);
                        manifest_dirty = true;
                    }
                    log_event_with_fields(Event::ObjectEnriched, &[("object", object.as_str()), ("mode", mode)]);
                }
                Err(e) if e.is_fatal() => {
                    scope.fail_fatal(&e.to_string());
                    return Err(e);
                }
                Err(e) => {
                    let message = e.to_string();
                    report.error(e.diagnostic_kind(), object, None, message.as_str());
                    stats.record_skip(object, &message);
                    log_event_with_fields(
                        Event::ObjectSkipped,
                        &[("object", object.as_str()), ("code", e.code())],
                    );
                }
            }
        }

        if let (Some(manifest), true) = (manifest.as_mut(), manifest_dirty) {
            manifest.generated_date = timestamp.clone();
            if let Err(e) = manifest.write(&self.layout) {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
            log_event_with_fields(Event::ManifestWritten, &[("mode", "enrich")]);
        }

        let processed = stats.objects_processed.to_string();
        let skipped = stats.objects_skipped.to_string();
        scope.complete_with_fields(&[
            ("processed", processed.as_str()),
            ("skipped", skipped.as_str()),
        ]);
        Ok(stats)
    }

    /// Returns the refreshed partition descriptor, or `None` on a dry run.
    fn enrich_object(
        &self,
        object: &str,
        timestamp: &str,
        stats: &mut EnrichmentStats,
    ) -> EnrichResult<Option<PartitionDescriptor>> {
        let schema_path = self.layout.schema_path(object);
        if !schema_path.is_file() {
            return Err(EnrichError::SchemaMissing {
                object: object.to_string(),
                path: schema_path,
            });
        }

        let live = self.source.describe(object)?;

        let schema: SchemaPayload = artifact::read_yaml(&schema_path)?;
        let picklists: Option<PicklistPayload> = read_optional(&self.layout.picklists_path(object))?;
        let formulas: Option<FormulaPayload> = read_optional(&self.layout.formulas_path(object))?;

        let outcome = merge_object(&schema, picklists.as_ref(), formulas.as_ref(), &live, timestamp);
        stats.fields_enriched += outcome.fields_enriched;
        stats.picklists_added += outcome.picklists_added;
        stats.formulas_added += outcome.formulas_added;

        if self.dry_run {
            return Ok(None);
        }
        self.write_outcome(object, &outcome, stats).map(Some).map_err(EnrichError::from)
    }

    fn write_outcome(
        &self,
        object: &str,
        outcome: &MergeOutcome,
        stats: &mut EnrichmentStats,
    ) -> ArtifactResult<PartitionDescriptor> {
        let files = PartitionFiles::for_object(
            object,
            outcome.picklists.is_some(),
            outcome.formulas.is_some(),
        );
        let mut descriptor = PartitionDescriptor::new(folder_ref(object), files.clone());

        let checksum = outcome.schema.write(&self.layout.schema_path(object))?;
        descriptor.record(&files.schema, checksum);

        let picklists_path = self.layout.picklists_path(object);
        match (&outcome.picklists, &files.picklists) {
            (Some(payload), Some(file_ref)) => {
                descriptor.record(file_ref, payload.write(&picklists_path)?);
                stats.picklist_files_written += 1;
            }
            _ => {
                artifact::remove_stale(&picklists_path)?;
            }
        }

        let formulas_path = self.layout.formulas_path(object);
        match (&outcome.formulas, &files.formulas) {
            (Some(payload), Some(file_ref)) => {
                descriptor.record(file_ref, payload.write(&formulas_path)?);
                stats.formula_files_written += 1;
            }
            _ => {
                artifact::remove_stale(&formulas_path)?;
            }
        }

        Ok(descriptor)
    }
}

fn read_optional<T: serde::de::DeserializeOwned>(path: &Path) -> ArtifactResult<Option<T>> {
    match artifact::read_yaml(path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Object folders under the layout, sorted, skipping names that start with `_`.
/// Explicit names must stay inside `objects/`.
fn is_folder_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

fn list_objects(objects_dir: &Path) -> ArtifactResult<Vec<String>> {
    let entries = fs::read_dir(objects_dir).map_err(|e| ArtifactError::io(objects_dir, e))?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('_'))
        .collect();
    names.sort();
    Ok(names)
}
