//! Splitter: writes the partitioned layout for a whole document
//!
//! Order of writes:
//! 1. one partition per object (failures recorded, run continues)
//! 2. stale partitions of objects that disappeared
//! 3. master and search indexes
//! 4. category bundles
//! 5. README.md
//! 6. `_manifest.json`, last, so it only describes completed partitions

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::artifact::{self, generation_timestamp, ArtifactResult};
use crate::categorize::{Categorizer, CategoryRules};
use crate::index::IndexBuilder;
use crate::model::SchemaDocument;
use crate::observability::{log_event_with_fields, stage, Event, ObservationScope};
use crate::report::{DiagnosticKind, RunReport};

use super::bundle::CategoryBundle;
use super::errors::{SplitError, SplitResult};
use super::guide::{self, GuideContext};
use super::layout::{folder_ref, Layout, PartitionFiles};
use super::manifest::{LayoutManifest, PartitionDescriptor};
use super::partition::{Partition, PartitionContext};

/// Counts for one split run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub output_dir: String,
    pub objects: usize,
    pub partitions_written: usize,
    pub partitions_failed: usize,
    pub picklist_files: usize,
    pub formula_files: usize,
    /// category → object count, non-empty categories only
    pub categories: BTreeMap<String, usize>,
    pub stale_removed: usize,
}

pub struct Splitter<'r> {
    layout: Layout,
    rules: &'r CategoryRules,
    split_from: String,
    fixed_timestamp: Option<String>,
}

impl<'r> Splitter<'r> {
    /// `split_from` names the normalized document recorded in every payload.
    pub fn new(layout: Layout, rules: &'r CategoryRules, split_from: impl Into<String>) -> Self {
        Self {
            layout,
            rules,
            split_from: split_from.into(),
            fixed_timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.fixed_timestamp = timestamp;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn run(&self, document: &SchemaDocument, report: &mut RunReport) -> SplitResult<SplitSummary> {
        let root_display = self.layout.root().display().to_string();
        let scope = ObservationScope::with_fields(stage::SPLIT, &[("output_dir", root_display.as_str())]);

        match self.run_inner(document, report) {
            Ok(summary) => {
                let written = summary.partitions_written.to_string();
                let failed = summary.partitions_failed.to_string();
                scope.complete_with_fields(&[
                    ("partitions_written", written.as_str()),
                    ("partitions_failed", failed.as_str()),
                ]);
                Ok(summary)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    fn run_inner(&self, document: &SchemaDocument, report: &mut RunReport) -> SplitResult<SplitSummary> {
        let objects_dir = self.layout.objects_dir();
        fs::create_dir_all(&objects_dir).map_err(|e| SplitError::layout_root(&objects_dir, e))?;

        let generated_date = generation_timestamp(self.fixed_timestamp.as_deref());
        let ctx = PartitionContext {
            split_from: self.split_from.clone(),
            generated_date: generated_date.clone(),
            original_schema_date: document.metadata.generated_date.clone(),
        };

        let mut summary = SplitSummary {
            output_dir: self.layout.root().display().to_string(),
            objects: document.objects.len(),
            ..SplitSummary::default()
        };

        let previous = LayoutManifest::load_existing(&self.layout);
        let mut manifest = LayoutManifest::new(generated_date.as_str(), self.split_from.as_str());

        for object in &document.objects {
            let partition = Partition::of(object, document, &ctx);
            match self.write_partition(&partition, &mut summary) {
                Ok(descriptor) => {
                    summary.partitions_written += 1;
                    manifest.partitions.insert(object.api_name.clone(), descriptor);
                    log_event_with_fields(Event::PartitionWritten, &[("object", object.api_name.as_str())]);
                }
                Err(e) => {
                    summary.partitions_failed += 1;
                    let path = e.path().display().to_string();
                    report.error(
                        DiagnosticKind::Io,
                        &object.api_name,
                        Some(path.as_str()),
                        format!("partition not written: {}", e),
                    );
                    log_event_with_fields(
                        Event::PartitionFailed,
                        &[("object", object.api_name.as_str()), ("code", e.code())],
                    );
                }
            }
        }

        if let Some(previous) = previous {
            let current: HashSet<&str> = document.objects.iter().map(|o| o.api_name.as_str()).collect();
            for (object, descriptor) in &previous.partitions {
                if !current.contains(object.as_str()) {
                    summary.stale_removed += self.remove_partition(object, &descriptor.files, report);
                }
            }
        }

        self.write_indexes(document, &generated_date)?;
        summary.categories = self.write_categories(document, &generated_date, report, &mut summary.stale_removed)?;
        self.write_guide(document, &generated_date, &summary.categories)?;

        let manifest_path = self.layout.manifest_path();
        manifest.write(&self.layout)?;
        let manifest_display = manifest_path.display().to_string();
        let partitions = manifest.partitions.len().to_string();
        log_event_with_fields(
            Event::ManifestWritten,
            &[("path", manifest_display.as_str()), ("partitions", partitions.as_str())],
        );

        Ok(summary)
    }

    /// Writes every payload of one partition and drops payloads an earlier
    /// run left for values the object no longer has.
    fn write_partition(
        &self,
        partition: &Partition,
        summary: &mut SplitSummary,
    ) -> ArtifactResult<PartitionDescriptor> {
        let name = partition.api_name();
        let files = PartitionFiles::for_object(
            name,
            partition.picklists.is_some(),
            partition.formulas.is_some(),
        );
        let mut descriptor = PartitionDescriptor::new(folder_ref(name), files.clone());

        let checksum = partition.schema.write(&self.layout.schema_path(name))?;
        descriptor.record(&files.schema, checksum);

        let picklists_path = self.layout.picklists_path(name);
        match (&partition.picklists, &files.picklists) {
            (Some(payload), Some(file_ref)) => {
                let checksum = payload.write(&picklists_path)?;
                descriptor.record(file_ref, checksum);
                summary.picklist_files += 1;
            }
            _ => {
                if artifact::remove_stale(&picklists_path)? {
                    summary.stale_removed += 1;
                    log_stale(&picklists_path);
                }
            }
        }

        let formulas_path = self.layout.formulas_path(name);
        match (&partition.formulas, &files.formulas) {
            (Some(payload), Some(file_ref)) => {
                let checksum = payload.write(&formulas_path)?;
                descriptor.record(file_ref, checksum);
                summary.formula_files += 1;
            }
            _ => {
                if artifact::remove_stale(&formulas_path)? {
                    summary.stale_removed += 1;
                    log_stale(&formulas_path);
                }
            }
        }

        Ok(descriptor)
    }

    /// Removes the files of an object that is no longer in the document.
    fn remove_partition(&self, object: &str, files: &PartitionFiles, report: &mut RunReport) -> usize {
        let mut removed = 0;
        for file_ref in files.all() {
            let path = self.layout.resolve(file_ref);
            match artifact::remove_stale(&path) {
                Ok(true) => {
                    removed += 1;
                    log_stale(&path);
                }
                Ok(false) => {}
                Err(e) => report.warn(
                    DiagnosticKind::Io,
                    object,
                    Some(file_ref),
                    format!("stale payload not removed: {}", e),
                ),
            }
        }
        // Only succeeds once the folder is empty.
        let _ = fs::remove_dir(self.layout.object_dir(object));
        removed
    }

    fn write_indexes(&self, document: &SchemaDocument, generated_date: &str) -> SplitResult<()> {
        let scope = ObservationScope::new(stage::INDEX);
        let builder = IndexBuilder::new(self.rules, generated_date, self.split_from.as_str());

        let master_path = self.layout.master_index_path();
        let search_path = self.layout.search_index_path();
        let result = builder
            .build_master(document)
            .write(&master_path)
            .and_then(|_| builder.build_search(document).write(&search_path));

        if let Err(e) = result {
            scope.fail(&e.to_string());
            return Err(e.into());
        }

        for path in [&master_path, &search_path] {
            let display = path.display().to_string();
            log_event_with_fields(Event::IndexWritten, &[("path", display.as_str())]);
        }
        scope.complete();
        Ok(())
    }

    fn write_categories(
        &self,
        document: &SchemaDocument,
        generated_date: &str,
        report: &mut RunReport,
        stale_removed: &mut usize,
    ) -> SplitResult<BTreeMap<String, usize>> {
        let scope = ObservationScope::new(stage::CATEGORIZE);
        let groups = Categorizer::new(self.rules).assign(&document.objects);

        let mut counts = BTreeMap::new();
        for (category, objects) in &groups {
            let path = self.layout.category_path(category);
            if let Err(e) = CategoryBundle::new(category, objects, generated_date).write(&path) {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
            let count = objects.len().to_string();
            log_event_with_fields(
                Event::CategoryBundleWritten,
                &[("category", category.as_str()), ("objects", count.as_str())],
            );
            counts.insert(category.clone(), objects.len());
        }

        *stale_removed += self.remove_stale_bundles(&counts, report);

        let categories = counts.len().to_string();
        scope.complete_with_fields(&[("categories", categories.as_str())]);
        Ok(counts)
    }

    /// Bundles of categories that are empty this run.
    fn remove_stale_bundles(&self, current: &BTreeMap<String, usize>, report: &mut RunReport) -> usize {
        let dir = self.layout.categories_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut stale: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "yaml"))
            .filter(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map_or(false, |stem| !current.contains_key(stem))
            })
            .collect();
        stale.sort();

        let mut removed = 0;
        for path in stale {
            match artifact::remove_stale(&path) {
                Ok(true) => {
                    removed += 1;
                    log_stale(&path);
                }
                Ok(false) => {}
                Err(e) => {
                    let display = path.display().to_string();
                    report.warn(
                        DiagnosticKind::Io,
                        "categories",
                        Some(display.as_str()),
                        format!("stale bundle not removed: {}", e),
                    );
                }
            }
        }
        removed
    }

    fn write_guide(
        &self,
        document: &SchemaDocument,
        generated_date: &str,
        categories: &BTreeMap<String, usize>,
    ) -> SplitResult<()> {
        let content = guide::render(&GuideContext {
            generated_date,
            total_objects: document.objects.len(),
            source: &self.split_from,
            categories,
        });
        let path = self.layout.guide_path();
        artifact::write_text(&path, &content)?;

        let display = path.display().to_string();
        log_event_with_fields(Event::GuideWritten, &[("path", display.as_str())]);
        Ok(())
    }
}

fn log_stale(path: &Path) {
    let display = path.display().to_string();
    log_event_with_fields(Event::StalePayloadRemoved, &[("path", display.as_str())]);
}
