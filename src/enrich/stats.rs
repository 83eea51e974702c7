use serde::Serialize;

/// Aggregate counts for one enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub dry_run: bool,
    pub objects_processed: usize,
    pub objects_skipped: usize,
    pub fields_enriched: usize,
    pub picklists_added: usize,
    pub formulas_added: usize,
    pub picklist_files_written: usize,
    pub formula_files_written: usize,
    /// `"<object>: <message>"` per skipped object
    pub errors: Vec<String>,
}

impl EnrichmentStats {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record_skip(&mut self, object: &str, message: &str) {
        self.objects_skipped += 1;
        self.errors.push(format!("{}: {}", object, message));
    }
}
