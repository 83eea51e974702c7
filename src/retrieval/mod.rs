//! Retrieval candidate filtering
//!
//! Decides which org objects are worth pulling as metadata and which of
//! those are still missing from the local object root. Fetching them is
//! someone else's job.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Exclusion table for retrieval candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalFilter {
    /// Any API name ending with one of these is skipped
    pub excluded_suffixes: Vec<String>,
    /// Exact API names that are skipped
    pub excluded_objects: Vec<String>,
}

impl Default for RetrievalFilter {
    fn default() -> Self {
        let suffixes = [
            "__mdt", "__e", "__b", "__x", "History", "Share", "Feed", "ChangeEvent", "Tag",
        ];
        let objects = [
            "AggregateResult",
            "ContentVersion",
            "ContentDocument",
            "FeedItem",
            "FeedComment",
            "ContentDocumentLink",
            "EmailMessage",
            "Attachment",
            "Document",
            "Note",
        ];
        Self {
            excluded_suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            excluded_objects: objects.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RetrievalFilter {
    pub fn should_retrieve(&self, api_name: &str) -> bool {
        if api_name.is_empty() {
            return false;
        }
        if self
            .excluded_suffixes
            .iter()
            .any(|suffix| api_name.ends_with(suffix.as_str()))
        {
            return false;
        }
        !self.excluded_objects.iter().any(|o| o == api_name)
    }

    /// Candidates that pass the filter, order preserved.
    pub fn filter<'a>(&self, candidates: &'a [String]) -> Vec<&'a str> {
        candidates
            .iter()
            .map(String::as_str)
            .filter(|name| self.should_retrieve(name))
            .collect()
    }

    /// Splits filtered candidates by whether an object directory already
    /// exists under `objects_path`.
    pub fn pending(&self, candidates: &[String], objects_path: &Path) -> PendingRetrieval {
        let mut result = PendingRetrieval::default();
        for name in candidates {
            if !self.should_retrieve(name) {
                result.excluded.push(name.clone());
            } else if objects_path.join(name).is_dir() {
                result.present.push(name.clone());
            } else {
                result.missing.push(name.clone());
            }
        }
        result
    }
}

/// Outcome of `RetrievalFilter::pending`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingRetrieval {
    /// Already have local metadata
    pub present: Vec<String>,
    /// Need to be retrieved
    pub missing: Vec<String>,
    /// Rejected by the filter
    pub excluded: Vec<String>,
}
