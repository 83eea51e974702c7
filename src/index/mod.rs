//! Master and search indexes over a parsed document
//!
//! Both are derived purely from the `SchemaDocument` and the category rules;
//! neither reads the partitioned layout back.

mod master;
mod search;

pub use master::{
    MasterIndex, MasterIndexBody, MasterIndexEntry, MasterIndexMetadata, SAMPLE_FIELD_LIMIT,
};
pub use search::{SearchField, SearchIndex, SearchIndexBody, SearchIndexMetadata, SearchObject};

use std::path::Path;

use crate::artifact::{self, ArtifactResult};
use crate::categorize::{categorize, CategoryRules};
use crate::model::SchemaDocument;

pub struct IndexBuilder<'a> {
    rules: &'a CategoryRules,
    generated_date: String,
    source_file: String,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(rules: &'a CategoryRules, generated_date: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            rules,
            generated_date: generated_date.into(),
            source_file: source_file.into(),
        }
    }

    pub fn build_master(&self, document: &SchemaDocument) -> MasterIndex {
        let mut objects: Vec<_> = document.objects.iter().collect();
        objects.sort_by(|a, b| a.api_name.cmp(&b.api_name));

        MasterIndex {
            schema_index: MasterIndexBody {
                metadata: master::metadata(&self.generated_date, &self.source_file, objects.len()),
                objects: objects
                    .into_iter()
                    .map(|o| MasterIndexEntry::for_object(o, categorize(&o.api_name, self.rules)))
                    .collect(),
            },
        }
    }

    pub fn build_search(&self, document: &SchemaDocument) -> SearchIndex {
        SearchIndex {
            search_index: SearchIndexBody {
                metadata: search::metadata(&self.generated_date),
                objects: document
                    .objects
                    .iter()
                    .map(|o| (o.api_name.clone(), SearchObject::from(o)))
                    .collect(),
            },
        }
    }
}

impl MasterIndex {
    pub fn write(&self, path: &Path) -> ArtifactResult<u32> {
        let header = vec![
            "Salesforce Schema Master Index".to_string(),
            format!("Generated: {}", self.schema_index.metadata.generated_date),
            format!("Objects: {}", self.schema_index.objects.len()),
            "Each object folder holds schema.yaml, plus picklists.yaml and formulas.yaml when present".to_string(),
        ];
        artifact::write_yaml(path, &header, self)
    }

    pub fn entry(&self, api_name: &str) -> Option<&MasterIndexEntry> {
        self.schema_index.objects.iter().find(|e| e.api_name == api_name)
    }
}

impl SearchIndex {
    pub fn write(&self, path: &Path) -> ArtifactResult<u32> {
        let header = vec![
            "Salesforce Schema Search Index".to_string(),
            format!("Generated: {}", self.search_index.metadata.generated_date),
            "Field names, types and constraints only; payload values live in the object folders".to_string(),
        ];
        artifact::write_yaml(path, &header, self)
    }
}
