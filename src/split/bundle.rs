//! Category bundles: full, unpartitioned objects grouped by category

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::{self, ArtifactResult};
use crate::model::ObjectDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMetadata {
    pub generated_date: String,
    pub object_count: usize,
    pub description: String,
}

/// `categories/<category>.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBundle {
    pub category: String,
    pub metadata: CategoryMetadata,
    pub objects: Vec<ObjectDefinition>,
}

impl CategoryBundle {
    pub fn new(category: &str, objects: &[&ObjectDefinition], generated_date: &str) -> Self {
        Self {
            category: category.to_string(),
            metadata: CategoryMetadata {
                generated_date: generated_date.to_string(),
                object_count: objects.len(),
                description: format!("Schema for {} objects", category),
            },
            objects: objects.iter().map(|o| (*o).clone()).collect(),
        }
    }

    pub fn write(&self, path: &Path) -> ArtifactResult<u32> {
        let header = vec![
            format!("Salesforce Schema - {} Category", self.category.to_uppercase()),
            format!("Generated: {}", self.metadata.generated_date),
            format!("Objects: {}", self.metadata.object_count),
        ];
        artifact::write_yaml(path, &header, self)
    }
}
