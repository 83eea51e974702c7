//! Partitioned layout paths
//!
//! ```text
//! <root>/
//!   _index.yaml
//!   _search_index.yaml
//!   _manifest.json
//!   README.md
//!   objects/<Name>/schema.yaml
//!   objects/<Name>/picklists.yaml   (only with picklist values)
//!   objects/<Name>/formulas.yaml    (only with formulas)
//!   categories/<category>.yaml
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const OBJECTS_DIR: &str = "objects";
pub const CATEGORIES_DIR: &str = "categories";
pub const SCHEMA_FILE: &str = "schema.yaml";
pub const PICKLISTS_FILE: &str = "picklists.yaml";
pub const FORMULAS_FILE: &str = "formulas.yaml";
pub const MASTER_INDEX_FILE: &str = "_index.yaml";
pub const SEARCH_INDEX_FILE: &str = "_search_index.yaml";
pub const MANIFEST_FILE: &str = "_manifest.json";
pub const GUIDE_FILE: &str = "README.md";

/// Root of a partitioned layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.root.join(OBJECTS_DIR)
    }

    pub fn object_dir(&self, api_name: &str) -> PathBuf {
        self.objects_dir().join(api_name)
    }

    pub fn schema_path(&self, api_name: &str) -> PathBuf {
        self.object_dir(api_name).join(SCHEMA_FILE)
    }

    pub fn picklists_path(&self, api_name: &str) -> PathBuf {
        self.object_dir(api_name).join(PICKLISTS_FILE)
    }

    pub fn formulas_path(&self, api_name: &str) -> PathBuf {
        self.object_dir(api_name).join(FORMULAS_FILE)
    }

    pub fn categories_dir(&self) -> PathBuf {
        self.root.join(CATEGORIES_DIR)
    }

    pub fn category_path(&self, category: &str) -> PathBuf {
        self.categories_dir().join(format!("{}.yaml", category))
    }

    pub fn master_index_path(&self) -> PathBuf {
        self.root.join(MASTER_INDEX_FILE)
    }

    pub fn search_index_path(&self) -> PathBuf {
        self.root.join(SEARCH_INDEX_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn guide_path(&self) -> PathBuf {
        self.root.join(GUIDE_FILE)
    }

    /// Resolves a layout-relative reference such as `objects/Case/schema.yaml`.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

/// `objects/<Name>/`
pub fn folder_ref(api_name: &str) -> String {
    format!("{}/{}/", OBJECTS_DIR, api_name)
}

/// `objects/<Name>/<file>`
pub fn file_ref(api_name: &str, file: &str) -> String {
    format!("{}/{}/{}", OBJECTS_DIR, api_name, file)
}

/// Layout-relative files of one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionFiles {
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picklists: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formulas: Option<String>,
}

impl PartitionFiles {
    pub fn for_object(api_name: &str, has_picklists: bool, has_formulas: bool) -> Self {
        Self {
            schema: file_ref(api_name, SCHEMA_FILE),
            picklists: has_picklists.then(|| file_ref(api_name, PICKLISTS_FILE)),
            formulas: has_formulas.then(|| file_ref(api_name, FORMULAS_FILE)),
        }
    }

    /// Every present file reference, schema first.
    pub fn all(&self) -> Vec<&str> {
        let mut files = vec![self.schema.as_str()];
        files.extend(self.picklists.as_deref());
        files.extend(self.formulas.as_deref());
        files
    }
}
