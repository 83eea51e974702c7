//! README.md for the layout root

use std::collections::BTreeMap;

pub struct GuideContext<'a> {
    pub generated_date: &'a str,
    pub total_objects: usize,
    pub source: &'a str,
    /// category → object count
    pub categories: &'a BTreeMap<String, usize>,
}

const OVERVIEW: &str = r#"# Salesforce Schema Documentation

This directory holds the Salesforce object schema split into small, independently loadable files.

## Structure

```text
schema/
├── _index.yaml          # Master index of all objects
├── _search_index.yaml   # Field-level search index
├── _manifest.json       # Partition descriptors and checksums
├── objects/
│   └── <ObjectName>/
│       ├── schema.yaml     # Fields, record types, validation rules
│       ├── picklists.yaml  # Picklist values (if any)
│       └── formulas.yaml   # Formula definitions (if any)
└── categories/
    └── <category>.yaml     # Full objects grouped by category
```

## Usage

1. Start with `_index.yaml` to find the object you need.
2. Use `_search_index.yaml` to locate fields across objects.
3. Load `objects/<ObjectName>/schema.yaml` for the object's fields.
4. Load `picklists.yaml` or `formulas.yaml` only when a field note points there.

"#;

const REGENERATING: &str = r#"## Regenerating

```bash
sfschema build      # parse metadata and split
sfschema enrich     # merge live field attributes
sfschema verify     # check partitions against the manifest
```

Files in this directory are generated. Edit the source metadata and regenerate instead.

"#;

pub fn render(ctx: &GuideContext<'_>) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(OVERVIEW);

    if !ctx.categories.is_empty() {
        out.push_str("## Categories\n\n");
        for (category, count) in ctx.categories {
            out.push_str(&format!("- `categories/{}.yaml`: {} objects\n", category, count));
        }
        out.push('\n');
    }

    out.push_str(REGENERATING);
    out.push_str(&format!(
        "## Metadata\n\n- Generated: {}\n- Total Objects: {}\n- Source: {}\n",
        ctx.generated_date, ctx.total_objects, ctx.source
    ));

    out
}
