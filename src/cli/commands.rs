//! CLI command implementations
//!
//! Each command returns the JSON `data` of its response. `run` writes that
//! response, or the error response, as the only output on stdout.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Value};

use crate::enrich::{resolve_executable, resolve_org, Enricher, SfCliSource};
use crate::model::{self, SchemaDocument};
use crate::observability::{log_event_with_fields, stage, Event, Logger, ObservationScope};
use crate::parser::{detect_objects_path, MetadataParser};
use crate::report::RunReport;
use crate::split::{Layout, LayoutManifest, Splitter};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parses arguments, runs the command and writes its JSON response.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match run_command(cli) {
        Ok(data) => write_response(data),
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(Event::RunAborted, &[("error", message.as_str())]);
            let _ = write_error(&e);
            Err(e)
        }
    }
}

/// Runs one parsed command and returns its response data.
pub fn run_command(cli: Cli) -> CliResult<Value> {
    let mut config = Config::load(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(ts) = cli.timestamp {
        config.fixed_timestamp = Some(ts);
    }
    config.validate()?;
    Logger::set_min_severity(config.severity()?);

    let config_display = cli.config.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", config_display.as_str())]);

    match cli.command {
        Command::Generate { paths } => {
            config.apply_paths(&paths);
            generate(&config)
        }
        Command::Split { paths } => {
            config.apply_paths(&paths);
            split(&config)
        }
        Command::Build { paths } => {
            config.apply_paths(&paths);
            build(&config)
        }
        Command::Enrich {
            paths,
            org,
            sf_executable,
            timeout,
            dry_run,
            objects,
        } => {
            config.apply_paths(&paths);
            if org.is_some() {
                config.org_alias = org;
            }
            if sf_executable.is_some() {
                config.sf_executable = sf_executable;
            }
            if let Some(secs) = timeout {
                config.describe_timeout_secs = secs;
            }
            config.validate()?;
            let objects = if objects.is_empty() { None } else { Some(objects) };
            enrich(&config, objects.as_deref(), dry_run)
        }
        Command::Verify { paths } => {
            config.apply_paths(&paths);
            verify(&config)
        }
        Command::Pending {
            paths,
            from_file,
            candidates,
        } => {
            config.apply_paths(&paths);
            pending(&config, from_file.as_deref(), candidates)
        }
    }
}

fn current_dir() -> CliResult<PathBuf> {
    env::current_dir().map_err(|e| CliError::io_error(format!("Cannot read working directory: {}", e)))
}

fn objects_path(config: &Config) -> CliResult<PathBuf> {
    let path = match &config.objects_path {
        Some(path) => path.clone(),
        None => detect_objects_path(&current_dir()?)?,
    };
    let display = path.display().to_string();
    log_event_with_fields(Event::ObjectsPathResolved, &[("path", display.as_str())]);
    Ok(path)
}

fn parse_document(config: &Config, report: &mut RunReport) -> CliResult<SchemaDocument> {
    let parser = MetadataParser::new(objects_path(config)?).with_timestamp(config.fixed_timestamp.clone());
    let document = parser.parse_all(report)?;

    model::write_document(&document, &config.schema_file)?;
    let display = config.schema_file.display().to_string();
    log_event_with_fields(Event::DocumentWritten, &[("path", display.as_str())]);
    Ok(document)
}

fn split_document(config: &Config, document: &SchemaDocument, report: &mut RunReport) -> CliResult<Value> {
    let split_from = config.schema_file.display().to_string();
    let summary = Splitter::new(Layout::new(&config.output_dir), &config.categories, split_from)
        .with_timestamp(config.fixed_timestamp.clone())
        .run(document, report)?;
    Ok(serde_json::to_value(summary)?)
}

/// Parse object metadata into the normalized document
pub fn generate(config: &Config) -> CliResult<Value> {
    let mut report = RunReport::new();
    let document = parse_document(config, &mut report)?;

    Ok(json!({
        "schema_file": config.schema_file.display().to_string(),
        "objects": document.objects.len(),
        "relationships": document.relationships.len(),
        "report": report,
    }))
}

/// Partition an existing normalized document
pub fn split(config: &Config) -> CliResult<Value> {
    let document = model::read_document(&config.schema_file)?;
    let mut report = RunReport::new();
    let summary = split_document(config, &document, &mut report)?;

    Ok(json!({
        "split": summary,
        "report": report,
    }))
}

/// Generate and split without re-reading the document
pub fn build(config: &Config) -> CliResult<Value> {
    let mut report = RunReport::new();
    let document = parse_document(config, &mut report)?;
    let summary = split_document(config, &document, &mut report)?;

    Ok(json!({
        "schema_file": config.schema_file.display().to_string(),
        "objects": document.objects.len(),
        "relationships": document.relationships.len(),
        "split": summary,
        "report": report,
    }))
}

/// Merge live describe data into the layout
pub fn enrich(config: &Config, objects: Option<&[String]>, dry_run: bool) -> CliResult<Value> {
    // Identity first: nothing is touched without a resolvable org.
    let org = resolve_org(&current_dir()?, config.org_alias.as_deref())?;
    let executable = resolve_executable(config.sf_executable.as_deref())?;
    let source = SfCliSource::new(executable, org.as_str())
        .with_timeout(Duration::from_secs(config.describe_timeout_secs));

    let mut report = RunReport::new();
    let stats = Enricher::new(Layout::new(&config.output_dir), &source)
        .with_timestamp(config.fixed_timestamp.clone())
        .dry_run(dry_run)
        .run(objects, &mut report)?;

    Ok(json!({
        "org": org,
        "stats": stats,
        "report": report,
    }))
}

/// Check every partition against the manifest
pub fn verify(config: &Config) -> CliResult<Value> {
    let layout = Layout::new(&config.output_dir);
    let manifest = LayoutManifest::load(&layout).map_err(|e| {
        if e.is_not_found() {
            CliError::from(e).with_details(json!({ "hint": "run `sfschema split` first" }))
        } else {
            CliError::from(e)
        }
    })?;

    let scope = ObservationScope::new(stage::VERIFY);
    let report = manifest.verify(&layout);
    let damaged = report.damaged_objects();
    for object in manifest.partitions.keys() {
        let event = if damaged.contains(&object.as_str()) {
            Event::PartitionCorrupt
        } else {
            Event::PartitionVerified
        };
        log_event_with_fields(event, &[("object", object.as_str())]);
    }

    let checked = report.checked.to_string();
    let intact = report.intact.to_string();
    scope.complete_with_fields(&[("checked", checked.as_str()), ("intact", intact.as_str())]);

    let body = serde_json::to_value(&report)?;
    if report.is_clean() {
        Ok(body)
    } else {
        Err(CliError::layout_damaged(
            format!(
                "{} of {} partitions damaged: {}; regenerate with `sfschema build`",
                damaged.len(),
                report.checked,
                damaged.join(", ")
            ),
            body,
        ))
    }
}

/// Split retrieval candidates by local presence
pub fn pending(config: &Config, from_file: Option<&Path>, mut candidates: Vec<String>) -> CliResult<Value> {
    if let Some(path) = from_file {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
        candidates.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    if candidates.is_empty() {
        return Err(CliError::config_error("no candidate objects given"));
    }

    let objects_path = objects_path(config)?;
    let result = config.retrieval.pending(&candidates, &objects_path);

    Ok(json!({
        "objects_path": objects_path.display().to_string(),
        "pending": result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(root: &Path) -> Config {
        Config {
            objects_path: Some(root.join("objects")),
            schema_file: root.join("config/salesforce-er-schema.yaml"),
            output_dir: root.join("config/schema"),
            fixed_timestamp: Some("2024-05-01T00:00:00Z".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_build_then_verify() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            &root.join("objects/Account/fields/Name.field-meta.xml"),
            "<CustomField><fullName>Name</fullName><type>Text</type></CustomField>",
        );
        let config = config(root);

        let data = build(&config).unwrap();
        assert_eq!(data["objects"], 1);
        assert_eq!(data["split"]["partitions_written"], 1);

        let data = verify(&config).unwrap();
        assert_eq!(data["intact"], 1);

        fs::write(Layout::new(&config.output_dir).schema_path("Account"), "object: {}\n").unwrap();
        let err = verify(&config).unwrap_err();
        assert_eq!(err.code_str(), "SFS_CLI_LAYOUT_DAMAGED");
        assert!(err.message().contains("Account"));
    }

    #[test]
    fn test_verify_without_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let err = verify(&config(temp_dir.path())).unwrap_err();
        assert_eq!(err.code_str(), "SFS_CLI_ARTIFACT_ERROR");
        assert!(err.details().is_some());
    }

    #[test]
    fn test_pending_reads_candidate_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("objects/Account")).unwrap();
        write(&root.join("candidates.txt"), "# org objects\nAccount\nInvoice__c\nSetting__mdt\n");

        let data = pending(&config(root), Some(&root.join("candidates.txt")), Vec::new()).unwrap();
        assert_eq!(data["pending"]["present"], json!(["Account"]));
        assert_eq!(data["pending"]["missing"], json!(["Invoice__c"]));
        assert_eq!(data["pending"]["excluded"], json!(["Setting__mdt"]));
    }
}
