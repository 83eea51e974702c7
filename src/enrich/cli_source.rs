//! `DescribeSource` backed by the Salesforce CLI
//!
//! Runs `sf sobject describe --sobject <name> --target-org <alias> --json`
//! and reads the `{status, result, message}` envelope from stdout. The child
//! is killed once the timeout passes.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;

use crate::observability::{log_event_with_fields, Event, Logger};

use super::describe::{DescribeSource, ObjectDescribe};
use super::errors::{EnrichError, EnrichResult};

pub const DEFAULT_DESCRIBE_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Deserialize)]
struct Envelope {
    status: i64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

pub struct SfCliSource {
    executable: PathBuf,
    org_alias: String,
    timeout: Duration,
}

impl SfCliSource {
    pub fn new(executable: PathBuf, org_alias: impl Into<String>) -> Self {
        Self {
            executable,
            org_alias: org_alias.into(),
            timeout: DEFAULT_DESCRIBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn org_alias(&self) -> &str {
        &self.org_alias
    }

    fn spawn(&self, object: &str) -> EnrichResult<Child> {
        Command::new(&self.executable)
            .args(["sobject", "describe", "--sobject", object])
            .args(["--target-org", self.org_alias.as_str(), "--json"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EnrichError::Spawn {
                executable: self.executable.clone(),
                source,
            })
    }
}

impl DescribeSource for SfCliSource {
    fn describe(&self, object: &str) -> Result<ObjectDescribe, EnrichError> {
        let mut child = self.spawn(object)?;

        // Pipes are drained on their own threads while we poll.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EnrichError::Timeout {
                        object: object.to_string(),
                        seconds: self.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(EnrichError::remote(object, e.to_string())),
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        let describe = parse_envelope(object, &stdout).map_err(|e| match e {
            EnrichError::MalformedResponse { .. } if !status.success() => {
                EnrichError::remote(object, format!("CLI error - {}", stderr.trim()))
            }
            other => other,
        })?;

        let fields = describe.fields().len().to_string();
        log_event_with_fields(
            Event::DescribeFetched,
            &[("object", object), ("fields", fields.as_str())],
        );
        Ok(describe)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

/// Decodes the CLI's JSON envelope. `status` 0 carries the describe in
/// `result`; anything else carries an error `message`.
pub fn parse_envelope(object: &str, stdout: &str) -> EnrichResult<ObjectDescribe> {
    let envelope: Envelope =
        serde_json::from_str(stdout).map_err(|e| EnrichError::malformed(object, e))?;

    if envelope.status != 0 {
        let message = envelope
            .message
            .unwrap_or_else(|| format!("status {}", envelope.status));
        return Err(EnrichError::remote(object, message));
    }

    let result = envelope
        .result
        .ok_or_else(|| EnrichError::malformed(object, "missing result"))?;
    serde_json::from_value(result).map_err(|e| EnrichError::malformed(object, e))
}

/// Finds the `sf` executable: an explicit path, then `PATH`, then the usual
/// Windows install locations.
pub fn resolve_executable(explicit: Option<&Path>) -> EnrichResult<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(EnrichError::ExecutableNotFound {
            searched: path.display().to_string(),
        });
    }

    let names: &[&str] = if cfg!(windows) {
        &["sf.cmd", "sf.exe", "sf"]
    } else {
        &["sf"]
    };

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            for name in names {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
    }

    let fallbacks = windows_install_locations();
    if let Some(found) = fallbacks.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }

    let mut searched = vec!["PATH".to_string()];
    searched.extend(fallbacks.iter().map(|p| p.display().to_string()));
    Logger::error("SF_EXECUTABLE_NOT_FOUND", &[]);
    Err(EnrichError::ExecutableNotFound {
        searched: searched.join(", "),
    })
}

fn windows_install_locations() -> Vec<PathBuf> {
    if !cfg!(windows) {
        return Vec::new();
    }

    let mut paths = vec![
        PathBuf::from(r"C:\Program Files\Salesforce CLI\bin\sf.cmd"),
        PathBuf::from(r"C:\Program Files\sf\bin\sf.cmd"),
    ];
    if let Some(profile) = env::var_os("USERPROFILE") {
        paths.push(
            PathBuf::from(profile)
                .join("AppData")
                .join("Roaming")
                .join("npm")
                .join("sf.cmd"),
        );
    }
    if let Some(local) = env::var_os("LOCALAPPDATA") {
        paths.push(PathBuf::from(local).join("sf").join("bin").join("sf.cmd"));
    }
    paths
}
