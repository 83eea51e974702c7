//! Run report: every tolerated failure, attributed to its object
//!
//! Stages never swallow a failure they survive. They append a `Diagnostic`
//! here (which is also logged) and carry on with the next sibling. The report
//! is returned to the caller as a value; there is no process-wide collector.

use std::fmt;

use serde::Serialize;

use crate::observability::Logger;

/// How bad a recorded failure is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Degraded output, nothing lost structurally
    Warning,
    /// Some output for the object is missing
    Error,
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A single document could not be parsed and became a placeholder
    StructuralParse,
    /// A numeric attribute was not a non-negative integer and was omitted
    InvalidNumeric,
    /// A second definition with an already-seen name was dropped
    DuplicateName,
    /// A sub-collection directory exists but could not be listed
    UnreadableCollection,
    /// An output path could not be created or written
    Io,
    /// The live system could not be queried or answered badly
    ExternalFetch,
    /// A partitioned schema file needed for a later pass is absent
    SchemaMissing,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::StructuralParse => "STRUCTURAL_PARSE",
            DiagnosticKind::InvalidNumeric => "INVALID_NUMERIC",
            DiagnosticKind::DuplicateName => "DUPLICATE_NAME",
            DiagnosticKind::UnreadableCollection => "UNREADABLE_COLLECTION",
            DiagnosticKind::Io => "IO",
            DiagnosticKind::ExternalFetch => "EXTERNAL_FETCH",
            DiagnosticKind::SchemaMissing => "SCHEMA_MISSING",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Object the failure originated from
    pub object: String,
    /// Field, record type, rule or file within the object, if narrower
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.object)?;
        if let Some(subject) = &self.subject {
            write!(f, ".{}", subject)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Ordered collection of diagnostics for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it at WARN.
    pub fn warn(
        &mut self,
        kind: DiagnosticKind,
        object: &str,
        subject: Option<&str>,
        message: impl Into<String>,
    ) {
        self.record(DiagnosticLevel::Warning, kind, object, subject, message.into());
    }

    /// Records an error and logs it at ERROR.
    pub fn error(
        &mut self,
        kind: DiagnosticKind,
        object: &str,
        subject: Option<&str>,
        message: impl Into<String>,
    ) {
        self.record(DiagnosticLevel::Error, kind, object, subject, message.into());
    }

    fn record(
        &mut self,
        level: DiagnosticLevel,
        kind: DiagnosticKind,
        object: &str,
        subject: Option<&str>,
        message: String,
    ) {
        let mut fields = vec![("kind", kind.as_str()), ("object", object), ("message", message.as_str())];
        if let Some(subject) = subject {
            fields.push(("subject", subject));
        }
        match level {
            DiagnosticLevel::Warning => Logger::warn("DIAGNOSTIC_RECORDED", &fields),
            DiagnosticLevel::Error => Logger::error("DIAGNOSTIC_RECORDED", &fields),
        }

        self.diagnostics.push(Diagnostic {
            object: object.to_string(),
            subject: subject.map(str::to_string),
            level,
            kind,
            message,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn for_object<'a>(&'a self, object: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.object == object)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
