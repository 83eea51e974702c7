//! Observability: structured JSON logging and stage scopes
//!
//! Logging is read-only with respect to the pipeline. It never fails a run,
//! writes synchronously and produces deterministic key order.
//!
//! ```ignore
//! use sfschema::observability::{Event, Logger, ObservationScope};
//!
//! Logger::info("OBJECT_PARSED", &[("object", "Account")]);
//!
//! let scope = ObservationScope::new("SPLIT");
//! // ... partition ...
//! scope.complete();
//! ```

use std::io::{self, Write};

mod events;
mod logger;
mod scope;

pub use events::{stage, Event};
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Logs a lifecycle event at the event's own severity.
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    if Logger::enabled(event.severity()) {
        log_event_to_writer(event, fields, &mut io::stderr());
    }
}

fn log_event_to_writer<W: Write>(event: Event, fields: &[(&str, &str)], writer: &mut W) {
    Logger::log_to_writer(event.severity(), event.as_str(), fields, writer);
}
