//! JSON output for the CLI
//!
//! - Output: exactly one JSON object on stdout per invocation
//! - Logs never go to stdout
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

fn error_body(error: &CliError) -> Value {
    let mut response = json!({
        "status": "error",
        "code": error.code_str(),
        "message": error.message(),
    });
    if let Some(cause) = error.cause() {
        response["cause"] = json!(cause);
    }
    if let Some(details) = error.details() {
        response["details"] = details.clone();
    }
    response
}

fn emit(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    emit(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    emit(&error_body(error))
}
