//! CLI module for sfschema
//!
//! Provides command-line interface for:
//! - generate: parse object metadata into the normalized document
//! - split: partition the normalized document
//! - build: generate and split
//! - enrich: merge live field attributes into the layout
//! - verify: check partitions against the manifest
//! - pending: list retrieval candidates missing locally

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, PathArgs};
pub use commands::{build, enrich, generate, pending, run, run_command, split, verify};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
