//! CLI argument definitions using clap
//!
//! Commands:
//! - sfschema generate   parse object metadata into the normalized document
//! - sfschema split      partition the normalized document
//! - sfschema build      generate, then split
//! - sfschema enrich     merge live field attributes into the layout
//! - sfschema verify     check partitions against the manifest
//! - sfschema pending    list retrieval candidates still missing locally

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sfschema - Salesforce object metadata normalizer
#[derive(Parser, Debug)]
#[command(name = "sfschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./sfschema.json")]
    pub config: PathBuf,

    /// Minimum log severity (trace, info, warn, error, fatal)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// RFC3339 timestamp stamped into every generated artifact
    #[arg(long, global = true)]
    pub timestamp: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Path overrides shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Object metadata root (auto-detected when omitted)
    #[arg(long)]
    pub objects_path: Option<PathBuf>,

    /// Normalized schema document
    #[arg(long)]
    pub schema_file: Option<PathBuf>,

    /// Partitioned layout root
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse object metadata into the normalized schema document
    Generate {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Partition the normalized schema document into the layout
    Split {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Generate and split in one run
    Build {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Merge live field attributes from the org into the layout
    Enrich {
        #[command(flatten)]
        paths: PathArgs,

        /// Target org alias (default: project sf configuration)
        #[arg(long)]
        org: Option<String>,

        /// Path to the sf executable
        #[arg(long)]
        sf_executable: Option<PathBuf>,

        /// Per-object describe timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Compute the merge without writing
        #[arg(long)]
        dry_run: bool,

        /// Objects to enrich (default: every object in the layout)
        #[arg(long = "object")]
        objects: Vec<String>,
    },

    /// Check every partition against its manifest checksums
    Verify {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Split retrieval candidates into present, missing and excluded
    Pending {
        #[command(flatten)]
        paths: PathArgs,

        /// File with one candidate API name per line
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Candidate API names
        candidates: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
