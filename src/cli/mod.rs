//! CLI argument parsing for chatlens
//!
//! Global flags: --config, --format, --quiet, --verbose, --log-level, --log-json

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use output::OutputFormat;

/// Chatlens - classify support chats and report on them
#[derive(Parser, Debug)]
#[command(name = "chatlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./chatlens.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging and phase timings
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (`debug`, `chatlens=trace`, ...)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every transcript and write the spreadsheet, records and reports
    Analyze {
        /// Transcript export (JSON array)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Separate ground-truth file; labels embedded in the transcripts are used otherwise
        #[arg(long)]
        ground_truth: Option<PathBuf>,

        /// Label each chat with its own ground truth instead of calling the API
        #[arg(long)]
        offline: bool,

        /// Pause between request groups, in milliseconds
        #[arg(long)]
        pause_ms: Option<u64>,

        /// Classifier model name
        #[arg(long, short)]
        model: Option<String>,
    },

    /// Regenerate the reports and spreadsheet from a saved record set
    Report {
        /// Record set written by `analyze`
        #[arg(long, short)]
        records: Option<PathBuf>,

        /// Separate ground-truth file; labels stored with the records are used otherwise
        #[arg(long)]
        ground_truth: Option<PathBuf>,
    },

    /// Print per-field accuracy for a saved record set
    Accuracy {
        /// Record set written by `analyze`
        #[arg(long, short)]
        records: Option<PathBuf>,

        /// Separate ground-truth file; labels stored with the records are used otherwise
        #[arg(long)]
        ground_truth: Option<PathBuf>,
    },
}
