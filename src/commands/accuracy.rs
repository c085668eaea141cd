//! `chatlens accuracy`: per-field agreement for a saved record set

use std::path::Path;

use chatlens_core::accuracy::compute_accuracy;
use chatlens_core::error::Result;
use chatlens_core::records::{embedded_ground_truth, load_records};
use chatlens_core::transcript::load_ground_truth;

use super::summary::{accuracy_json, print_accuracy};
use crate::cli::{Cli, OutputFormat};

pub fn execute(cli: &Cli, records_path: &Path, ground_truth: Option<&Path>) -> Result<()> {
    let set = load_records(records_path)?;
    let ground_truth = match ground_truth {
        Some(path) => load_ground_truth(path)?,
        None => embedded_ground_truth(&set.records),
    };
    let table = compute_accuracy(&set.records, &ground_truth);

    match cli.format {
        OutputFormat::Json => println!("{}", accuracy_json(&table)),
        OutputFormat::Human => print_accuracy(&table),
    }
    Ok(())
}
